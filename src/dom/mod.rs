//! Document model consumed by the converter.
//!
//! HTML is parsed with html5ever into an [`ArenaDom`]. The converter only
//! ever reads a caller's tree; it works on a private copy when it needs to
//! collapse whitespace.
//!
//! # Example
//!
//! ```
//! use turndown::dom::ArenaDom;
//!
//! let (dom, fragment) = ArenaDom::parse_fragment("<p>Hello</p><p>World</p>");
//! assert_eq!(dom.children(fragment).count(), 2);
//! assert_eq!(dom.text_content(fragment), "HelloWorld");
//! ```

mod arena;
mod collapse;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, ChildrenIter};
pub use serialize::{close_tag, inner_html, open_tag, outer_html};
pub use tree_sink::{ArenaSink, NodeHandle};

pub(crate) use collapse::collapse_whitespace;

use html5ever::driver::ParseOpts;
use html5ever::tendril::TendrilSink;

/// Id given to the wrapper element around string input.
pub(crate) const ROOT_ID: &str = "turndown-root";

/// Parse a complete HTML document.
pub fn parse_document(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    html5ever::parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Parse markup into a wrapper element and return it as the conversion root.
///
/// The markup is placed inside `<x-turndown id="turndown-root">` so the
/// parser treats it as body content, the way a browser would for a pasted
/// fragment.
pub(crate) fn parse_root(html: &str) -> (ArenaDom, ArenaNodeId) {
    let dom = parse_document(&format!(
        "<x-turndown id=\"{ROOT_ID}\">{html}</x-turndown>"
    ));
    let root = dom
        .get_by_id(ROOT_ID)
        .or_else(|| dom.find_by_tag("x-turndown"))
        .unwrap_or_else(|| dom.document());
    (dom, root)
}

impl ArenaDom {
    /// Parse body-level markup into a detached document fragment.
    pub fn parse_fragment(html: &str) -> (ArenaDom, ArenaNodeId) {
        let mut dom = parse_document(html);
        let fragment = dom.create_fragment();
        if let Some(body) = dom.find_by_tag("body") {
            dom.reparent_children(body, fragment);
        }
        (dom, fragment)
    }
}
