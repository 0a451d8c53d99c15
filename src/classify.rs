//! Per-node classification.
//!
//! Every node under the conversion root gets a [`Classification`] before any
//! rule runs. The results live in a side table indexed by [`ArenaNodeId`], so
//! the tree itself is only ever borrowed. `is_code` is inherited from the
//! parent, which is why the table is filled top-down.

use crate::dom::{ArenaDom, ArenaNodeId};
use crate::options::Options;

/// Tags that always start on their own line.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "audio",
    "blockquote",
    "body",
    "canvas",
    "center",
    "dd",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "html",
    "isindex",
    "li",
    "main",
    "menu",
    "nav",
    "noframes",
    "noscript",
    "ol",
    "output",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Tags that cannot have children.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Tags whose presence matters even when they contain no text.
pub const MEANINGFUL_WHEN_BLANK_ELEMENTS: &[&str] = &[
    "a", "table", "thead", "tbody", "tfoot", "th", "td", "iframe", "script", "audio", "video",
];

fn tag_in(set: &[&str], tag: &str) -> bool {
    set.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

pub fn is_block_tag(tag: &str) -> bool {
    tag_in(BLOCK_ELEMENTS, tag)
}

pub fn is_void_tag(tag: &str) -> bool {
    tag_in(VOID_ELEMENTS, tag)
}

pub fn is_meaningful_when_blank_tag(tag: &str) -> bool {
    tag_in(MEANINGFUL_WHEN_BLANK_ELEMENTS, tag)
}

/// Whitespace moved outside an inline node's replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlankingWhitespace {
    pub leading: String,
    pub trailing: String,
}

impl FlankingWhitespace {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}

/// Read-only facts about one node, computed once per render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_block: bool,
    pub is_code: bool,
    pub is_blank: bool,
    pub flanking: FlankingWhitespace,
}

/// Side table of classifications for one render.
#[derive(Debug, Default)]
pub struct Classifications {
    entries: Vec<Option<Classification>>,
}

impl Classifications {
    /// Classify every descendant of `root`, parents before children.
    pub fn build(dom: &ArenaDom, root: ArenaNodeId, options: &Options) -> Self {
        let mut table = Classifications {
            entries: vec![None; dom.len()],
        };
        let root_facts = Classification {
            is_block: tag_of(dom, root).is_some_and(is_block_tag),
            is_code: tag_of(dom, root) == Some("code"),
            ..Classification::default()
        };
        table.set(root, root_facts);

        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            let parent_is_code = table.get(parent).is_some_and(|c| c.is_code);
            for child in dom.children(parent) {
                let facts = classify(dom, child, parent_is_code, options);
                table.set(child, facts);
                stack.push(child);
            }
        }

        table
    }

    pub fn get(&self, id: ArenaNodeId) -> Option<&Classification> {
        if id.is_none() {
            return None;
        }
        self.entries.get(id.index()).and_then(Option::as_ref)
    }

    fn set(&mut self, id: ArenaNodeId, facts: Classification) {
        if let Some(slot) = self.entries.get_mut(id.index()) {
            *slot = Some(facts);
        }
    }
}

fn tag_of(dom: &ArenaDom, id: ArenaNodeId) -> Option<&str> {
    dom.element_name(id).map(|n| n.as_ref())
}

fn classify(
    dom: &ArenaDom,
    id: ArenaNodeId,
    parent_is_code: bool,
    options: &Options,
) -> Classification {
    let Some(tag) = tag_of(dom, id) else {
        return Classification {
            is_code: parent_is_code,
            ..Classification::default()
        };
    };

    let is_block = is_block_tag(tag);
    let is_code = tag.eq_ignore_ascii_case("code") || parent_is_code;
    let flanking = if is_block || (options.preformatted_code && is_code) {
        FlankingWhitespace::default()
    } else {
        flanking_whitespace(dom, id, options)
    };

    Classification {
        is_block,
        is_code,
        is_blank: is_blank(dom, id),
        flanking,
    }
}

/// A node is blank when it has no text and nothing whose presence matters.
pub fn is_blank(dom: &ArenaDom, id: ArenaNodeId) -> bool {
    let Some(tag) = tag_of(dom, id) else {
        return false;
    };
    !is_void_tag(tag)
        && !is_meaningful_when_blank_tag(tag)
        && dom.text_content(id).trim().is_empty()
        && !has_descendant(dom, id, |t| {
            is_void_tag(t) || is_meaningful_when_blank_tag(t)
        })
}

fn has_descendant(dom: &ArenaDom, id: ArenaNodeId, pred: impl Fn(&str) -> bool) -> bool {
    let mut stack: Vec<_> = dom.children(id).collect();
    while let Some(node) = stack.pop() {
        if tag_of(dom, node).is_some_and(&pred) {
            return true;
        }
        stack.extend(dom.children(node));
    }
    false
}

/// Leading and trailing whitespace of a string, split into the ASCII part
/// (`[ \t\r\n]`) at the outer edge and any other whitespace inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeWhitespace<'a> {
    pub leading: &'a str,
    pub leading_ascii: &'a str,
    pub leading_non_ascii: &'a str,
    pub trailing: &'a str,
    pub trailing_non_ascii: &'a str,
    pub trailing_ascii: &'a str,
}

fn is_ascii_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Split a string's edge whitespace. A whitespace-only string is all leading.
pub fn edge_whitespace(s: &str) -> EdgeWhitespace<'_> {
    let body_start = s.find(|c: char| !c.is_whitespace()).unwrap_or(s.len());
    let leading = &s[..body_start];
    let ascii_len = leading.find(|c: char| !is_ascii_ws(c)).unwrap_or(leading.len());

    let rest = &s[body_start..];
    let trailing_start = rest
        .rfind(|c: char| !c.is_whitespace())
        .map(|i| i + rest[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(rest.len());
    let trailing = &rest[trailing_start..];
    let trailing_ascii_start = trailing
        .rfind(|c: char| !is_ascii_ws(c))
        .map(|i| i + trailing[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);

    EdgeWhitespace {
        leading,
        leading_ascii: &leading[..ascii_len],
        leading_non_ascii: &leading[ascii_len..],
        trailing,
        trailing_non_ascii: &trailing[..trailing_ascii_start],
        trailing_ascii: &trailing[trailing_ascii_start..],
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn flanking_whitespace(dom: &ArenaDom, id: ArenaNodeId, options: &Options) -> FlankingWhitespace {
    let text = dom.text_content(id);
    let edges = edge_whitespace(&text);

    let leading = if !edges.leading_ascii.is_empty() && is_flanked(dom, id, Side::Left, options) {
        edges.leading_non_ascii
    } else {
        edges.leading
    };
    let trailing = if !edges.trailing_ascii.is_empty() && is_flanked(dom, id, Side::Right, options)
    {
        edges.trailing_non_ascii
    } else {
        edges.trailing
    };

    FlankingWhitespace {
        leading: leading.to_string(),
        trailing: trailing.to_string(),
    }
}

/// Whether the neighbour on `side` already supplies a space at the boundary.
fn is_flanked(dom: &ArenaDom, id: ArenaNodeId, side: Side, options: &Options) -> bool {
    let sibling = match side {
        Side::Left => dom.prev_sibling(id),
        Side::Right => dom.next_sibling(id),
    };
    let Some(sibling) = sibling else {
        return false;
    };
    let touches_space = |s: &str| match side {
        Side::Left => s.ends_with(' '),
        Side::Right => s.starts_with(' '),
    };

    if let Some(text) = dom.text(sibling) {
        return touches_space(text);
    }
    match tag_of(dom, sibling) {
        Some(tag) if options.preformatted_code && tag.eq_ignore_ascii_case("code") => false,
        Some(tag) if !is_block_tag(tag) => touches_space(&dom.text_content(sibling)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn classify_first(html: &str, tag: &str, options: &Options) -> Classification {
        let dom = parse_document(html);
        let body = dom.find_by_tag("body").unwrap();
        let table = Classifications::build(&dom, body, options);
        let id = dom.find_by_tag(tag).unwrap();
        table.get(id).cloned().unwrap()
    }

    #[test]
    fn test_block_and_code_flags() {
        let options = Options::default();
        assert!(classify_first("<p>x</p>", "p", &options).is_block);
        assert!(!classify_first("<p><em>x</em></p>", "em", &options).is_block);
        assert!(classify_first("<p><code><b>x</b></code></p>", "b", &options).is_code);
        assert!(!classify_first("<p><b>x</b></p>", "b", &options).is_code);
    }

    #[test]
    fn test_blank_elements() {
        let dom = parse_document("<div> <span>\n</span></div><div><img></div><p><a></a></p>");
        let divs: Vec<_> = {
            let body = dom.find_by_tag("body").unwrap();
            dom.children(body).collect()
        };
        assert!(is_blank(&dom, divs[0]));
        // Void descendant
        assert!(!is_blank(&dom, divs[1]));
        // Meaningful-when-blank descendant
        assert!(!is_blank(&dom, divs[2]));
        let a = dom.find_by_tag("a").unwrap();
        assert!(!is_blank(&dom, a));
        let img = dom.find_by_tag("img").unwrap();
        assert!(!is_blank(&dom, img));
    }

    #[test]
    fn test_edge_whitespace_splits_ascii_from_other_spaces() {
        let edges = edge_whitespace(" \u{a0}text\u{a0} ");
        assert_eq!(edges.leading, " \u{a0}");
        assert_eq!(edges.leading_ascii, " ");
        assert_eq!(edges.leading_non_ascii, "\u{a0}");
        assert_eq!(edges.trailing, "\u{a0} ");
        assert_eq!(edges.trailing_non_ascii, "\u{a0}");
        assert_eq!(edges.trailing_ascii, " ");
    }

    #[test]
    fn test_edge_whitespace_whitespace_only_is_leading() {
        let edges = edge_whitespace("  \n");
        assert_eq!(edges.leading, "  \n");
        assert_eq!(edges.trailing, "");
        assert_eq!(edge_whitespace("").leading, "");
    }

    #[test]
    fn test_flanking_whitespace_drops_ascii_next_to_spaces() {
        let options = Options::default();
        // Previous text ends in a space: the element's own leading space is dropped
        let facts = classify_first("<p>a <em> b </em>c</p>", "em", &options);
        assert_eq!(facts.flanking.leading, "");
        assert_eq!(facts.flanking.trailing, " ");
    }

    #[test]
    fn test_preformatted_code_sibling_is_not_flanking() {
        let options = Options::default().with_preformatted_code(true);
        let facts = classify_first("<p><code>x </code><em> y</em></p>", "em", &options);
        assert_eq!(facts.flanking.leading, " ");

        let options = Options::default();
        let facts = classify_first("<p><code>x </code><em> y</em></p>", "em", &options);
        assert_eq!(facts.flanking.leading, "");
    }

    #[test]
    fn test_blocks_have_no_flanking_whitespace() {
        let facts = classify_first("<div> x </div>", "div", &Options::default());
        assert!(facts.flanking.is_empty());
    }
}
