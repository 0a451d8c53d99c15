//! # turndown
//!
//! Rule-driven HTML to Markdown conversion.
//!
//! ## Features
//!
//! - CommonMark output for paragraphs, headings, lists, block quotes, code,
//!   links, images, emphasis and rules
//! - Setext or ATX headings, fenced or indented code, inline or reference links
//! - Overridable rules: add your own, keep elements as HTML, or remove them
//! - HTML retention modes for markup Markdown cannot express
//!
//! ## Quick Start
//!
//! ```
//! use turndown::TurndownService;
//!
//! let service = TurndownService::new();
//! let markdown = service.render("<p>Hello <em>world</em></p>").unwrap();
//! assert_eq!(markdown, "Hello _world_");
//! ```
//!
//! ## Configuring
//!
//! ```
//! use turndown::{CodeBlockStyle, HeadingStyle, Options, TurndownService};
//!
//! let options = Options::default()
//!     .with_heading_style(HeadingStyle::Atx)
//!     .with_code_block_style(CodeBlockStyle::Fenced);
//! let service = TurndownService::with_options(options).unwrap();
//!
//! let markdown = service
//!     .render("<h2>Usage</h2><pre><code class=\"language-sh\">make</code></pre>")
//!     .unwrap();
//! assert_eq!(markdown, "## Usage\n\n```sh\nmake\n```");
//! ```
//!
//! ## Custom Rules
//!
//! Rules added to a service take precedence over the built-in ones:
//!
//! ```
//! use turndown::{Rule, TurndownService};
//!
//! let mut service = TurndownService::new();
//! service.add_rule(
//!     "strikethrough",
//!     Rule::new(["del", "s"], |content, _, _| format!("~~{content}~~")),
//! );
//! service.keep("kbd");
//!
//! let markdown = service.render("<p><del>old</del> <kbd>Ctrl</kbd></p>").unwrap();
//! assert_eq!(markdown, "~~old~~ <kbd>Ctrl</kbd>");
//! ```

pub mod classify;
pub mod css;
pub mod dom;
pub mod error;
pub mod escape;
pub mod node;
pub mod options;
pub mod rules;
mod service;
#[cfg(feature = "serde")]
pub mod settings;
pub mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use escape::{calculate_fence_length, calculate_inline_code_ticks, escape_markdown};
pub use node::NodeRef;
pub use options::{
    BulletListMarker, CodeBlockStyle, EmDelimiter, HeadingStyle, HtmlRetentionMode,
    LinkReferenceDeduplication, LinkReferenceStyle, LinkStyle, ListItemIndent, Options,
    StrongDelimiter,
};
pub use rules::{Filter, References, RenderContext, Rule, RuleSet};
pub use service::{join, EscapeFn, Input, Plugin, TurndownService};
#[cfg(feature = "serde")]
pub use settings::Settings;
