//! Conversion options.
//!
//! [`Options`] holds every recognized setting with its default, the table of
//! built-in rules, and the four pluggable replacements used for blank, kept,
//! retained and otherwise unmatched nodes. It is fixed once a
//! [`TurndownService`](crate::TurndownService) is built.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::rules::{self, Replacement, RenderContext, RuleSet};
use crate::node::NodeRef;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $( $(#[$vmeta])* #[cfg_attr(feature = "serde", serde(rename = $text))] $variant, )+
        }

        impl $name {
            /// All accepted spellings, in declaration order.
            pub const VARIANTS: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(Error::InvalidOption(format!(
                        "{} must be one of {:?}, got {:?}",
                        stringify!($name),
                        Self::VARIANTS,
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// How `h1` and `h2` are written.
    pub enum HeadingStyle {
        /// Underlined with `=` or `-`.
        Setext => "setext",
        /// Prefixed with `#`.
        Atx => "atx",
    }
}

string_enum! {
    pub enum BulletListMarker {
        Asterisk => "*",
        Dash => "-",
        Plus => "+",
    }
}

string_enum! {
    /// Unit used to indent nested list items.
    pub enum ListItemIndent {
        Tab => "tab",
        Space => "space",
    }
}

string_enum! {
    pub enum CodeBlockStyle {
        Indented => "indented",
        Fenced => "fenced",
    }
}

string_enum! {
    pub enum EmDelimiter {
        Underscore => "_",
        Asterisk => "*",
    }
}

string_enum! {
    pub enum StrongDelimiter {
        Asterisks => "**",
        Underscores => "__",
    }
}

string_enum! {
    pub enum LinkStyle {
        Inlined => "inlined",
        Referenced => "referenced",
    }
}

string_enum! {
    /// Shape of reference-style links.
    pub enum LinkReferenceStyle {
        /// `[text][1]` with `[1]: href`.
        Full => "full",
        /// `[text][]` with `[text]: href`.
        Collapsed => "collapsed",
        /// `[text]` with `[text]: href`.
        Shortcut => "shortcut",
    }
}

string_enum! {
    pub enum LinkReferenceDeduplication {
        None => "none",
        /// Identical references share one definition.
        Full => "full",
    }
}

string_enum! {
    /// What happens to elements the rule set cannot express in Markdown.
    pub enum HtmlRetentionMode {
        /// Convert everything; unsupported markup is flattened.
        Standard => "standard",
        /// Keep unsupported elements as raw markup.
        PreserveAll => "preserveAll",
        /// Keep unsupported elements' tags, converting their content.
        MarkdownIncludingHtml => "markdownIncludingHtml",
    }
}

/// Conversion settings.
#[derive(Clone)]
pub struct Options {
    pub heading_style: HeadingStyle,
    pub hr: String,
    pub bullet_list_marker: BulletListMarker,
    /// Spaces between a list marker and the item text (1..=4).
    pub list_marker_space_count: usize,
    pub list_item_indent: ListItemIndent,
    /// Spaces per nesting level when indenting with spaces (2 or 4).
    pub list_item_indent_space_count: usize,
    pub code_block_style: CodeBlockStyle,
    /// Fence string; its first character is repeated when the fence must grow.
    pub fence: String,
    pub em_delimiter: EmDelimiter,
    pub strong_delimiter: StrongDelimiter,
    pub link_style: LinkStyle,
    pub link_reference_style: LinkReferenceStyle,
    pub link_reference_deduplication: LinkReferenceDeduplication,
    pub br: String,
    /// Keep whitespace inside `code` elements as written.
    pub preformatted_code: bool,
    pub html_retention_mode: HtmlRetentionMode,
    /// Named built-in rules, in precedence order.
    pub rules: RuleSet,
    pub blank_replacement: Replacement,
    pub keep_replacement: Replacement,
    pub markdown_including_html_replacement: Replacement,
    pub default_replacement: Replacement,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            hr: "* * *".to_string(),
            bullet_list_marker: BulletListMarker::Asterisk,
            list_marker_space_count: 3,
            list_item_indent: ListItemIndent::Space,
            list_item_indent_space_count: 4,
            code_block_style: CodeBlockStyle::Indented,
            fence: "```".to_string(),
            em_delimiter: EmDelimiter::Underscore,
            strong_delimiter: StrongDelimiter::Asterisks,
            link_style: LinkStyle::Inlined,
            link_reference_style: LinkReferenceStyle::Full,
            link_reference_deduplication: LinkReferenceDeduplication::None,
            br: "  ".to_string(),
            preformatted_code: false,
            html_retention_mode: HtmlRetentionMode::Standard,
            rules: rules::commonmark::rules(),
            blank_replacement: rules::blank_replacement(),
            keep_replacement: rules::keep_replacement(),
            markdown_including_html_replacement: rules::markdown_including_html_replacement(),
            default_replacement: rules::default_replacement(),
        }
    }
}

impl Options {
    pub fn with_heading_style(mut self, style: HeadingStyle) -> Self {
        self.heading_style = style;
        self
    }

    pub fn with_hr(mut self, hr: impl Into<String>) -> Self {
        self.hr = hr.into();
        self
    }

    pub fn with_bullet_list_marker(mut self, marker: BulletListMarker) -> Self {
        self.bullet_list_marker = marker;
        self
    }

    pub fn with_list_marker_space_count(mut self, count: usize) -> Self {
        self.list_marker_space_count = count;
        self
    }

    pub fn with_list_item_indent(mut self, indent: ListItemIndent) -> Self {
        self.list_item_indent = indent;
        self
    }

    pub fn with_list_item_indent_space_count(mut self, count: usize) -> Self {
        self.list_item_indent_space_count = count;
        self
    }

    pub fn with_code_block_style(mut self, style: CodeBlockStyle) -> Self {
        self.code_block_style = style;
        self
    }

    pub fn with_fence(mut self, fence: impl Into<String>) -> Self {
        self.fence = fence.into();
        self
    }

    pub fn with_em_delimiter(mut self, delimiter: EmDelimiter) -> Self {
        self.em_delimiter = delimiter;
        self
    }

    pub fn with_strong_delimiter(mut self, delimiter: StrongDelimiter) -> Self {
        self.strong_delimiter = delimiter;
        self
    }

    pub fn with_link_style(mut self, style: LinkStyle) -> Self {
        self.link_style = style;
        self
    }

    pub fn with_link_reference_style(mut self, style: LinkReferenceStyle) -> Self {
        self.link_reference_style = style;
        self
    }

    pub fn with_link_reference_deduplication(mut self, dedup: LinkReferenceDeduplication) -> Self {
        self.link_reference_deduplication = dedup;
        self
    }

    pub fn with_br(mut self, br: impl Into<String>) -> Self {
        self.br = br.into();
        self
    }

    pub fn with_preformatted_code(mut self, preformatted: bool) -> Self {
        self.preformatted_code = preformatted;
        self
    }

    pub fn with_html_retention_mode(mut self, mode: HtmlRetentionMode) -> Self {
        self.html_retention_mode = mode;
        self
    }

    /// Replace a built-in rule by name, or append a new named rule.
    pub fn with_rule(mut self, key: impl Into<String>, rule: rules::Rule) -> Self {
        self.rules.insert(key, rule);
        self
    }

    pub fn with_blank_replacement<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &NodeRef<'_>, &mut RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.blank_replacement = std::sync::Arc::new(f);
        self
    }

    pub fn with_keep_replacement<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &NodeRef<'_>, &mut RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.keep_replacement = std::sync::Arc::new(f);
        self
    }

    pub fn with_markdown_including_html_replacement<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &NodeRef<'_>, &mut RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.markdown_including_html_replacement = std::sync::Arc::new(f);
        self
    }

    pub fn with_default_replacement<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &NodeRef<'_>, &mut RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.default_replacement = std::sync::Arc::new(f);
        self
    }

    /// Check the numeric and string settings that have a restricted range.
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.list_marker_space_count) {
            return Err(Error::InvalidOption(format!(
                "listMarkerSpaceCount must be between 1 and 4, got {}",
                self.list_marker_space_count
            )));
        }
        if !matches!(self.list_item_indent_space_count, 2 | 4) {
            return Err(Error::InvalidOption(format!(
                "listItemIndentSpaceCount must be 2 or 4, got {}",
                self.list_item_indent_space_count
            )));
        }
        if self.fence.is_empty() {
            return Err(Error::InvalidOption("fence must not be empty".to_string()));
        }
        Ok(())
    }

    /// Character repeated to build code fences.
    pub fn fence_char(&self) -> char {
        self.fence.chars().next().unwrap_or('`')
    }

    /// One level of list nesting.
    pub fn indent_unit(&self) -> String {
        match self.list_item_indent {
            ListItemIndent::Tab => "\t".to_string(),
            ListItemIndent::Space => " ".repeat(self.list_item_indent_space_count),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("heading_style", &self.heading_style)
            .field("hr", &self.hr)
            .field("bullet_list_marker", &self.bullet_list_marker)
            .field("list_marker_space_count", &self.list_marker_space_count)
            .field("list_item_indent", &self.list_item_indent)
            .field(
                "list_item_indent_space_count",
                &self.list_item_indent_space_count,
            )
            .field("code_block_style", &self.code_block_style)
            .field("fence", &self.fence)
            .field("em_delimiter", &self.em_delimiter)
            .field("strong_delimiter", &self.strong_delimiter)
            .field("link_style", &self.link_style)
            .field("link_reference_style", &self.link_reference_style)
            .field(
                "link_reference_deduplication",
                &self.link_reference_deduplication,
            )
            .field("br", &self.br)
            .field("preformatted_code", &self.preformatted_code)
            .field("html_retention_mode", &self.html_retention_mode)
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
