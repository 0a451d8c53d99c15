//! The conversion engine.
//!
//! [`TurndownService`] owns the options and the rule table. Each call to
//! [`render`](TurndownService::render) works on a private copy of the tree:
//! whitespace is collapsed, every node is classified, then the tree is
//! walked depth-first and each node's replacement is stitched onto the
//! output with [`join`].

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::classify::Classifications;
use crate::dom::{self, ArenaDom, ArenaNodeData, ArenaNodeId};
use crate::error::{Error, Result};
use crate::escape::escape_markdown;
use crate::node::NodeRef;
use crate::options::Options;
use crate::rules::{retention, Filter, RenderContext, Rule, RuleTable};
use crate::util;

/// Text escaping function used for every non-code text node.
pub type EscapeFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// What to convert.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    /// Markup, parsed as body content.
    Html(&'a str),
    /// A node of an existing tree. Must be an element, document or fragment.
    Node(&'a ArenaDom, ArenaNodeId),
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(html: &'a str) -> Self {
        Input::Html(html)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(html: &'a String) -> Self {
        Input::Html(html)
    }
}

impl<'a> From<(&'a ArenaDom, ArenaNodeId)> for Input<'a> {
    fn from((dom, id): (&'a ArenaDom, ArenaNodeId)) -> Self {
        Input::Node(dom, id)
    }
}

/// Registers a group of rules on a service.
pub trait Plugin {
    fn apply(self, service: &mut TurndownService);
}

impl<F> Plugin for F
where
    F: FnOnce(&mut TurndownService),
{
    fn apply(self, service: &mut TurndownService) {
        self(service)
    }
}

/// HTML to Markdown converter.
///
/// # Example
///
/// ```
/// use turndown::TurndownService;
///
/// let service = TurndownService::new();
/// let markdown = service.render("<h1>Hello</h1><p>World</p>").unwrap();
/// assert_eq!(markdown, "Hello\n=====\n\nWorld");
/// ```
#[derive(Clone)]
pub struct TurndownService {
    options: Options,
    rules: RuleTable,
    escape: EscapeFn,
}

impl Default for TurndownService {
    fn default() -> Self {
        Self::new()
    }
}

impl TurndownService {
    /// A service with the default options.
    pub fn new() -> Self {
        Self::build(Options::default())
    }

    /// A service with custom options, which are validated first.
    pub fn with_options(options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(options))
    }

    fn build(options: Options) -> Self {
        Self {
            rules: RuleTable::new(&options),
            options,
            escape: Arc::new(escape_markdown),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Convert markup or a node to Markdown.
    ///
    /// A node of any kind other than element, document or fragment is
    /// rejected with [`Error::InvalidInput`]. The caller's tree is never
    /// modified.
    pub fn render<'a>(&self, input: impl Into<Input<'a>>) -> Result<String> {
        let (mut dom, root) = match input.into() {
            Input::Html("") => return Ok(String::new()),
            Input::Html(html) => dom::parse_root(html),
            Input::Node(source, id) => {
                match source.get(id).map(|n| &n.data) {
                    Some(
                        ArenaNodeData::Element { .. }
                        | ArenaNodeData::Document
                        | ArenaNodeData::Fragment,
                    ) => {}
                    Some(other) => return Err(Error::InvalidInput(other.kind().to_string())),
                    None => return Err(Error::InvalidInput("null".to_string())),
                }
                source.clone_subtree(id)
            }
        };
        debug!("Rendering tree of {} nodes", dom.len());

        dom::collapse_whitespace(&mut dom, root, self.options.preformatted_code);
        let facts = Classifications::build(&dom, root, &self.options);
        let mut ctx = RenderContext::new(&self.options);

        let output = self.process(NodeRef::new(&dom, root, &facts), &mut ctx);
        let output = self.post_process(output, &mut ctx);
        debug!("Rendered {} bytes of Markdown", output.len());
        Ok(output)
    }

    /// Decode markup bytes (UTF-8, then its `<meta charset>`, then
    /// Windows-1252) and convert them.
    pub fn render_bytes(&self, bytes: &[u8]) -> Result<String> {
        let html = util::decode_html(bytes);
        self.render(&*html)
    }

    pub fn use_plugin(&mut self, plugin: impl Plugin) -> &mut Self {
        debug!("Applying plugin");
        plugin.apply(self);
        self
    }

    pub fn use_plugins<I>(&mut self, plugins: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Plugin,
    {
        for plugin in plugins {
            self.use_plugin(plugin);
        }
        self
    }

    /// Register a rule ahead of every built-in and previously added rule.
    pub fn add_rule(&mut self, key: impl Into<String>, rule: Rule) -> &mut Self {
        let key = key.into();
        debug!("Adding rule {key}");
        self.rules.add(key, rule);
        self
    }

    /// Keep matching elements as raw markup when no other rule applies.
    pub fn keep(&mut self, filter: impl Into<Filter>) -> &mut Self {
        let filter = filter.into();
        debug!("Keeping {filter:?}");
        self.rules.keep(filter, &self.options);
        self
    }

    /// Drop matching elements, content included, when no other rule applies.
    pub fn remove(&mut self, filter: impl Into<Filter>) -> &mut Self {
        let filter = filter.into();
        debug!("Removing {filter:?}");
        self.rules.remove(filter);
        self
    }

    /// Escape Markdown syntax in plain text with the active escape function.
    pub fn escape(&self, text: &str) -> String {
        (self.escape)(text)
    }

    /// Replace the escape function.
    pub fn set_escape<F>(&mut self, escape: F) -> &mut Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.escape = Arc::new(escape);
        self
    }

    /// Whether `node` is a `pre` shaped like a code block.
    pub fn is_code_block(&self, node: &NodeRef<'_>) -> bool {
        retention::is_code_block(node)
    }

    fn process(&self, parent: NodeRef<'_>, ctx: &mut RenderContext<'_>) -> String {
        let mut output = String::new();
        for child in parent.children() {
            let replacement = if let Some(text) = child.text() {
                let text = if follows_checkbox(&child) {
                    text.trim_start()
                } else {
                    text
                };
                if child.is_code() {
                    text.to_string()
                } else {
                    self.escape(text)
                }
            } else if child.is_element() {
                self.replacement_for_node(child, ctx)
            } else {
                String::new()
            };
            output = join(&output, &replacement);
        }
        output
    }

    fn replacement_for_node(&self, node: NodeRef<'_>, ctx: &mut RenderContext<'_>) -> String {
        let (_, rule) = self.rules.resolve(&node, &self.options);
        let content = if rule.is_verbatim() {
            String::new()
        } else {
            self.process(node, ctx)
        };

        let whitespace = node.flanking_whitespace();
        let content = if whitespace.is_empty() {
            content.as_str()
        } else {
            content.trim()
        };

        let replacement = (rule.replacement)(content, &node, ctx);
        format!("{}{replacement}{}", whitespace.leading, whitespace.trailing)
    }

    fn post_process(&self, mut output: String, ctx: &mut RenderContext<'_>) -> String {
        for append in self.rules.appenders(&self.options) {
            output = join(&output, &append(ctx));
        }
        output
            .trim_start_matches(['\t', '\r', '\n'])
            .trim_end()
            .to_string()
    }
}

impl fmt::Debug for TurndownService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurndownService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A text node right after a checkbox drops its leading whitespace.
fn follows_checkbox(node: &NodeRef<'_>) -> bool {
    node.prev_sibling().is_some_and(|prev| {
        prev.is("input")
            && prev
                .attr("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
    })
}

/// Append `replacement` to `output`, separating them by the larger of their
/// facing newline runs, capped at two.
///
/// # Examples
///
/// ```
/// use turndown::join;
///
/// assert_eq!(join("a\n\n", "\n\nb"), "a\n\nb");
/// assert_eq!(join("a\n\n\n", "\nb"), "a\n\nb");
/// assert_eq!(join("a", "b"), "ab");
/// assert_eq!(join("a\n", "b"), "a\nb");
/// ```
pub fn join(output: &str, replacement: &str) -> String {
    let head = output.trim_end_matches('\n');
    let tail = replacement.trim_start_matches('\n');
    let newlines = (output.len() - head.len())
        .max(replacement.len() - tail.len())
        .min(2);

    let mut joined = String::with_capacity(head.len() + newlines + tail.len());
    joined.push_str(head);
    joined.push_str(&"\n".repeat(newlines));
    joined.push_str(tail);
    joined
}
