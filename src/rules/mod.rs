//! Conversion rules.
//!
//! A [`Rule`] pairs a [`Filter`] that selects nodes with a replacement
//! function that turns a node's converted content into Markdown. Rules may
//! also carry an append hook, run once after the whole tree is converted,
//! which is how deferred output such as reference-link definitions is
//! emitted.
//!
//! Per-render state lives in [`RenderContext`], which is created fresh for
//! every call to [`TurndownService::render`](crate::TurndownService::render)
//! and threaded through every replacement.

pub mod commonmark;
pub mod retention;
mod table;

pub(crate) use table::RuleTable;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::classify::is_void_tag;
use crate::node::NodeRef;
use crate::options::Options;

/// Turns `(content, node, context)` into Markdown.
pub type Replacement =
    Arc<dyn Fn(&str, &NodeRef<'_>, &mut RenderContext<'_>) -> String + Send + Sync>;

/// Emits trailing output once a render has finished.
pub type Append = Arc<dyn Fn(&mut RenderContext<'_>) -> String + Send + Sync>;

pub type Predicate = Arc<dyn Fn(&NodeRef<'_>, &Options) -> bool + Send + Sync>;

/// Wrap a closure as a [`Replacement`].
pub fn replacement<F>(f: F) -> Replacement
where
    F: Fn(&str, &NodeRef<'_>, &mut RenderContext<'_>) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Selects the nodes a rule applies to.
#[derive(Clone)]
pub enum Filter {
    /// Elements whose tag is one of these, compared case-insensitively.
    Tags(Vec<String>),
    /// Arbitrary test over the node and the active options.
    Predicate(Predicate),
}

impl Filter {
    pub fn tag(tag: impl Into<String>) -> Self {
        Filter::Tags(vec![tag.into()])
    }

    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::Tags(tags.into_iter().map(Into::into).collect())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&NodeRef<'_>, &Options) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Arc::new(f))
    }

    pub fn matches(&self, node: &NodeRef<'_>, options: &Options) -> bool {
        match self {
            Filter::Tags(tags) => node
                .tag()
                .is_some_and(|tag| tags.iter().any(|t| t.eq_ignore_ascii_case(tag))),
            Filter::Predicate(predicate) => predicate(node, options),
        }
    }
}

impl From<&str> for Filter {
    fn from(tag: &str) -> Self {
        Filter::tag(tag)
    }
}

impl From<String> for Filter {
    fn from(tag: String) -> Self {
        Filter::tag(tag)
    }
}

impl From<&[&str]> for Filter {
    fn from(tags: &[&str]) -> Self {
        Filter::tags(tags.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Filter {
    fn from(tags: [&str; N]) -> Self {
        Filter::tags(tags)
    }
}

impl From<Vec<String>> for Filter {
    fn from(tags: Vec<String>) -> Self {
        Filter::Tags(tags)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Tags(tags) => f.debug_tuple("Tags").field(tags).finish(),
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A filter and the replacement applied to the nodes it selects.
#[derive(Clone)]
pub struct Rule {
    pub filter: Filter,
    pub replacement: Replacement,
    pub append: Option<Append>,
    verbatim: bool,
}

impl Rule {
    pub fn new<F>(filter: impl Into<Filter>, replacement: F) -> Self
    where
        F: Fn(&str, &NodeRef<'_>, &mut RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        Self::from_replacement(filter, Arc::new(replacement))
    }

    pub fn from_replacement(filter: impl Into<Filter>, replacement: Replacement) -> Self {
        Self {
            filter: filter.into(),
            replacement,
            append: None,
            verbatim: false,
        }
    }

    /// Attach a hook whose output is joined onto the end of the document.
    pub fn with_append<F>(mut self, append: F) -> Self
    where
        F: Fn(&mut RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.append = Some(Arc::new(append));
        self
    }

    /// Skip converting the matched node's children; the replacement gets
    /// an empty content string and works from the node alone.
    pub fn verbatim(mut self) -> Self {
        self.verbatim = true;
        self
    }

    pub fn is_verbatim(&self) -> bool {
        self.verbatim
    }

    pub fn matches(&self, node: &NodeRef<'_>, options: &Options) -> bool {
        self.filter.matches(node, options)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("filter", &self.filter)
            .field("append", &self.append.is_some())
            .field("verbatim", &self.verbatim)
            .finish_non_exhaustive()
    }
}

/// Named rules kept in precedence order.
#[derive(Clone, Default, Debug)]
pub struct RuleSet {
    rules: Vec<(String, Rule)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rule stored under `key` in place, or append it.
    pub fn insert(&mut self, key: impl Into<String>, rule: Rule) {
        let key = key.into();
        match self.rules.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = rule,
            None => self.rules.push((key, rule)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn remove(&mut self, key: &str) -> Option<Rule> {
        let index = self.rules.iter().position(|(k, _)| k == key)?;
        Some(self.rules.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Pending reference-link definitions for one render.
#[derive(Debug, Default)]
pub struct References {
    definitions: Vec<String>,
    seen: HashSet<String>,
    labels: HashSet<String>,
    ids: HashMap<(String, String), usize>,
    next_id: usize,
}

impl References {
    /// Id for a numbered reference to `href` with `title`.
    ///
    /// With `reuse` set, an identical `(href, title)` pair gets the id it
    /// was first given and `false` is returned alongside it; otherwise a
    /// new id is minted.
    pub fn id_for(&mut self, href: &str, title: &str, reuse: bool) -> (usize, bool) {
        let key = (href.to_string(), title.to_string());
        if reuse && let Some(&id) = self.ids.get(&key) {
            return (id, false);
        }
        self.next_id += 1;
        self.ids.entry(key).or_insert(self.next_id);
        (self.next_id, true)
    }

    /// Queue a definition line.
    pub fn define(&mut self, definition: String) {
        self.seen.insert(definition.clone());
        self.definitions.push(definition);
    }

    /// Queue a definition line unless an identical one is already queued.
    pub fn define_once(&mut self, definition: String) {
        if !self.seen.contains(&definition) {
            self.define(definition);
        }
    }

    /// Queue the definition for `label` unless that label already has one.
    ///
    /// Collapsed and shortcut references are resolved by label alone, so a
    /// later link with the same label cannot get its own definition.
    pub fn define_label(&mut self, label: &str, definition: String) {
        if self.labels.insert(label.to_string()) {
            self.define(definition);
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Take every queued definition as a trailing block and reset.
    pub fn flush(&mut self) -> String {
        if self.definitions.is_empty() {
            return String::new();
        }
        let block = format!("\n\n{}\n\n", self.definitions.join("\n"));
        *self = References::default();
        block
    }
}

/// State threaded through one render.
#[derive(Debug)]
pub struct RenderContext<'o> {
    options: &'o Options,
    references: References,
}

impl<'o> RenderContext<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self {
            options,
            references: References::default(),
        }
    }

    pub fn options(&self) -> &'o Options {
        self.options
    }

    pub fn references(&self) -> &References {
        &self.references
    }

    pub fn references_mut(&mut self) -> &mut References {
        &mut self.references
    }
}

/// Blank nodes vanish, leaving a paragraph break if they were blocks.
pub fn blank_replacement() -> Replacement {
    replacement(|_, node, _| {
        if node.is_block() {
            "\n\n".to_string()
        } else {
            String::new()
        }
    })
}

/// Kept nodes are written back as raw markup.
pub fn keep_replacement() -> Replacement {
    replacement(|_, node, _| block_pad(node, node.outer_html()))
}

/// Unsupported nodes keep their tags around converted content. Void
/// elements have neither, so they are written as the opening tag alone.
pub fn markdown_including_html_replacement() -> Replacement {
    replacement(|content, node, _| {
        let open = node.open_tag(&[("markdown", "1")]);
        if node.tag().is_some_and(is_void_tag) {
            return block_pad(node, open);
        }
        let wrapped = format!(
            "{}\n{}\n{}",
            open,
            content.trim_matches('\n'),
            node.close_tag()
        );
        block_pad(node, wrapped)
    })
}

/// Unmatched nodes contribute only their content.
pub fn default_replacement() -> Replacement {
    replacement(|content, node, _| block_pad(node, content.to_string()))
}

fn block_pad(node: &NodeRef<'_>, text: String) -> String {
    if node.is_block() {
        format!("\n\n{text}\n\n")
    } else {
        text
    }
}
