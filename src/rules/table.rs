//! Rule resolution.
//!
//! Precedence is a fixed pipeline of stages, each an ordered list:
//! blank, retention, added (newest first), built-in, keep (newest first),
//! remove (newest first), default.

use log::trace;

use super::{retention, Append, Filter, Rule};
use crate::node::NodeRef;
use crate::options::{HtmlRetentionMode, Options};

#[derive(Clone)]
pub(crate) struct RuleTable {
    blank: Rule,
    retention: Option<(&'static str, Rule)>,
    added: Vec<(String, Rule)>,
    keep: Vec<Rule>,
    remove: Vec<Rule>,
    default: Rule,
}

impl RuleTable {
    pub(crate) fn new(options: &Options) -> Self {
        let unsupported = || Filter::predicate(|node, _| retention::is_unsupported(node));
        let retention = match options.html_retention_mode {
            HtmlRetentionMode::Standard => None,
            HtmlRetentionMode::PreserveAll => Some((
                "preserveAll",
                Rule::from_replacement(unsupported(), options.keep_replacement.clone()).verbatim(),
            )),
            HtmlRetentionMode::MarkdownIncludingHtml => Some((
                "markdownIncludingHtml",
                Rule::from_replacement(
                    unsupported(),
                    options.markdown_including_html_replacement.clone(),
                ),
            )),
        };

        Self {
            blank: Rule::from_replacement(
                Filter::predicate(|node, _| node.is_blank()),
                options.blank_replacement.clone(),
            ),
            retention,
            added: Vec::new(),
            keep: Vec::new(),
            remove: Vec::new(),
            default: Rule::from_replacement(
                Filter::predicate(|_, _| true),
                options.default_replacement.clone(),
            ),
        }
    }

    /// Added rules take precedence over every built-in and earlier addition.
    pub(crate) fn add(&mut self, key: String, rule: Rule) {
        self.added.insert(0, (key, rule));
    }

    pub(crate) fn keep(&mut self, filter: Filter, options: &Options) {
        let rule = Rule::from_replacement(filter, options.keep_replacement.clone()).verbatim();
        self.keep.insert(0, rule);
    }

    pub(crate) fn remove(&mut self, filter: Filter) {
        let rule = Rule::new(filter, |_, _, _| String::new()).verbatim();
        self.remove.insert(0, rule);
    }

    /// The rule for `node`, with the name it was registered under.
    pub(crate) fn resolve<'r>(
        &'r self,
        node: &NodeRef<'_>,
        options: &'r Options,
    ) -> (&'r str, &'r Rule) {
        let (key, rule) = self.lookup(node, options);
        trace!("{:?} -> {}", node, key);
        (key, rule)
    }

    fn lookup<'r>(&'r self, node: &NodeRef<'_>, options: &'r Options) -> (&'r str, &'r Rule) {
        if node.is_blank() {
            return ("blankRule", &self.blank);
        }
        if let Some((key, rule)) = &self.retention
            && rule.matches(node, options)
        {
            return (*key, rule);
        }
        let named = self
            .added
            .iter()
            .map(|(k, r)| (k.as_str(), r))
            .chain(options.rules.iter());
        for (key, rule) in named {
            if rule.matches(node, options) {
                return (key, rule);
            }
        }
        if let Some(rule) = self.keep.iter().find(|r| r.matches(node, options)) {
            return ("keep", rule);
        }
        if let Some(rule) = self.remove.iter().find(|r| r.matches(node, options)) {
            return ("remove", rule);
        }
        ("defaultRule", &self.default)
    }

    /// Append hooks of added and built-in rules, in precedence order.
    pub(crate) fn appenders<'r>(&'r self, options: &'r Options) -> impl Iterator<Item = &'r Append> {
        self.added
            .iter()
            .map(|(_, r)| r)
            .chain(options.rules.iter().map(|(_, r)| r))
            .filter_map(|r| r.append.as_ref())
    }
}
