//! Whitespace collapsing over a private copy of the input tree.
//!
//! Source markup is usually indented for humans; that indentation must not
//! reach the Markdown output. This pass walks the tree in document order and
//! rewrites text nodes the way a browser lays out inline whitespace:
//!
//! - runs of `[ \r\n\t]` become a single space
//! - a leading space is dropped when the previous text already ended in one
//! - the trailing space before a block element or `br` is dropped
//! - text that becomes empty, comments and doctypes are removed
//!
//! `pre` subtrees (and `code` when preformatted code is enabled) are skipped.

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};
use crate::classify::{is_block_tag, is_void_tag};

/// Collapse whitespace in every descendant of `root`.
pub fn collapse_whitespace(dom: &mut ArenaDom, root: ArenaNodeId, preformatted_code: bool) {
    let is_pre = |dom: &ArenaDom, id: ArenaNodeId| {
        dom.element_name(id)
            .is_some_and(|n| n.as_ref() == "pre" || (preformatted_code && n.as_ref() == "code"))
    };

    if dom.first_child(root).is_none() || is_pre(dom, root) {
        return;
    }

    let mut prev_text: Option<ArenaNodeId> = None;
    let mut keep_leading_ws = false;
    let mut prev: Option<ArenaNodeId> = None;
    let mut node = next_node(dom, prev, root, &is_pre);

    while node != root && node.is_some() {
        let data = dom.get(node).map(|n| n.data.clone());
        match data {
            Some(ArenaNodeData::Text(text)) => {
                let mut text = squash_spaces(&text);
                let prev_ends_with_space = prev_text
                    .and_then(|id| dom.text(id))
                    .is_none_or(|t| t.ends_with(' '));
                if prev_ends_with_space && !keep_leading_ws && text.starts_with(' ') {
                    text.remove(0);
                }
                if text.is_empty() {
                    node = remove(dom, node);
                    continue;
                }
                dom.set_text(node, text);
                prev_text = Some(node);
            }
            Some(ArenaNodeData::Element { name, .. }) => {
                let tag = name.local.as_ref();
                if is_block_tag(tag) || tag == "br" {
                    if let Some(id) = prev_text {
                        trim_trailing_space(dom, id);
                    }
                    prev_text = None;
                    keep_leading_ws = false;
                } else if is_void_tag(tag) || is_pre(dom, node) {
                    // Spaces around inline void and inline pre elements are significant
                    prev_text = None;
                    keep_leading_ws = true;
                } else if prev_text.is_some() {
                    keep_leading_ws = false;
                }
            }
            _ => {
                node = remove(dom, node);
                continue;
            }
        }

        let following = next_node(dom, prev, node, &is_pre);
        prev = Some(node);
        node = following;
    }

    if let Some(id) = prev_text {
        trim_trailing_space(dom, id);
        if dom.text(id).is_some_and(str::is_empty) {
            dom.detach(id);
        }
    }
}

fn squash_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if matches!(c, ' ' | '\r' | '\n' | '\t') {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

fn trim_trailing_space(dom: &mut ArenaDom, id: ArenaNodeId) {
    if let Some(text) = dom.text(id)
        && let Some(stripped) = text.strip_suffix(' ')
    {
        let stripped = stripped.to_string();
        dom.set_text(id, stripped);
    }
}

/// Detach `node` and return where the walk continues.
fn remove(dom: &mut ArenaDom, node: ArenaNodeId) -> ArenaNodeId {
    let next = dom
        .next_sibling(node)
        .or_else(|| dom.parent(node))
        .unwrap_or(ArenaNodeId::NONE);
    dom.detach(node);
    next
}

/// Pre-order successor of `current`, skipping pre subtrees and returning to
/// the parent once its children are exhausted.
fn next_node<F>(
    dom: &ArenaDom,
    prev: Option<ArenaNodeId>,
    current: ArenaNodeId,
    is_pre: &F,
) -> ArenaNodeId
where
    F: Fn(&ArenaDom, ArenaNodeId) -> bool,
{
    let returning = prev.is_some_and(|p| dom.parent(p) == Some(current));
    let descend = if returning || is_pre(dom, current) {
        None
    } else {
        dom.first_child(current)
    };
    descend
        .or_else(|| dom.next_sibling(current))
        .or_else(|| dom.parent(current))
        .unwrap_or(ArenaNodeId::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn collapsed(html: &str, preformatted_code: bool) -> String {
        let mut dom = parse_document(html);
        let body = dom.find_by_tag("body").unwrap();
        collapse_whitespace(&mut dom, body, preformatted_code);
        crate::dom::inner_html(&dom, body)
    }

    #[test]
    fn test_runs_collapse_to_one_space() {
        assert_eq!(
            collapsed("<p>  Hello \n\t  world  </p>", false),
            "<p>Hello world</p>"
        );
    }

    #[test]
    fn test_indentation_between_blocks_is_removed() {
        assert_eq!(
            collapsed("<div>\n  <p>One</p>\n  <p>Two</p>\n</div>", false),
            "<div><p>One</p><p>Two</p></div>"
        );
    }

    #[test]
    fn test_space_across_inline_boundary_is_kept_once() {
        assert_eq!(
            collapsed("<p>Hello <em> world</em></p>", false),
            "<p>Hello <em>world</em></p>"
        );
    }

    #[test]
    fn test_space_after_inline_void_is_kept() {
        assert_eq!(
            collapsed(r#"<p>a <img src="x"> b</p>"#, false),
            r#"<p>a <img src="x"> b</p>"#
        );
    }

    #[test]
    fn test_pre_is_untouched_and_comments_removed() {
        assert_eq!(
            collapsed("<pre>  a\n   b</pre><!-- note --><p> c </p>", false),
            "<pre>  a\n   b</pre><p>c</p>"
        );
    }

    #[test]
    fn test_preformatted_code_keeps_code_whitespace() {
        assert_eq!(
            collapsed("<p>x <code>  a   b </code></p>", true),
            "<p>x <code>  a   b </code></p>"
        );
        assert_eq!(
            collapsed("<p>x <code>  a   b </code></p>", false),
            "<p>x <code>a b</code></p>"
        );
    }
}
