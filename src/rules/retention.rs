//! Support tests for HTML retention and code-block detection.

use crate::css::{is_monospace_family, parse_declarations};
use crate::node::NodeRef;

/// Tags the built-in rules express in Markdown.
pub const STANDARD_TAGS: &[&str] = &[
    "a",
    "b",
    "blockquote",
    "body",
    "br",
    "code",
    "em",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "hr",
    "html",
    "i",
    "img",
    "li",
    "ol",
    "p",
    "pre",
    "strong",
    "ul",
];

/// Whether an element carries markup the built-in rules would lose.
///
/// Non-standard tags are always unsupported. Standard tags are unsupported
/// as soon as they carry an attribute outside their allowance: `src`, `alt`
/// and `title` on images, `href` and `title` on links, `class` on a `code`
/// inside `pre`, nothing anywhere else.
pub fn is_unsupported(node: &NodeRef<'_>) -> bool {
    let Some(tag) = node.tag() else {
        return false;
    };
    if !STANDARD_TAGS.contains(&tag) {
        return true;
    }

    let allowed: &[&str] = match tag {
        "pre" => {
            if let Some(code) = node.first_child().filter(|c| c.is("code"))
                && has_attrs_outside(&code, &["class"])
            {
                return true;
            }
            &[]
        }
        "code" if node.parent().is_some_and(|p| p.is("pre")) => &["class"],
        "img" => &["src", "alt", "title"],
        "a" => &["href", "title"],
        _ => &[],
    };
    has_attrs_outside(node, allowed)
}

fn has_attrs_outside(node: &NodeRef<'_>, allowed: &[&str]) -> bool {
    node.attrs()
        .iter()
        .any(|attr| !allowed.iter().any(|a| a.eq_ignore_ascii_case(attr.local_name())))
}

/// Whether `node` is a `pre` shaped like a code block.
///
/// Besides the usual `pre > code` pair this recognizes a `pre` inside a
/// table cell classed `code` and a `pre` styled with a monospace font.
pub fn is_code_block(node: &NodeRef<'_>) -> bool {
    if !node.is("pre") {
        return false;
    }
    let in_code_cell = node
        .parent()
        .is_some_and(|p| p.is("td") && has_class(&p, "code"));
    if in_code_cell || has_monospace_style(node) {
        return true;
    }
    node.first_child().is_some_and(|c| c.is("code"))
}

fn has_class(node: &NodeRef<'_>, class: &str) -> bool {
    node.dom().element_classes(node.id()).any(|c| c == class)
}

fn has_monospace_style(node: &NodeRef<'_>) -> bool {
    node.attr("style").is_some_and(|style| {
        parse_declarations(style)
            .iter()
            .any(|d| d.property == "font-family" && is_monospace_family(&d.value))
    })
}
