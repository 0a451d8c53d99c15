//! Raw markup serialization for keep and retention output.
//!
//! Produces HTML the way a browser's `outerHTML` would: attribute values and
//! text are escaped, void elements get no closing tag, and the contents of
//! raw text elements (`script`, `style`, ...) are written verbatim.

use std::fmt::Write;

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};
use crate::classify::is_void_tag;

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "script",
    "style",
    "xmp",
];

/// Serialize a node and its descendants.
pub fn outer_html(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    write_node(dom, id, &mut out);
    out
}

/// Serialize only the descendants of a node.
pub fn inner_html(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    for child in dom.children(id) {
        write_node(dom, child, &mut out);
    }
    out
}

/// The opening tag of an element with `extra` attributes applied.
///
/// An extra attribute the element already carries has its value replaced in
/// place; the rest are appended. Returns an empty string for non-element
/// nodes.
pub fn open_tag(dom: &ArenaDom, id: ArenaNodeId, extra: &[(&str, &str)]) -> String {
    let Some(name) = dom.element_name(id) else {
        return String::new();
    };
    let override_for = |attr_name: &str| {
        extra
            .iter()
            .find(|(extra_name, _)| extra_name.eq_ignore_ascii_case(attr_name))
            .map(|(_, value)| *value)
    };

    let mut out = String::new();
    out.push('<');
    out.push_str(name);
    for attr in dom.attrs(id) {
        let attr_name = qualified_attr_name(attr);
        let value = override_for(&attr_name).unwrap_or(attr.value.as_str());
        write_attr(&mut out, &attr_name, value);
    }
    for (name, value) in extra {
        let present = dom
            .attrs(id)
            .iter()
            .any(|attr| qualified_attr_name(attr).eq_ignore_ascii_case(name));
        if !present {
            write_attr(&mut out, name, value);
        }
    }
    out.push('>');
    out
}

/// The closing tag of an element; empty for void elements and non-elements.
pub fn close_tag(dom: &ArenaDom, id: ArenaNodeId) -> String {
    match dom.element_name(id) {
        Some(name) if !is_void_tag(name) => format!("</{}>", name.as_ref()),
        _ => String::new(),
    }
}

fn qualified_attr_name(attr: &super::arena::Attribute) -> String {
    match &attr.name.prefix {
        Some(prefix) => format!("{}:{}", prefix.as_ref(), attr.name.local.as_ref()),
        None => attr.name.local.to_string(),
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
}

fn write_node(dom: &ArenaDom, id: ArenaNodeId, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        ArenaNodeData::Document | ArenaNodeData::Fragment => {
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
        }
        ArenaNodeData::Element { name, .. } => {
            out.push_str(&open_tag(dom, id, &[]));
            if is_void_tag(&name.local) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&name.local.as_ref());
            for child in dom.children(id) {
                match dom.text(child) {
                    Some(text) if raw => out.push_str(text),
                    _ => write_node(dom, child, out),
                }
            }
            let _ = write!(out, "</{}>", name.local.as_ref());
        }
        ArenaNodeData::Text(text) => out.push_str(&escape_text(text)),
        ArenaNodeData::Comment(text) => {
            let _ = write!(out, "<!--{}-->", text);
        }
        ArenaNodeData::Doctype { name, .. } => {
            let _ = write!(out, "<!DOCTYPE {}>", name);
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}
