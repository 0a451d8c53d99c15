//! Built-in CommonMark rules.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::{Filter, RenderContext, Rule, RuleSet};
use crate::escape::{calculate_fence_length, calculate_inline_code_ticks};
use crate::node::NodeRef;
use crate::options::{
    CodeBlockStyle, HeadingStyle, LinkReferenceDeduplication, LinkReferenceStyle, LinkStyle,
};

static LANGUAGE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:lang|language)-(\S+)").expect("language pattern is valid")
});

static PADDED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ .*[^ ].* $").expect("padding pattern is valid"));

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n|\r").expect("line break pattern is valid"));

static MULTILINE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*").expect("space pattern is valid"));

/// The built-in rules, in precedence order.
pub fn rules() -> RuleSet {
    let mut set = RuleSet::new();
    set.insert("paragraph", Rule::new("p", paragraph));
    set.insert("lineBreak", Rule::new("br", line_break));
    set.insert(
        "heading",
        Rule::new(["h1", "h2", "h3", "h4", "h5", "h6"], heading),
    );
    set.insert("blockquote", Rule::new("blockquote", blockquote));
    set.insert("list", Rule::new(["ul", "ol"], list));
    set.insert("listItem", Rule::new("li", list_item));
    set.insert(
        "indentedCodeBlock",
        Rule::new(
            Filter::predicate(|node, options| {
                options.code_block_style == CodeBlockStyle::Indented && has_code_child(node)
            }),
            indented_code_block,
        )
        .verbatim(),
    );
    set.insert(
        "fencedCodeBlock",
        Rule::new(
            Filter::predicate(|node, options| {
                options.code_block_style == CodeBlockStyle::Fenced && has_code_child(node)
            }),
            fenced_code_block,
        )
        .verbatim(),
    );
    set.insert("horizontalRule", Rule::new("hr", horizontal_rule));
    set.insert(
        "inlineLink",
        Rule::new(
            Filter::predicate(|node, options| {
                options.link_style == LinkStyle::Inlined && has_href(node)
            }),
            inline_link,
        ),
    );
    set.insert(
        "referenceLink",
        Rule::new(
            Filter::predicate(|node, options| {
                options.link_style == LinkStyle::Referenced && has_href(node)
            }),
            reference_link,
        )
        .with_append(|ctx| ctx.references_mut().flush()),
    );
    set.insert("emphasis", Rule::new(["em", "i"], emphasis));
    set.insert("strong", Rule::new(["strong", "b"], strong));
    set.insert(
        "code",
        Rule::new(
            Filter::predicate(|node, _| node.is("code") && !is_sole_child_of_pre(node)),
            inline_code,
        ),
    );
    set.insert("image", Rule::new("img", image));
    set
}

fn paragraph(content: &str, _: &NodeRef<'_>, _: &mut RenderContext<'_>) -> String {
    format!("\n\n{content}\n\n")
}

fn line_break(_: &str, _: &NodeRef<'_>, ctx: &mut RenderContext<'_>) -> String {
    format!("{}\n", ctx.options().br)
}

fn heading(content: &str, node: &NodeRef<'_>, ctx: &mut RenderContext<'_>) -> String {
    let level = node
        .tag()
        .and_then(|tag| tag[1..].parse::<usize>().ok())
        .unwrap_or(1);

    if ctx.options().heading_style == HeadingStyle::Setext && level < 3 {
        let underline = if level == 1 { "=" } else { "-" };
        format!(
            "\n\n{content}\n{}\n\n",
            underline.repeat(content.chars().count())
        )
    } else {
        format!("\n\n{} {content}\n\n", "#".repeat(level))
    }
}

fn blockquote(content: &str, _: &NodeRef<'_>, _: &mut RenderContext<'_>) -> String {
    let quoted = content
        .trim_matches('\n')
        .split('\n')
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n\n{quoted}\n\n")
}

fn list(content: &str, node: &NodeRef<'_>, _: &mut RenderContext<'_>) -> String {
    let nested_last = node.parent().is_some_and(|parent| {
        parent.is("li") && node.next_element_sibling().is_none()
    });
    if nested_last {
        format!("\n{content}")
    } else {
        format!("\n\n{content}\n\n")
    }
}

/// Item lines are emitted relative to the item itself: every non-empty
/// continuation line is indented by one unit, so nested items pick up one
/// unit per enclosing item.
fn list_item(content: &str, node: &NodeRef<'_>, ctx: &mut RenderContext<'_>) -> String {
    let options = ctx.options();
    let unit = options.indent_unit();
    let has_next_item = node.next_element_sibling().is_some_and(|n| n.is("li"));

    if only_nested_lists(node) {
        let mut out = content
            .split('\n')
            .map(|line| indent_line(line, &unit))
            .collect::<Vec<_>>()
            .join("\n");
        if has_next_item {
            out.push('\n');
        }
        return out;
    }

    let spaces = " ".repeat(options.list_marker_space_count);
    let marker = match node.parent() {
        Some(list) if list.is("ol") => {
            let start = list
                .attr("start")
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(1);
            let index = list
                .children()
                .filter(|c| c.is("li"))
                .position(|c| c.id() == node.id())
                .unwrap_or(0);
            let number = start.saturating_add(i64::try_from(index).unwrap_or(i64::MAX));
            format!("{number}.{spaces}")
        }
        _ => format!("{}{spaces}", options.bullet_list_marker),
    };

    let body = content.trim_start_matches('\n');
    let paragraph_mode = body.ends_with('\n');
    let mut lines = body.trim_end_matches('\n').split('\n');

    let mut out = format!("{marker}{}", lines.next().unwrap_or(""));
    for line in lines {
        out.push('\n');
        out.push_str(&indent_line(line, &unit));
    }
    if paragraph_mode {
        out.push('\n');
    }
    if has_next_item {
        out.push('\n');
    }
    out
}

fn indent_line(line: &str, unit: &str) -> String {
    if line.is_empty() {
        String::new()
    } else {
        format!("{unit}{line}")
    }
}

/// Every child is whitespace text or a nested list, and at least one is a list.
fn only_nested_lists(node: &NodeRef<'_>) -> bool {
    let mut has_list = false;
    let all = node.children().all(|child| {
        if let Some(text) = child.text() {
            return text.trim().is_empty();
        }
        let is_list = child.is("ul") || child.is("ol");
        has_list |= is_list;
        is_list
    });
    all && has_list
}

fn has_code_child(node: &NodeRef<'_>) -> bool {
    node.is("pre") && node.first_child().is_some_and(|c| c.is("code"))
}

fn indented_code_block(_: &str, node: &NodeRef<'_>, _: &mut RenderContext<'_>) -> String {
    let code = node
        .first_child()
        .map(|c| c.text_content())
        .unwrap_or_default();
    let code = code.strip_suffix('\n').unwrap_or(&code);
    let indented = code
        .split('\n')
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n\n{indented}\n\n")
}

fn fenced_code_block(_: &str, node: &NodeRef<'_>, ctx: &mut RenderContext<'_>) -> String {
    let options = ctx.options();
    let code_node = node.first_child();
    let language = code_node
        .and_then(|c| c.attr("class"))
        .and_then(language_of)
        .or_else(|| node.attr("class").and_then(language_of))
        .unwrap_or("");
    let code = code_node.map(|c| c.text_content()).unwrap_or_default();

    let fence_char = options.fence_char();
    let fence = fence_char
        .to_string()
        .repeat(calculate_fence_length(&code, fence_char));
    let code = code.strip_suffix('\n').unwrap_or(&code);

    format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
}

fn language_of(class: &str) -> Option<&str> {
    LANGUAGE_CLASS
        .captures(class)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn horizontal_rule(_: &str, _: &NodeRef<'_>, ctx: &mut RenderContext<'_>) -> String {
    format!("\n\n{}\n\n", ctx.options().hr)
}

fn has_href(node: &NodeRef<'_>) -> bool {
    node.is("a") && node.attr("href").is_some_and(|href| !href.is_empty())
}

/// Collapse line breaks and the whitespace around them to single spaces.
fn clean(text: &str) -> String {
    MULTILINE_SPACE.replace_all(text, " ").trim().to_string()
}

fn title_part(node: &NodeRef<'_>) -> String {
    let title = clean(node.attr("title").unwrap_or(""));
    if title.is_empty() {
        String::new()
    } else {
        format!(" \"{}\"", title.replace('"', "\\\""))
    }
}

fn inline_link(content: &str, node: &NodeRef<'_>, _: &mut RenderContext<'_>) -> String {
    let href = node
        .attr("href")
        .unwrap_or("")
        .replace('(', "\\(")
        .replace(')', "\\)");
    format!("[{}]({href}{})", clean(content), title_part(node))
}

fn reference_link(content: &str, node: &NodeRef<'_>, ctx: &mut RenderContext<'_>) -> String {
    let options = ctx.options();
    let dedup = options.link_reference_deduplication == LinkReferenceDeduplication::Full;
    let href = node.attr("href").unwrap_or("");
    let title = title_part(node);
    let label = clean(content);
    let references = ctx.references_mut();

    match options.link_reference_style {
        LinkReferenceStyle::Collapsed | LinkReferenceStyle::Shortcut => {
            let definition = format!("[{label}]: {href}{title}");
            if dedup {
                references.define_label(&label, definition);
            } else {
                references.define(definition);
            }
            if options.link_reference_style == LinkReferenceStyle::Collapsed {
                format!("[{label}][]")
            } else {
                format!("[{label}]")
            }
        }
        LinkReferenceStyle::Full => {
            let (id, minted) = references.id_for(href, &title, dedup);
            if minted {
                references.define(format!("[{id}]: {href}{title}"));
            }
            format!("[{label}][{id}]")
        }
    }
}

fn emphasis(content: &str, _: &NodeRef<'_>, ctx: &mut RenderContext<'_>) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    let delimiter = ctx.options().em_delimiter;
    format!("{delimiter}{content}{delimiter}")
}

fn strong(content: &str, _: &NodeRef<'_>, ctx: &mut RenderContext<'_>) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    let delimiter = ctx.options().strong_delimiter;
    format!("{delimiter}{content}{delimiter}")
}

/// A `code` that is the only child of a `pre` belongs to a code block.
fn is_sole_child_of_pre(node: &NodeRef<'_>) -> bool {
    let has_siblings = node.prev_sibling().is_some() || node.next_sibling().is_some();
    node.parent().is_some_and(|p| p.is("pre")) && !has_siblings
}

fn inline_code(content: &str, _: &NodeRef<'_>, _: &mut RenderContext<'_>) -> String {
    if content.is_empty() {
        return String::new();
    }
    let content = LINE_BREAKS.replace_all(content, " ");
    let pad = if content.starts_with('`') || content.ends_with('`') || PADDED_CODE.is_match(&content)
    {
        " "
    } else {
        ""
    };
    let delimiter = "`".repeat(calculate_inline_code_ticks(&content));
    format!("{delimiter}{pad}{content}{pad}{delimiter}")
}

fn image(_: &str, node: &NodeRef<'_>, _: &mut RenderContext<'_>) -> String {
    let src = node.attr("src").unwrap_or("");
    if src.is_empty() {
        return String::new();
    }
    let alt = clean(node.attr("alt").unwrap_or(""));
    format!("![{alt}]({src}{})", title_part(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifications;
    use crate::dom::ArenaDom;
    use crate::options::{EmDelimiter, Options};

    /// Apply a single named rule to the first element of `html`.
    fn apply(key: &str, content: &str, html: &str, options: &Options) -> String {
        let (dom, root) = ArenaDom::parse_fragment(html);
        let facts = Classifications::build(&dom, root, options);
        let node = NodeRef::new(&dom, root, &facts).first_child().unwrap();
        let set = rules();
        let rule = set.get(key).unwrap();
        assert!(rule.matches(&node, options), "{key} does not match {html}");
        let mut ctx = RenderContext::new(options);
        (rule.replacement)(content, &node, &mut ctx)
    }

    #[test]
    fn test_heading_styles() {
        let options = Options::default();
        assert_eq!(
            apply("heading", "Title", "<h2>Title</h2>", &options),
            "\n\nTitle\n-----\n\n"
        );
        assert_eq!(
            apply("heading", "Deep", "<h3>Deep</h3>", &options),
            "\n\n### Deep\n\n"
        );
        let atx = Options::default().with_heading_style(HeadingStyle::Atx);
        assert_eq!(apply("heading", "T", "<h1>T</h1>", &atx), "\n\n# T\n\n");
    }

    #[test]
    fn test_blockquote_prefixes_every_line() {
        let out = apply(
            "blockquote",
            "\n\na\n\nb\n\n",
            "<blockquote>x</blockquote>",
            &Options::default(),
        );
        assert_eq!(out, "\n\n> a\n> \n> b\n\n");
    }

    #[test]
    fn test_ordered_marker_respects_start() {
        let options = Options::default();
        let (dom, root) = ArenaDom::parse_fragment(r#"<ol start="7"><li>a</li><li>b</li></ol>"#);
        let facts = Classifications::build(&dom, root, &options);
        let ol = NodeRef::new(&dom, root, &facts).first_child().unwrap();
        let second = ol.children().nth(1).unwrap();
        let mut ctx = RenderContext::new(&options);
        assert_eq!(list_item("b", &second, &mut ctx), "8.   b");
    }

    #[test]
    fn test_huge_start_saturates() {
        let options = Options::default();
        let (dom, root) = ArenaDom::parse_fragment(
            r#"<ol start="9223372036854775807"><li>a</li><li>b</li></ol>"#,
        );
        let facts = Classifications::build(&dom, root, &options);
        let ol = NodeRef::new(&dom, root, &facts).first_child().unwrap();
        let second = ol.children().nth(1).unwrap();
        let mut ctx = RenderContext::new(&options);
        assert_eq!(
            list_item("b", &second, &mut ctx),
            "9223372036854775807.   b"
        );
    }

    #[test]
    fn test_list_item_continuation_lines_are_indented() {
        let options = Options::default()
            .with_list_marker_space_count(1)
            .with_list_item_indent_space_count(2);
        let (dom, root) = ArenaDom::parse_fragment("<ul><li>x</li><li>y</li></ul>");
        let facts = Classifications::build(&dom, root, &options);
        let ul = NodeRef::new(&dom, root, &facts).first_child().unwrap();
        let first = ul.first_child().unwrap();
        let mut ctx = RenderContext::new(&options);

        assert_eq!(
            list_item("\n\nfirst\n\nsecond\n\n", &first, &mut ctx),
            "* first\n\n  second\n\n"
        );
        assert_eq!(list_item("a\n* b\n  c", &first, &mut ctx), "* a\n  * b\n    c\n");
        // Lines that already start with the unit are indented all the same
        assert_eq!(
            list_item("a\n\n    code\n\n", &first, &mut ctx),
            "* a\n\n      code\n\n"
        );
    }

    #[test]
    fn test_fence_escalates_past_content() {
        let options = Options::default().with_code_block_style(CodeBlockStyle::Fenced);
        let out = apply(
            "fencedCodeBlock",
            "",
            "<pre><code class=\"language-rust\">```\ncode\n```</code></pre>",
            &options,
        );
        assert_eq!(out, "\n\n````rust\n```\ncode\n```\n````\n\n");
    }

    #[test]
    fn test_indented_code_block() {
        let out = apply(
            "indentedCodeBlock",
            "",
            "<pre><code>a\n  b\n</code></pre>",
            &Options::default(),
        );
        assert_eq!(out, "\n\n    a\n      b\n\n");
    }

    #[test]
    fn test_inline_code_delimiters() {
        let options = Options::default();
        let html = "<code>x</code>";
        assert_eq!(apply("code", "a`b", html, &options), "``a`b``");
        assert_eq!(apply("code", "`tick", html, &options), "`` `tick ``");
        assert_eq!(apply("code", " a ", html, &options), "`  a  `");
        assert_eq!(apply("code", "a\nb", html, &options), "`a b`");
        assert_eq!(apply("code", "", html, &options), "");
    }

    #[test]
    fn test_inline_link_escapes_parentheses_and_titles() {
        let out = apply(
            "inlineLink",
            "label",
            r#"<a href="http://x/(y)" title="say &quot;hi&quot;">label</a>"#,
            &Options::default(),
        );
        assert_eq!(out, r#"[label](http://x/\(y\) "say \"hi\"")"#);
    }

    #[test]
    fn test_emphasis_uses_configured_delimiter() {
        let options = Options::default().with_em_delimiter(EmDelimiter::Asterisk);
        assert_eq!(apply("emphasis", "x", "<em>x</em>", &options), "*x*");
        assert_eq!(apply("emphasis", " ", "<em>x</em>", &options), "");
    }

    #[test]
    fn test_image_requires_src() {
        let options = Options::default();
        assert_eq!(
            apply("image", "", r#"<img src="a.png" alt="A" title="T">"#, &options),
            r#"![A](a.png "T")"#
        );
        assert_eq!(apply("image", "", r#"<img alt="A">"#, &options), "");
    }

    #[test]
    fn test_language_class_detection() {
        assert_eq!(language_of("language-js"), Some("js"));
        assert_eq!(language_of("x lang-py"), Some("py"));
        assert_eq!(language_of("notlanguage-js"), None);
    }
}
