//! HTML retention mode tests.

use turndown::{HtmlRetentionMode, Options, Rule, TurndownService};

fn service(mode: HtmlRetentionMode) -> TurndownService {
    TurndownService::with_options(Options::default().with_html_retention_mode(mode))
        .expect("invalid options")
}

// ============================================================================
// Standard
// ============================================================================

#[test]
fn test_standard_drops_unsupported_markup() {
    let service = service(HtmlRetentionMode::Standard);
    assert_eq!(
        service
            .render(r#"<div class="x"><p>Hello <span style="color:red">there</span></p></div>"#)
            .unwrap(),
        "Hello there"
    );
}

// ============================================================================
// Preserve all
// ============================================================================

#[test]
fn test_preserve_all_keeps_inline_markup() {
    let service = service(HtmlRetentionMode::PreserveAll);
    assert_eq!(
        service
            .render(r#"<p>Hello <span style="color:red">there</span></p>"#)
            .unwrap(),
        r#"Hello <span style="color:red">there</span>"#
    );
}

#[test]
fn test_preserve_all_keeps_blocks_verbatim() {
    let service = service(HtmlRetentionMode::PreserveAll);
    assert_eq!(
        service.render("<p>a</p><div><p>*x*</p></div><p>b</p>").unwrap(),
        "a\n\n<div><p>*x*</p></div>\n\nb"
    );
}

#[test]
fn test_preserve_all_converts_allowed_attributes() {
    let service = service(HtmlRetentionMode::PreserveAll);
    assert_eq!(
        service
            .render(r#"<p><a href="http://x" title="t">x</a> <img src="a.png" alt="A"></p>"#)
            .unwrap(),
        r#"[x](http://x "t") ![A](a.png)"#
    );
    assert_eq!(
        service
            .render(r#"<p><a href="http://x" rel="nofollow">x</a></p>"#)
            .unwrap(),
        r#"<a href="http://x" rel="nofollow">x</a>"#
    );
}

#[test]
fn test_preserve_all_code_blocks() {
    let service = service(HtmlRetentionMode::PreserveAll);
    assert_eq!(
        service
            .render(r#"<pre><code class="language-js">a</code></pre>"#)
            .unwrap(),
        "    a"
    );
    assert_eq!(
        service
            .render(r#"<pre><code data-lang="x">a</code></pre>"#)
            .unwrap(),
        r#"<pre><code data-lang="x">a</code></pre>"#
    );
}

#[test]
fn test_blank_elements_win_over_retention() {
    let service = service(HtmlRetentionMode::PreserveAll);
    assert_eq!(
        service.render(r#"<p>a<span class="x"></span>b</p>"#).unwrap(),
        "ab"
    );
}

#[test]
fn test_retention_wins_over_added_rules() {
    let mut service = service(HtmlRetentionMode::PreserveAll);
    service.add_rule("span", Rule::new("span", |content, _, _| content.to_uppercase()));
    assert_eq!(
        service.render(r#"<p><span class="x">a</span> <span>b</span></p>"#).unwrap(),
        r#"<span class="x">a</span> B"#
    );
}

#[test]
fn test_custom_keep_replacement() {
    let options = Options::default()
        .with_html_retention_mode(HtmlRetentionMode::PreserveAll)
        .with_keep_replacement(|_, node, _| format!("[[{}]]", node.tag().unwrap_or("")));
    let service = TurndownService::with_options(options).unwrap();
    assert_eq!(
        service.render("<p>a <span>b</span></p>").unwrap(),
        "a [[span]]"
    );
}

// ============================================================================
// Markdown including HTML
// ============================================================================

#[test]
fn test_markdown_including_html_wraps_converted_content() {
    let service = service(HtmlRetentionMode::MarkdownIncludingHtml);
    assert_eq!(
        service
            .render(r#"<p><a href="http://x" target="_blank">go <em>now</em></a></p>"#)
            .unwrap(),
        "<a href=\"http://x\" target=\"_blank\" markdown=\"1\">\ngo _now_\n</a>"
    );
}

#[test]
fn test_markdown_including_html_leaves_supported_markup_alone() {
    let service = service(HtmlRetentionMode::MarkdownIncludingHtml);
    assert_eq!(
        service.render("<h3>Title</h3><p><strong>x</strong></p>").unwrap(),
        "### Title\n\n**x**"
    );
}

#[test]
fn test_markdown_including_html_void_elements_stay_inline() {
    let service = service(HtmlRetentionMode::MarkdownIncludingHtml);
    assert_eq!(
        service
            .render(r#"<p>a <img src="x.png" width="3"> b</p>"#)
            .unwrap(),
        r#"a <img src="x.png" width="3" markdown="1"> b"#
    );
}

#[test]
fn test_markdown_including_html_does_not_duplicate_the_marker() {
    let service = service(HtmlRetentionMode::MarkdownIncludingHtml);
    assert_eq!(
        service
            .render(r#"<div markdown="0" class="n"><p>x</p></div>"#)
            .unwrap(),
        "<div markdown=\"1\" class=\"n\">\nx\n</div>"
    );
}
