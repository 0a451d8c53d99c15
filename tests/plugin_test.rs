//! Custom rule and plugin tests.

use turndown::rules::retention;
use turndown::{Filter, Options, Rule, TurndownService};

// ============================================================================
// Plugins
// ============================================================================

fn strikethrough(service: &mut TurndownService) {
    service.add_rule(
        "strikethrough",
        Rule::new(["del", "s", "strike"], |content, _, _| format!("~~{content}~~")),
    );
}

fn highlight(service: &mut TurndownService) {
    service.add_rule(
        "highlight",
        Rule::new("mark", |content, _, _| format!("=={content}==")),
    );
}

/// `pre` blocks that only look like code through their styling.
fn styled_code_blocks(service: &mut TurndownService) {
    service.add_rule(
        "styledCodeBlock",
        Rule::new(
            Filter::predicate(|node, _| {
                retention::is_code_block(node) && !node.first_child().is_some_and(|c| c.is("code"))
            }),
            |_, node, _| format!("\n\n```\n{}\n```\n\n", node.text_content()),
        )
        .verbatim(),
    );
}

/// Abbreviations as trailing `*[ABBR]: Title` definitions.
fn abbreviations(service: &mut TurndownService) {
    service.add_rule(
        "abbreviation",
        Rule::new(
            Filter::predicate(|node, _| node.is("abbr") && node.attr("title").is_some()),
            |content, node, ctx| {
                let title = node.attr("title").unwrap_or_default();
                ctx.references_mut()
                    .define_once(format!("*[{content}]: {title}"));
                content.to_string()
            },
        ),
    );
}

#[test]
fn test_use_plugin() {
    let mut service = TurndownService::new();
    service.use_plugin(strikethrough);
    assert_eq!(
        service.render("<p><del>old</del> new</p>").unwrap(),
        "~~old~~ new"
    );
}

#[test]
fn test_use_plugins_applies_in_order() {
    let mut service = TurndownService::new();
    service.use_plugins([strikethrough as fn(&mut TurndownService), highlight]);
    assert_eq!(
        service.render("<p><s>a</s> <mark>b</mark></p>").unwrap(),
        "~~a~~ ==b=="
    );
}

#[test]
fn test_closure_plugin() {
    let mut service = TurndownService::new();
    service.use_plugin(|s: &mut TurndownService| {
        s.keep("kbd").remove("script");
    });
    assert_eq!(
        service
            .render("<p>Press <kbd>Esc</kbd></p><script>alert(1)</script>")
            .unwrap(),
        "Press <kbd>Esc</kbd>"
    );
}

#[test]
fn test_plugin_detecting_styled_code_blocks() {
    let mut service = TurndownService::new();
    service.use_plugin(styled_code_blocks);
    assert_eq!(
        service
            .render(r#"<pre style="font-family: Menlo, monospace">let x;</pre>"#)
            .unwrap(),
        "```\nlet x;\n```"
    );
}

#[test]
fn test_plugin_definitions_are_appended() {
    let mut service = TurndownService::new();
    service.use_plugin(abbreviations);
    assert_eq!(
        service
            .render(r#"<p><abbr title="HyperText Markup Language">HTML</abbr> and <abbr title="HyperText Markup Language">HTML</abbr></p>"#)
            .unwrap(),
        "HTML and HTML\n\n*[HTML]: HyperText Markup Language"
    );
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_added_rules_override_built_ins() {
    let mut service = TurndownService::new();
    service.add_rule(
        "quotedParagraph",
        Rule::new("p", |content, _, _| format!("\n\n> {content}\n\n")),
    );
    assert_eq!(service.render("<p>a</p><p>b</p>").unwrap(), "> a\n\n> b");
}

#[test]
fn test_later_rules_win() {
    let mut service = TurndownService::new();
    service
        .add_rule("first", Rule::new("mark", |_, _, _| "first".to_string()))
        .add_rule("second", Rule::new("mark", |_, _, _| "second".to_string()));
    assert_eq!(service.render("<p><mark>x</mark></p>").unwrap(), "second");
}

#[test]
fn test_keep_and_remove_lose_to_built_ins() {
    let mut service = TurndownService::new();
    service.keep("em").remove("strong");
    assert_eq!(
        service.render("<p><em>a</em> <strong>b</strong></p>").unwrap(),
        "_a_ **b**"
    );
}

#[test]
fn test_keep_beats_remove() {
    let mut service = TurndownService::new();
    service.remove("span").keep("span");
    assert_eq!(
        service.render("<p><span>x</span></p>").unwrap(),
        "<span>x</span>"
    );
}

#[test]
fn test_options_replace_built_in_rule_by_name() {
    let options = Options::default().with_rule(
        "emphasis",
        Rule::new(["em", "i"], |content, _, _| format!("*{content}*")),
    );
    let service = TurndownService::with_options(options).unwrap();
    assert_eq!(service.render("<p><i>x</i></p>").unwrap(), "*x*");
}

#[test]
fn test_removing_built_in_falls_back_to_default() {
    let mut options = Options::default();
    options.rules.remove("strong");
    let service = TurndownService::with_options(options).unwrap();
    assert_eq!(service.render("<p><b>x</b></p>").unwrap(), "x");
}
