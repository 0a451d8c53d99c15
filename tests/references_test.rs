//! Reference-style link tests.

use turndown::{
    LinkReferenceDeduplication, LinkReferenceStyle, LinkStyle, Options, TurndownService,
};

fn referenced(style: LinkReferenceStyle, dedup: LinkReferenceDeduplication) -> TurndownService {
    let options = Options::default()
        .with_link_style(LinkStyle::Referenced)
        .with_link_reference_style(style)
        .with_link_reference_deduplication(dedup);
    TurndownService::with_options(options).expect("invalid options")
}

const THREE_LINKS: &str = r#"<p><a href="http://a">L1</a> <a href="http://b">L2</a> <a href="http://a">L3</a></p>"#;

// ============================================================================
// Full style
// ============================================================================

#[test]
fn test_full_without_deduplication_numbers_every_link() {
    let service = referenced(LinkReferenceStyle::Full, LinkReferenceDeduplication::None);
    assert_eq!(
        service.render(THREE_LINKS).unwrap(),
        "[L1][1] [L2][2] [L3][3]\n\n[1]: http://a\n[2]: http://b\n[3]: http://a"
    );
}

#[test]
fn test_full_with_deduplication_reuses_ids() {
    let service = referenced(LinkReferenceStyle::Full, LinkReferenceDeduplication::Full);
    assert_eq!(
        service.render(THREE_LINKS).unwrap(),
        "[L1][1] [L2][2] [L3][1]\n\n[1]: http://a\n[2]: http://b"
    );
}

#[test]
fn test_same_href_with_different_title_is_a_new_reference() {
    let service = referenced(LinkReferenceStyle::Full, LinkReferenceDeduplication::Full);
    let html = r#"<p><a href="http://a">x</a> <a href="http://a" title="T">y</a></p>"#;
    assert_eq!(
        service.render(html).unwrap(),
        "[x][1] [y][2]\n\n[1]: http://a\n[2]: http://a \"T\""
    );
}

// ============================================================================
// Collapsed and shortcut styles
// ============================================================================

#[test]
fn test_collapsed() {
    let html = r#"<p><a href="http://a">A</a> <a href="http://a">A</a></p>"#;

    let service = referenced(LinkReferenceStyle::Collapsed, LinkReferenceDeduplication::None);
    assert_eq!(
        service.render(html).unwrap(),
        "[A][] [A][]\n\n[A]: http://a\n[A]: http://a"
    );

    let service = referenced(LinkReferenceStyle::Collapsed, LinkReferenceDeduplication::Full);
    assert_eq!(service.render(html).unwrap(), "[A][] [A][]\n\n[A]: http://a");
}

#[test]
fn test_deduplication_keeps_one_definition_per_label() {
    let html = r#"<p><a href="http://a">A</a> <a href="http://b">A</a></p>"#;
    let service = referenced(LinkReferenceStyle::Shortcut, LinkReferenceDeduplication::Full);
    assert_eq!(service.render(html).unwrap(), "[A] [A]\n\n[A]: http://a");
}

#[test]
fn test_shortcut() {
    let service = referenced(LinkReferenceStyle::Shortcut, LinkReferenceDeduplication::None);
    assert_eq!(
        service
            .render(r#"<p>See <a href="http://a" title="Home">docs</a>.</p>"#)
            .unwrap(),
        "See [docs].\n\n[docs]: http://a \"Home\""
    );
}

// ============================================================================
// Per-render state
// ============================================================================

#[test]
fn test_definitions_do_not_leak_between_renders() {
    let service = referenced(LinkReferenceStyle::Full, LinkReferenceDeduplication::Full);
    let first = service.render(THREE_LINKS).unwrap();
    let second = service.render(THREE_LINKS).unwrap();
    assert_eq!(first, second);

    assert_eq!(
        service.render(r#"<p><a href="http://c">c</a></p>"#).unwrap(),
        "[c][1]\n\n[1]: http://c"
    );
}

#[test]
fn test_no_links_means_no_definition_block() {
    let service = referenced(LinkReferenceStyle::Full, LinkReferenceDeduplication::None);
    assert_eq!(service.render("<p>plain</p>").unwrap(), "plain");
}

#[test]
fn test_definitions_follow_the_last_block() {
    let service = referenced(LinkReferenceStyle::Full, LinkReferenceDeduplication::None);
    let html = r#"<ul><li><a href="http://a">a</a></li></ul><h3>End</h3>"#;
    assert_eq!(
        service.render(html).unwrap(),
        "*   [a][1]\n\n### End\n\n[1]: http://a"
    );
}
