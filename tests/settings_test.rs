//! Settings files.

#![cfg(feature = "serde")]

use std::fs;

use turndown::{Settings, TurndownService};

#[test]
fn test_settings_file_drives_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("turndown.json");
    fs::write(
        &path,
        r#"{"headingStyle": "atx", "codeBlockStyle": "fenced", "fence": "~~~", "bulletListMarker": "+"}"#,
    )
    .unwrap();

    let options = Settings::from_json(&fs::read_to_string(&path).unwrap())
        .unwrap()
        .into_options();
    let service = TurndownService::with_options(options).unwrap();

    assert_eq!(
        service
            .render("<h1>A</h1><ul><li>b</li></ul><pre><code>c</code></pre>")
            .unwrap(),
        "# A\n\n+   b\n\n~~~\nc\n~~~"
    );
}

#[test]
fn test_out_of_range_settings_fail_validation() {
    let options = Settings::from_json(r#"{"listMarkerSpaceCount": 7}"#)
        .unwrap()
        .into_options();
    assert!(TurndownService::with_options(options).is_err());
}

#[test]
fn test_settings_round_trip_through_json() {
    let settings = Settings::from_json(r#"{"linkStyle": "referenced", "br": "\\"}"#).unwrap();
    let json = serde_json::to_string(&settings).unwrap();
    assert_eq!(Settings::from_json(&json).unwrap(), settings);
}
