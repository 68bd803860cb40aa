//! Rendering processed documents through the format registry

use richtext::richtext::formats::{FormatError, FormatRegistry, TreevizRenderer};
use richtext::richtext::testing::process_str;

const REPORT: &str = "<Heading><Center>Report</Center></Heading>\
<Paragraph>Hello <Bold>bold <Italic>both</Italic></Bold></Paragraph>\
<SamePage>kept<nl>together</SamePage>";

#[test]
fn test_treeviz_layout() {
    let doc = process_str(REPORT);
    let output = FormatRegistry::default().render(&doc, "treeviz").unwrap();
    insta::assert_snapshot!(output, @r#"
    ├─ ⊤ Heading
    │ └─ ¶ Implicit
    │   └─ ↵ Report
    │     └─ ◦ "Report" align=Center
    ├─ ⧉ MainContent
    │ └─ ¶ Explicit
    │   └─ ↵ Hello bold both
    │     ├─ ◦ "Hello "
    │     ├─ ◦ "bold " bold=1
    │     └─ ◦ "both" bold=1 italic=1
    ├─ ⟦ SamePageStart
    ├─ ⧉ MainContent
    │ └─ ¶ Implicit
    │   ├─ ↵ kept
    │   │ └─ ◦ "kept"
    │   └─ ↵ together
    │     └─ ◦ "together"
    └─ ⟧ SamePageEnd
    "#);
}

#[test]
fn test_treeviz_with_offsets() {
    let doc = process_str("<Fixed>code</Fixed>");
    let mut registry = FormatRegistry::with_defaults();
    registry.register(TreevizRenderer::with_offsets());
    insta::assert_snapshot!(registry.render(&doc, "treeviz").unwrap(), @r#"
    └─ ⧉ MainContent
      └─ ¶ Implicit
        └─ ↵ code
          └─ ◦ "code" fixed=1 @0
    "#);
}

#[test]
fn test_ast_format() {
    let doc = process_str("<Bold>a b</Bold><np>");
    insta::assert_snapshot!(FormatRegistry::default().render(&doc, "ast").unwrap(), @r#"
    ├─ ⌘ <Bold>
    │ ├─ ◦ "a"
    │ ├─ ␣ " "
    │ └─ ◦ "b"
    └─ ⌘ <np>
    "#);
}

#[test]
fn test_json_formats_parse_back() {
    let doc = process_str(REPORT);
    let registry = FormatRegistry::default();

    let layout: serde_json::Value =
        serde_json::from_str(&registry.render(&doc, "json").unwrap()).unwrap();
    let kinds: Vec<&str> = layout["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["Heading", "MainContent", "SamePageStart", "MainContent", "SamePageEnd"]
    );

    let tokens: serde_json::Value =
        serde_json::from_str(&registry.render(&doc, "tokens").unwrap()).unwrap();
    assert_eq!(tokens.as_array().unwrap().len(), doc.tokens.len());
}

#[test]
fn test_unknown_format() {
    let doc = process_str("x");
    match FormatRegistry::default().render(&doc, "pdf") {
        Err(FormatError::FormatNotFound(name)) => assert_eq!(name, "pdf"),
        other => panic!("unexpected result {other:?}"),
    }
}
