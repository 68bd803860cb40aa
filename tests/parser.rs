//! Parser integration tests: forest shape, balance errors and deep nesting

use rstest::rstest;
use richtext::richtext::lexing::{tokenize, TokenizeOptions};
use richtext::richtext::parsing::{parse, Forest, NodeKind, ParseError, ParseErrorKind};
use richtext::richtext::testing::nested;

fn parse_str(input: &str, case_insensitive: bool) -> Result<Forest, ParseError> {
    let options = TokenizeOptions {
        case_insensitive_commands: case_insensitive,
        utf8: true,
    };
    let tokenized = tokenize(input.as_bytes(), options).expect("input to tokenize");
    parse(&tokenized.tokens, case_insensitive)
}

#[test]
fn test_forest_shape() {
    let forest = parse_str("<Bold>a<nl>b</Bold> c", true).unwrap();

    let roots: Vec<String> = forest.root_nodes().map(|n| n.text().to_string()).collect();
    assert_eq!(roots, vec!["Bold", " ", "c"]);

    let bold = forest.root_nodes().next().unwrap();
    let children: Vec<(NodeKind, String)> = bold
        .children()
        .map(|n| (n.kind(), n.text().to_string()))
        .collect();
    assert_eq!(
        children,
        vec![
            (NodeKind::Text, "a".to_string()),
            (NodeKind::Command, "nl".to_string()),
            (NodeKind::Text, "b".to_string()),
        ]
    );

    let nl = bold.children().nth(1).unwrap();
    assert_eq!(nl.children().count(), 0);
    assert_eq!(nl.parent(), Some(bold));
    assert!(nl.has_ancestor_named("bold", true));
    assert!(!nl.has_ancestor_named("bold", false));
    assert_eq!(nl.data().byte_offset, 7);
    assert_eq!(nl.data().token_index, 2);
}

#[test]
fn test_depth_first_order() {
    let forest = parse_str("<A>x<B>y</B></A>z", true).unwrap();
    let order: Vec<String> = forest.depth_first().map(|n| n.text().to_string()).collect();
    assert_eq!(order, vec!["A", "x", "B", "y", "z"]);
    assert_eq!(forest.len(), 5);
}

#[test]
fn test_empty_input() {
    let forest = parse_str("", true).unwrap();
    assert!(forest.is_empty());
    assert!(forest.roots().is_empty());
}

#[rstest]
#[case::closing_a_marker("</nl>", ParseErrorKind::UnallowedBalancingCommandEnd, 0, 0)]
#[case::closing_a_marker_inside_scope("<Bold>x</np>", ParseErrorKind::UnallowedBalancingCommandEnd, 7, 2)]
#[case::end_without_start("x</Bold>", ParseErrorKind::UnexpectedCommandEnd, 1, 1)]
#[case::crossed("<Bold><Italic></Bold></Italic>", ParseErrorKind::ImproperlyBalancedCommand, 14, 2)]
#[case::never_closed("<Bold>x<Italic>y</Italic>", ParseErrorKind::UnterminatedCommand, 0, 0)]
#[case::innermost_open_reported("a<Bold><Italic>", ParseErrorKind::UnterminatedCommand, 7, 2)]
fn test_parse_errors(
    #[case] input: &str,
    #[case] kind: ParseErrorKind,
    #[case] byte_offset: usize,
    #[case] token_index: usize,
) {
    let error = parse_str(input, true).unwrap_err();
    assert_eq!(error.kind, kind);
    assert_eq!(error.byte_offset, byte_offset);
    assert_eq!(error.token_index, token_index);
}

#[test]
fn test_name_comparison_follows_case_setting() {
    assert!(parse_str("<bold>x</BOLD>", true).is_ok());
    assert_eq!(
        parse_str("<bold>x</BOLD>", false).unwrap_err().kind,
        ParseErrorKind::ImproperlyBalancedCommand
    );
    assert_eq!(
        parse_str("</NL>", true).unwrap_err().kind,
        ParseErrorKind::UnallowedBalancingCommandEnd
    );
    assert_eq!(
        parse_str("<NL></NL>", false).unwrap().len(),
        1
    );
}

#[test]
fn test_deep_nesting() {
    let input = nested("Bold", 100_000, "x");
    let forest = parse_str(&input, true).unwrap();
    assert_eq!(forest.len(), 100_001);
    assert_eq!(forest.roots().len(), 1);

    let leaf = forest.depth_first().last().unwrap();
    assert_eq!(leaf.kind(), NodeKind::Text);
    assert_eq!(leaf.ancestors().count(), 100_000);
}
