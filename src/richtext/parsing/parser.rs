//! Builds the command forest from a token sequence.

use super::ast::{AstNode, Forest, NodeId, NodeKind};
use super::error::{ParseError, ParseErrorKind};
use crate::richtext::commands::{is_non_nesting, names_equal};
use crate::richtext::lexing::{Token, TokenKind};
use log::debug;

/// Parses `tokens` into a forest of command, text and whitespace nodes.
///
/// Every command start except `lt`, `nl` and `np` opens a scope that must be closed
/// by an end command of the same name. Those three are single markers: they become
/// command nodes without children and may never be closed.
pub fn parse(tokens: &[Token], case_insensitive_commands: bool) -> Result<Forest, ParseError> {
    let mut forest = Forest::with_command_case(case_insensitive_commands);
    let mut current_parent: Option<NodeId> = None;

    for (token_index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::CommandStart => {
                let id = forest.attach(
                    node_from(token, token_index, NodeKind::Command),
                    current_parent,
                );
                if !is_non_nesting(&token.text, case_insensitive_commands) {
                    current_parent = Some(id);
                }
            }
            TokenKind::CommandEnd => {
                if is_non_nesting(&token.text, case_insensitive_commands) {
                    return Err(error_at(
                        token,
                        token_index,
                        ParseErrorKind::UnallowedBalancingCommandEnd,
                    ));
                }
                let Some(open) = current_parent else {
                    return Err(error_at(
                        token,
                        token_index,
                        ParseErrorKind::UnexpectedCommandEnd,
                    ));
                };
                if !names_equal(&forest[open].text, &token.text, case_insensitive_commands) {
                    return Err(error_at(
                        token,
                        token_index,
                        ParseErrorKind::ImproperlyBalancedCommand,
                    ));
                }
                current_parent = forest[open].parent;
            }
            TokenKind::Text => {
                forest.attach(node_from(token, token_index, NodeKind::Text), current_parent);
            }
            TokenKind::Whitespace => {
                forest.attach(
                    node_from(token, token_index, NodeKind::Whitespace),
                    current_parent,
                );
            }
        }
    }

    if let Some(open) = current_parent {
        let node = &forest[open];
        return Err(ParseError {
            kind: ParseErrorKind::UnterminatedCommand,
            byte_offset: node.byte_offset,
            codepoint_offset: node.codepoint_offset,
            token_index: node.token_index,
        });
    }

    debug!(
        "parsed {} tokens into {} nodes ({} roots)",
        tokens.len(),
        forest.len(),
        forest.roots().len()
    );
    Ok(forest)
}

fn node_from(token: &Token, token_index: usize, kind: NodeKind) -> AstNode {
    AstNode {
        byte_offset: token.byte_offset,
        codepoint_offset: token.codepoint_offset,
        token_index,
        kind,
        text: token.text.clone(),
        parent: None,
        children: Vec::new(),
    }
}

fn error_at(token: &Token, token_index: usize, kind: ParseErrorKind) -> ParseError {
    ParseError {
        kind,
        byte_offset: token.byte_offset,
        codepoint_offset: token.codepoint_offset,
        token_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::lexing::{tokenize, TokenizeOptions};

    fn parse_str(source: &str) -> Result<Forest, ParseError> {
        let tokens = tokenize(source.as_bytes(), TokenizeOptions::default())
            .expect("tokenize")
            .tokens;
        parse(&tokens, true)
    }

    #[test]
    fn test_single_command_with_text() {
        let forest = parse_str("<foo>bar</foo>").unwrap();
        assert_eq!(forest.roots().len(), 1);
        let root = forest.node(forest.roots()[0]);
        assert!(root.is_named("foo", false));
        let children: Vec<_> = root.children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind(), NodeKind::Text);
        assert_eq!(children[0].text(), "bar");
        assert_eq!(children[0].data().token_index, 1);
    }

    #[test]
    fn test_non_nesting_commands_do_not_open_scopes() {
        let forest = parse_str("<Bold>a<nl>b<lt>c</Bold>").unwrap();
        let root = forest.node(forest.roots()[0]);
        let names: Vec<String> = root.children().map(|c| c.text().to_string()).collect();
        assert_eq!(names, vec!["a", "nl", "b", "lt", "c"]);
        assert!(root.children().all(|c| c.data().children.is_empty()));
    }

    #[test]
    fn test_end_of_non_nesting_command_is_rejected() {
        let err = parse_str("<np></np>").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnallowedBalancingCommandEnd);
        assert_eq!(err.token_index, 1);
        assert_eq!(err.byte_offset, 4);
    }

    #[test]
    fn test_mismatched_end() {
        let err = parse_str("<Bold><Italic>x</Bold></Italic>").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ImproperlyBalancedCommand);
        assert_eq!(err.token_index, 3);
    }

    #[test]
    fn test_end_without_open_command() {
        let err = parse_str("x </Bold>").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedCommandEnd);
        assert_eq!((err.byte_offset, err.token_index), (2, 2));
    }

    #[test]
    fn test_unterminated_points_at_innermost_open_command() {
        let err = parse_str("<Bold>a <Italic>b").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedCommand);
        assert_eq!(err.byte_offset, 8);
        assert_eq!(err.token_index, 3);
    }

    #[test]
    fn test_case_sensitivity_applies_to_balancing() {
        let tokens = tokenize(b"<Bold>x</bold>", TokenizeOptions::default())
            .unwrap()
            .tokens;
        assert!(parse(&tokens, true).is_ok());
        assert_eq!(
            parse(&tokens, false).unwrap_err().kind,
            ParseErrorKind::ImproperlyBalancedCommand
        );
    }
}
