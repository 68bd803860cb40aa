//! Token types produced by the tokenizer.

use bstr::{BString, ByteSlice};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// `<name>`
    CommandStart,
    /// `</name>`
    CommandEnd,
    Text,
    /// A single whitespace character, or a CRLF pair.
    Whitespace,
}

/// A lexical unit of richtext input.
///
/// Offsets always refer to the original input, even when `text` was transcoded
/// from a single-byte encoding. For commands `text` holds the command name only,
/// without brackets or slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub byte_offset: usize,
    pub codepoint_offset: usize,
    /// Number of input bytes the token spans, brackets included.
    pub byte_len: usize,
    pub kind: TokenKind,
    #[serde(serialize_with = "serialize_text")]
    pub text: BString,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<BString>,
        byte_offset: usize,
        codepoint_offset: usize,
        byte_len: usize,
    ) -> Self {
        Token {
            byte_offset,
            codepoint_offset,
            byte_len,
            kind,
            text: text.into(),
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self.kind, TokenKind::CommandStart | TokenKind::CommandEnd)
    }

    /// Byte range of the token in the original input.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.byte_offset..self.byte_offset + self.byte_len
    }
}

/// Serializes byte text as a string, replacing malformed UTF-8.
pub(crate) fn serialize_text<S: Serializer>(
    text: &BString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&text.to_str_lossy())
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::CommandStart => write!(f, "<{}>", self.text),
            TokenKind::CommandEnd => write!(f, "</{}>", self.text),
            TokenKind::Text | TokenKind::Whitespace => write!(f, "{}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_reconstructs_commands() {
        let start = Token::new(TokenKind::CommandStart, "Bold", 0, 0, 6);
        let end = Token::new(TokenKind::CommandEnd, "Bold", 10, 10, 7);
        assert_eq!(start.to_string(), "<Bold>");
        assert_eq!(end.to_string(), "</Bold>");
        assert_eq!(end.span(), 10..17);
        assert!(end.is_command());
    }
}
