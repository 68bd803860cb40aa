//! The richtext tokenizer
//!
//!     Scans the input once, left to right. Outside commands, bytes are grouped into
//!     text runs and single whitespace characters; `<` opens a command which runs up to
//!     the next `>`. After every command the encoding stack may change, and with it
//!     both whitespace recognition and how token text is decoded.
//!
//!     Codepoints are counted according to the encoding active while scanning: one per
//!     byte for single-byte encodings, one per UTF-8 sequence otherwise. Malformed UTF-8
//!     never stops tokenization; every stray byte counts as one codepoint and produces a
//!     warning.

use super::error::{LexWarning, LexWarningKind, TokenizeError, TokenizeErrorKind};
use super::tokens::{Token, TokenKind};
use super::whitespace::{classify_lead, match_whitespace, Utf8Lead};
use crate::richtext::encoding::{transcode, Decoder, Encoding, StandardDecoder};
use bstr::BString;
use log::{debug, trace};

/// Settings shared by every tokenizer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeOptions {
    pub case_insensitive_commands: bool,
    /// Start in UTF-8 rather than US-ASCII.
    pub utf8: bool,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        TokenizeOptions {
            case_insensitive_commands: true,
            utf8: true,
        }
    }
}

/// Successful tokenizer output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub warnings: Vec<LexWarning>,
}

/// Tokenizes `input` using the built-in [`StandardDecoder`].
pub fn tokenize(input: &[u8], options: TokenizeOptions) -> Result<Tokenized, TokenizeError> {
    tokenize_with_decoder(input, options, &StandardDecoder)
}

/// Tokenizes `input`, decoding single-byte encodings with `decoder`.
pub fn tokenize_with_decoder(
    input: &[u8],
    options: TokenizeOptions,
    decoder: &dyn Decoder,
) -> Result<Tokenized, TokenizeError> {
    let mut scanner = Scanner::new(input, options, decoder);
    scanner.run()?;
    debug!(
        "tokenized {} bytes into {} tokens ({} warnings)",
        input.len(),
        scanner.tokens.len(),
        scanner.warnings.len()
    );
    Ok(Tokenized {
        tokens: scanner.tokens,
        warnings: scanner.warnings,
    })
}

/// Start of a text run that has not been emitted yet.
#[derive(Debug, Clone, Copy)]
struct PendingText {
    byte_offset: usize,
    codepoint_offset: usize,
}

struct Scanner<'a> {
    input: &'a [u8],
    options: TokenizeOptions,
    decoder: &'a dyn Decoder,
    pos: usize,
    codepoint: usize,
    encoding: Encoding,
    encoding_stack: Vec<Encoding>,
    pending: Option<PendingText>,
    tokens: Vec<Token>,
    warnings: Vec<LexWarning>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a [u8], options: TokenizeOptions, decoder: &'a dyn Decoder) -> Self {
        let encoding = if options.utf8 {
            Encoding::Utf8
        } else {
            Encoding::UsAscii
        };
        Scanner {
            input,
            options,
            decoder,
            pos: 0,
            codepoint: 0,
            encoding,
            encoding_stack: Vec::new(),
            pending: None,
            tokens: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), TokenizeError> {
        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];
            if rest[0] == b'<' {
                self.flush_text()?;
                self.scan_command()?;
                continue;
            }
            if let Some(found) = match_whitespace(rest, self.encoding.is_utf8()) {
                self.flush_text()?;
                let (start, start_cp) = (self.pos, self.codepoint);
                self.pos += found.byte_len;
                self.codepoint += found.codepoints;
                self.emit(TokenKind::Whitespace, start, start_cp, start..self.pos)?;
                continue;
            }
            if self.pending.is_none() {
                self.pending = Some(PendingText {
                    byte_offset: self.pos,
                    codepoint_offset: self.codepoint,
                });
            }
            self.advance_char();
        }
        self.flush_text()
    }

    /// Scans `<name>` or `</name>` starting at the current `<`.
    fn scan_command(&mut self) -> Result<(), TokenizeError> {
        let (start, start_cp) = (self.pos, self.codepoint);
        let kind = if self.input.get(start + 1) == Some(&b'/') {
            TokenKind::CommandEnd
        } else {
            TokenKind::CommandStart
        };
        let name_start = match kind {
            TokenKind::CommandEnd => start + 2,
            _ => start + 1,
        };
        // The '<' and optional '/' are ASCII under every encoding.
        self.codepoint += name_start - start;
        self.pos = name_start;

        loop {
            match self.input.get(self.pos) {
                None => {
                    return Err(self.fail(TokenizeErrorKind::UnterminatedCommand, start, start_cp))
                }
                Some(b'>') => break,
                Some(b'<') => {
                    return Err(self.fail(
                        TokenizeErrorKind::UnexpectedCommandStart,
                        self.pos,
                        self.codepoint,
                    ))
                }
                Some(_) => self.advance_char(),
            }
        }

        let name_end = self.pos;
        self.pos += 1;
        self.codepoint += 1;
        self.emit(kind, start, start_cp, name_start..name_end)?;

        let name = &self.input[name_start..name_end];
        if let Some(encoding) =
            Encoding::from_command_name(name, self.options.case_insensitive_commands)
        {
            self.switch_encoding(kind, encoding, start, start_cp)?;
        }
        Ok(())
    }

    fn switch_encoding(
        &mut self,
        kind: TokenKind,
        encoding: Encoding,
        start: usize,
        start_cp: usize,
    ) -> Result<(), TokenizeError> {
        if kind == TokenKind::CommandStart {
            self.encoding_stack.push(self.encoding);
            trace!("byte {}: switching {} -> {}", start, self.encoding, encoding);
            self.encoding = encoding;
            return Ok(());
        }
        let Some(&previous) = self.encoding_stack.last() else {
            return Err(self.fail(TokenizeErrorKind::EncodingStackUnderflow, start, start_cp));
        };
        if encoding != self.encoding {
            return Err(self.fail(
                TokenizeErrorKind::UnbalancedEncodingCommands,
                start,
                start_cp,
            ));
        }
        self.encoding_stack.pop();
        trace!("byte {}: restoring {} -> {}", start, self.encoding, previous);
        self.encoding = previous;
        Ok(())
    }

    /// Steps over one character of the active encoding.
    ///
    /// UTF-8 continuation bytes following a lead byte are skipped without being
    /// validated.
    fn advance_char(&mut self) {
        let remaining = self.input.len() - self.pos;
        let step = if self.encoding.is_utf8() {
            match classify_lead(self.input[self.pos]) {
                Utf8Lead::Ascii => 1,
                Utf8Lead::Multi(len) => len.min(remaining),
                Utf8Lead::Continuation => {
                    self.warn(LexWarningKind::UnexpectedContinuationByte);
                    1
                }
                Utf8Lead::Invalid => {
                    self.warn(LexWarningKind::InvalidUtf8Character);
                    1
                }
            }
        } else {
            1
        };
        self.pos += step;
        self.codepoint += 1;
    }

    fn warn(&mut self, kind: LexWarningKind) {
        self.warnings.push(LexWarning {
            kind,
            byte_offset: self.pos,
            codepoint_offset: self.codepoint,
        });
    }

    fn flush_text(&mut self) -> Result<(), TokenizeError> {
        match self.pending.take() {
            Some(text) => self.emit(
                TokenKind::Text,
                text.byte_offset,
                text.codepoint_offset,
                text.byte_offset..self.pos,
            ),
            None => Ok(()),
        }
    }

    /// Emits a token spanning `start..self.pos` whose text is `content`.
    fn emit(
        &mut self,
        kind: TokenKind,
        start: usize,
        start_cp: usize,
        content: std::ops::Range<usize>,
    ) -> Result<(), TokenizeError> {
        let raw = &self.input[content.clone()];
        let text = if self.encoding.is_utf8() {
            BString::from(raw)
        } else {
            match transcode(raw, self.encoding, self.decoder) {
                Ok(text) => text,
                Err(index) => {
                    // Single-byte encodings: one codepoint per byte.
                    let byte = content.start + index;
                    let codepoint = start_cp + (byte - start);
                    return Err(self.fail(
                        TokenizeErrorKind::TextDecodingFailure,
                        byte,
                        codepoint,
                    ));
                }
            }
        };
        self.tokens
            .push(Token::new(kind, text, start, start_cp, self.pos - start));
        Ok(())
    }

    fn fail(
        &mut self,
        kind: TokenizeErrorKind,
        byte_offset: usize,
        codepoint_offset: usize,
    ) -> TokenizeError {
        TokenizeError {
            kind,
            byte_offset,
            codepoint_offset,
            warnings: std::mem::take(&mut self.warnings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokenized: &Tokenized) -> Vec<TokenKind> {
        tokenized.tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_command_and_text() {
        let out = tokenize(b"<foo>bar</foo>", TokenizeOptions::default()).unwrap();
        assert_eq!(
            out.tokens,
            vec![
                Token::new(TokenKind::CommandStart, "foo", 0, 0, 5),
                Token::new(TokenKind::Text, "bar", 5, 5, 3),
                Token::new(TokenKind::CommandEnd, "foo", 8, 8, 6),
            ]
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_whitespace_is_one_token_per_character() {
        let out = tokenize(b"a  b\r\nc", TokenizeOptions::default()).unwrap();
        assert_eq!(
            kinds(&out),
            vec![
                TokenKind::Text,
                TokenKind::Whitespace,
                TokenKind::Whitespace,
                TokenKind::Text,
                TokenKind::Whitespace,
                TokenKind::Text,
            ]
        );
        let crlf = &out.tokens[4];
        assert_eq!((crlf.byte_offset, crlf.byte_len), (4, 2));
        assert_eq!(out.tokens[5].codepoint_offset, 6);
    }

    #[test]
    fn test_gt_outside_command_is_text() {
        let out = tokenize(b"a>b", TokenizeOptions::default()).unwrap();
        assert_eq!(out.tokens.len(), 1);
        assert_eq!(out.tokens[0].text, "a>b");
    }

    #[test]
    fn test_codepoints_count_utf8_sequences() {
        let out = tokenize("héllo <b>".as_bytes(), TokenizeOptions::default()).unwrap();
        let command = &out.tokens[2];
        assert_eq!(command.byte_offset, 7);
        assert_eq!(command.codepoint_offset, 6);
    }

    #[test]
    fn test_stray_continuation_byte_is_folded_into_text() {
        let out = tokenize(b"ab\x80cd", TokenizeOptions::default()).unwrap();
        assert_eq!(out.tokens.len(), 1);
        assert_eq!(out.tokens[0].text, BString::from(&b"ab\x80cd"[..]));
        assert_eq!(
            out.warnings,
            vec![LexWarning {
                kind: LexWarningKind::UnexpectedContinuationByte,
                byte_offset: 2,
                codepoint_offset: 2,
            }]
        );
    }

    #[test]
    fn test_unexpected_command_start() {
        let err = tokenize(b"x<a<b>", TokenizeOptions::default()).unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::UnexpectedCommandStart);
        assert_eq!((err.byte_offset, err.codepoint_offset), (3, 3));
    }

    #[test]
    fn test_unterminated_command_keeps_warnings() {
        let err = tokenize(b"\xFF<abc", TokenizeOptions::default()).unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::UnterminatedCommand);
        assert_eq!(err.byte_offset, 1);
        assert_eq!(err.warnings.len(), 1);
        assert_eq!(err.warnings[0].kind, LexWarningKind::InvalidUtf8Character);
    }

    #[test]
    fn test_latin1_text_is_transcoded() {
        let out = tokenize(
            b"<ISO-8859-1>caf\xE9</ISO-8859-1>",
            TokenizeOptions::default(),
        )
        .unwrap();
        assert_eq!(out.tokens[1].text, BString::from("café"));
        assert_eq!(out.tokens[1].byte_len, 4);
        assert_eq!(out.tokens[2].byte_offset, 16);
        assert_eq!(out.tokens[2].codepoint_offset, 16);
    }

    #[test]
    fn test_single_byte_nbsp_is_whitespace() {
        let out = tokenize(b"<ISO-8859-1>a\xA0b</ISO-8859-1>", TokenizeOptions::default())
            .unwrap();
        assert_eq!(out.tokens[2].kind, TokenKind::Whitespace);
        assert_eq!(out.tokens[2].text, BString::from("\u{A0}"));
    }

    #[test]
    fn test_ascii_start_rejects_high_bytes() {
        let options = TokenizeOptions {
            utf8: false,
            ..TokenizeOptions::default()
        };
        let err = tokenize(b"ok caf\xE9", options).unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::TextDecodingFailure);
        assert_eq!(err.byte_offset, 6);
    }

    #[test]
    fn test_encoding_end_without_start() {
        let err = tokenize(b"a</US-ASCII>", TokenizeOptions::default()).unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::EncodingStackUnderflow);
        assert_eq!(err.byte_offset, 1);
    }

    #[test]
    fn test_case_sensitive_encoding_names() {
        let options = TokenizeOptions {
            case_insensitive_commands: false,
            utf8: true,
        };
        // Not an encoding command when case matters, so no underflow.
        let out = tokenize(b"</us-ascii>", options).unwrap();
        assert_eq!(out.tokens.len(), 1);
    }
}
