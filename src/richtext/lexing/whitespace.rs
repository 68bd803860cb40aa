//! Byte classification for the tokenizer
//!
//!     Under UTF-8 the Unicode White_Space characters are recognised: the ASCII ones
//!     plus a fixed set of two- and three-byte sequences (no four-byte whitespace
//!     exists). Under the single-byte encodings only ASCII whitespace and 0xA0 (no-break
//!     space) count.

/// How a byte behaves when it starts a UTF-8 sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Lead {
    Ascii,
    /// Lead byte of a sequence of the given total length (2..=4).
    Multi(usize),
    /// 0x80..=0xBF where a lead byte was expected.
    Continuation,
    /// 0xF8..=0xFF, which cannot start any sequence.
    Invalid,
}

pub fn classify_lead(byte: u8) -> Utf8Lead {
    match byte {
        0x00..=0x7F => Utf8Lead::Ascii,
        0x80..=0xBF => Utf8Lead::Continuation,
        0xC0..=0xDF => Utf8Lead::Multi(2),
        0xE0..=0xEF => Utf8Lead::Multi(3),
        0xF0..=0xF7 => Utf8Lead::Multi(4),
        0xF8..=0xFF => Utf8Lead::Invalid,
    }
}

/// TAB, LF, VT, FF, CR and SPACE.
pub fn is_ascii_whitespace(byte: u8) -> bool {
    matches!(byte, 0x09..=0x0D | 0x20)
}

/// Multi-byte UTF-8 encodings of the Unicode White_Space characters.
const UTF8_WHITESPACE: [&[u8]; 19] = [
    b"\xC2\x85",     // NEXT LINE
    b"\xC2\xA0",     // NO-BREAK SPACE
    b"\xE1\x9A\x80", // OGHAM SPACE MARK
    b"\xE2\x80\x80", // EN QUAD
    b"\xE2\x80\x81",
    b"\xE2\x80\x82",
    b"\xE2\x80\x83",
    b"\xE2\x80\x84",
    b"\xE2\x80\x85",
    b"\xE2\x80\x86",
    b"\xE2\x80\x87",
    b"\xE2\x80\x88",
    b"\xE2\x80\x89",
    b"\xE2\x80\x8A", // HAIR SPACE
    b"\xE2\x80\xA8", // LINE SEPARATOR
    b"\xE2\x80\xA9", // PARAGRAPH SEPARATOR
    b"\xE2\x80\xAF", // NARROW NO-BREAK SPACE
    b"\xE2\x81\x9F", // MEDIUM MATHEMATICAL SPACE
    b"\xE3\x80\x80", // IDEOGRAPHIC SPACE
];

/// A whitespace character found at the start of some input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitespaceMatch {
    pub byte_len: usize,
    pub codepoints: usize,
}

impl WhitespaceMatch {
    const fn new(byte_len: usize, codepoints: usize) -> Self {
        WhitespaceMatch {
            byte_len,
            codepoints,
        }
    }
}

/// Matches one whitespace character (or CRLF) at the start of `rest`.
pub fn match_whitespace(rest: &[u8], utf8: bool) -> Option<WhitespaceMatch> {
    let &first = rest.first()?;
    if rest.starts_with(b"\r\n") {
        return Some(WhitespaceMatch::new(2, 2));
    }
    if is_ascii_whitespace(first) {
        return Some(WhitespaceMatch::new(1, 1));
    }
    if !utf8 {
        return (first == 0xA0).then_some(WhitespaceMatch::new(1, 1));
    }
    UTF8_WHITESPACE
        .iter()
        .find(|sequence| rest.starts_with(sequence))
        .map(|sequence| WhitespaceMatch::new(sequence.len(), 1))
}
