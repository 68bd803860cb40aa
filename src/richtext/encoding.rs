//! Character encodings
//!
//!     Richtext input starts out in UTF-8 or US-ASCII and may switch encodings with
//!     commands such as `<ISO-8859-2>...</ISO-8859-2>`. The tokenizer keeps a stack of
//!     these switches; this module only knows about the encodings themselves.
//!
//!     Single-byte encodings are decoded through the [`Decoder`] trait, so callers can
//!     substitute their own byte → codepoint tables. [`StandardDecoder`] covers
//!     US-ASCII and ISO-8859-1 through ISO-8859-9. Decoded text is always stored as
//!     UTF-8.
//!
//! Code pages
//!
//!     ISO-8859-2 through ISO-8859-8 decode through the matching `encoding_rs` code
//!     page; positions a part leaves unassigned fail. `encoding_rs` follows WHATWG,
//!     which reads ISO-8859-1 as windows-1252 and ISO-8859-9 as windows-1254. Those
//!     disagree with the ISO parts in 0x80..0x9F, so ISO-8859-1 is decoded as the
//!     identity and ISO-8859-9 only goes through windows-1254 from 0xA0 up.
//!     US-ASCII is strict: bytes from 0x80 fail.

use crate::richtext::commands::CommandTable;
use bstr::BString;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

/// The eleven encodings richtext can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Encoding {
    Utf8,
    UsAscii,
    Iso8859_1,
    Iso8859_2,
    Iso8859_3,
    Iso8859_4,
    Iso8859_5,
    Iso8859_6,
    Iso8859_7,
    Iso8859_8,
    Iso8859_9,
}

static ENCODING_NAMES: Lazy<CommandTable<Encoding>> = Lazy::new(|| {
    let entries: Vec<(&'static str, Encoding)> =
        Encoding::ALL.iter().map(|e| (e.name(), *e)).collect();
    CommandTable::new(&entries)
});

impl Encoding {
    pub const ALL: [Encoding; 11] = [
        Encoding::Utf8,
        Encoding::UsAscii,
        Encoding::Iso8859_1,
        Encoding::Iso8859_2,
        Encoding::Iso8859_3,
        Encoding::Iso8859_4,
        Encoding::Iso8859_5,
        Encoding::Iso8859_6,
        Encoding::Iso8859_7,
        Encoding::Iso8859_8,
        Encoding::Iso8859_9,
    ];

    /// The command name that switches to this encoding.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::UsAscii => "US-ASCII",
            Encoding::Iso8859_1 => "ISO-8859-1",
            Encoding::Iso8859_2 => "ISO-8859-2",
            Encoding::Iso8859_3 => "ISO-8859-3",
            Encoding::Iso8859_4 => "ISO-8859-4",
            Encoding::Iso8859_5 => "ISO-8859-5",
            Encoding::Iso8859_6 => "ISO-8859-6",
            Encoding::Iso8859_7 => "ISO-8859-7",
            Encoding::Iso8859_8 => "ISO-8859-8",
            Encoding::Iso8859_9 => "ISO-8859-9",
        }
    }

    /// Resolves a command name to the encoding it selects, if any.
    pub fn from_command_name(name: &[u8], case_insensitive: bool) -> Option<Encoding> {
        ENCODING_NAMES.lookup(name, case_insensitive)
    }

    pub fn is_utf8(self) -> bool {
        self == Encoding::Utf8
    }

    fn code_page(self) -> Option<&'static encoding_rs::Encoding> {
        match self {
            Encoding::Iso8859_2 => Some(encoding_rs::ISO_8859_2),
            Encoding::Iso8859_3 => Some(encoding_rs::ISO_8859_3),
            Encoding::Iso8859_4 => Some(encoding_rs::ISO_8859_4),
            Encoding::Iso8859_5 => Some(encoding_rs::ISO_8859_5),
            Encoding::Iso8859_6 => Some(encoding_rs::ISO_8859_6),
            Encoding::Iso8859_7 => Some(encoding_rs::ISO_8859_7),
            Encoding::Iso8859_8 => Some(encoding_rs::ISO_8859_8),
            Encoding::Iso8859_9 => Some(encoding_rs::WINDOWS_1254),
            Encoding::Utf8 | Encoding::UsAscii | Encoding::Iso8859_1 => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte → codepoint decoding for the single-byte encodings.
///
/// Returning `None` means the byte has no meaning in that encoding; the tokenizer
/// turns this into a `TextDecodingFailure`. Decoders are never asked about
/// [`Encoding::Utf8`].
pub trait Decoder {
    fn decode(&self, encoding: Encoding, byte: u8) -> Option<char>;
}

impl<F> Decoder for F
where
    F: Fn(Encoding, u8) -> Option<char>,
{
    fn decode(&self, encoding: Encoding, byte: u8) -> Option<char> {
        self(encoding, byte)
    }
}

/// The built-in decoder, backed by the `encoding_rs` code pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDecoder;

impl Decoder for StandardDecoder {
    fn decode(&self, encoding: Encoding, byte: u8) -> Option<char> {
        match encoding {
            Encoding::Utf8 => None,
            Encoding::UsAscii => byte.is_ascii().then_some(char::from(byte)),
            Encoding::Iso8859_1 => Some(char::from(byte)),
            Encoding::Iso8859_9 if byte < 0xA0 => Some(char::from(byte)),
            _ => encoding
                .code_page()?
                .decode_without_bom_handling_and_without_replacement(&[byte])?
                .chars()
                .next(),
        }
    }
}

/// Transcodes single-byte `bytes` to UTF-8.
///
/// On failure returns the index of the first byte the decoder rejected.
pub fn transcode(
    bytes: &[u8],
    encoding: Encoding,
    decoder: &dyn Decoder,
) -> Result<BString, usize> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut buf = [0u8; 4];
    for (index, &byte) in bytes.iter().enumerate() {
        let ch = decoder.decode(encoding, byte).ok_or(index)?;
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
    Ok(BString::from(out))
}
