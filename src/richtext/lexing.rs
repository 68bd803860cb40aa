//! Lexing
//!
//!     Turns raw richtext bytes into a flat sequence of tokens: command starts, command
//!     ends, text runs and whitespace characters.
//!
//! Offsets
//!
//!     Every token carries the byte offset and the codepoint offset of its first byte in
//!     the original input, plus the number of bytes it spans. Tokens tile the input: the
//!     spans are contiguous and their lengths add up to the input length. This holds even
//!     when the token text itself was transcoded from a single-byte encoding to UTF-8.
//!
//! Encodings
//!
//!     The input starts in UTF-8 (or US-ASCII when UTF-8 is disabled). The encoding
//!     commands `<US-ASCII>`, `<ISO-8859-1>` ... `<ISO-8859-9>` and `<UTF-8>` switch the
//!     active encoding until their end command, nesting like a stack. The encoding
//!     commands are still emitted as ordinary command tokens, so later stages see them.
//!
//! Warnings and errors
//!
//!     Malformed UTF-8 is recorded as a [`LexWarning`] and kept as text. Structural
//!     problems (a `<` inside a command, an unterminated command, unbalanced encoding
//!     commands, undecodable text) abort with a [`TokenizeError`] that still carries the
//!     warnings collected up to that point.

pub mod error;
pub mod tokenizer;
pub mod tokens;
pub mod whitespace;

pub use error::{LexWarning, LexWarningKind, TokenizeError, TokenizeErrorKind};
pub use tokenizer::{tokenize, tokenize_with_decoder, TokenizeOptions, Tokenized};
pub use tokens::{Token, TokenKind};
