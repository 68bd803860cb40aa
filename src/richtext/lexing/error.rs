//! Tokenizer warnings and errors

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
pub enum LexWarningKind {
    #[error("unexpected UTF-8 continuation byte")]
    UnexpectedContinuationByte,
    #[error("invalid UTF-8 lead byte")]
    InvalidUtf8Character,
}

/// A malformed UTF-8 byte that was kept as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[error("{kind} at byte {byte_offset} (codepoint {codepoint_offset})")]
pub struct LexWarning {
    pub kind: LexWarningKind,
    pub byte_offset: usize,
    pub codepoint_offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
pub enum TokenizeErrorKind {
    #[error("'<' inside a command")]
    UnexpectedCommandStart,
    #[error("command is never closed with '>'")]
    UnterminatedCommand,
    #[error("encoding end command does not match the active encoding")]
    UnbalancedEncodingCommands,
    #[error("encoding end command without a matching start")]
    EncodingStackUnderflow,
    #[error("text cannot be decoded in the active encoding")]
    TextDecodingFailure,
}

/// Tokenization failure, with every warning recorded before it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {byte_offset} (codepoint {codepoint_offset})")]
pub struct TokenizeError {
    pub kind: TokenizeErrorKind,
    pub byte_offset: usize,
    pub codepoint_offset: usize,
    pub warnings: Vec<LexWarning>,
}
