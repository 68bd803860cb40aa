//! Parser errors

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
pub enum ParseErrorKind {
    /// `</lt>`, `</nl>` or `</np>`.
    #[error("end command for a command that never encloses content")]
    UnallowedBalancingCommandEnd,
    #[error("end command does not match the open command")]
    ImproperlyBalancedCommand,
    #[error("end command without an open command")]
    UnexpectedCommandEnd,
    #[error("command is never closed")]
    UnterminatedCommand,
}

/// Located at the offending token, or at the still-open command for
/// [`ParseErrorKind::UnterminatedCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[error("{kind} at byte {byte_offset} (codepoint {codepoint_offset}, token {token_index})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub byte_offset: usize,
    pub codepoint_offset: usize,
    pub token_index: usize,
}
