//! Richtext processing
//!
//!     Richtext is a markup of angle-bracket commands: `<Bold>text</Bold>` encloses
//!     content, `<nl>`, `<np>` and `<lt>` stand alone. Processing runs in three stages,
//!     each consuming the previous stage's output:
//!
//!         bytes ──lexing──▶ tokens ──parsing──▶ command forest ──layout──▶ blocks
//!
//!     Every stage reports positions as byte and codepoint offsets into the original
//!     input. Recoverable oddities are collected as warnings; anything else stops the
//!     stage with an error that still carries the warnings seen so far.
//!
//!     [`pipeline::process`] chains the stages, [`formats`] renders the result and
//!     [`config`] loads the settings the command line tool runs with.

pub mod commands;
pub mod config;
pub mod encoding;
pub mod formats;
pub mod layout;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod testing;

pub use pipeline::{process, Document, PipelineError, ProcessOptions, Warning};
