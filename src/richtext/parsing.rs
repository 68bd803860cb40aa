//! Parsing
//!
//!     Turns the flat token sequence into a forest of command nodes. Command start and
//!     end tokens must balance, compared by name (case-folded when case-insensitive
//!     commands are enabled). Text and whitespace tokens become leaves of whatever
//!     command is open at that point, or roots when none is.
//!
//!     The forest is immutable once built. Later stages refer to its nodes by
//!     [`NodeId`] and resolve them through the forest, so the forest has to outlive
//!     anything derived from it.

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::{AstNode, DepthFirst, Forest, NodeId, NodeKind, NodeRef};
pub use error::{ParseError, ParseErrorKind};
pub use parser::parse;
