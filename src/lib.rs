//! # richtext
//!
//! Tokenizer, parser and layout resolver for the richtext command markup.
//!
//! ## Testing
//!
//! Layout tests use the fluent assertions of the [testing module](richtext::testing).

pub mod richtext;
