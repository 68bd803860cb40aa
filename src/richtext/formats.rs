//! Output formats for processed documents
//!
//!     A [`Renderer`] turns a processed [`Document`] into text. Renderers are looked up
//!     by name through a [`FormatRegistry`]; [`FormatRegistry::with_defaults`] knows the
//!     built-in ones:
//!
//!         treeviz   layout tree, one line per block, paragraph, line and segment
//!         ast       command tree, one line per node
//!         json      resolved layout as JSON, node text inlined
//!         tokens    token stream as JSON

pub mod json;
pub mod registry;
pub mod treeviz;

use crate::richtext::pipeline::Document;
use thiserror::Error;

pub use json::{JsonRenderer, TokensRenderer};
pub use registry::FormatRegistry;
pub use treeviz::{AstTreevizRenderer, TreevizRenderer};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Renders a processed document.
pub trait Renderer: Send + Sync {
    /// The name this renderer is registered under (e.g. "treeviz").
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn render(&self, document: &Document) -> Result<String, FormatError>;
}
