//! End-to-end processing
//!
//!     Chains the three stages: tokenize, parse, resolve layout. Processing stops at
//!     the first failing stage; the error carries every warning reported before it.
//!
//!     [`DocumentLoader`] is the file-facing entry point used by the command line tool.

use crate::richtext::encoding::{Decoder, StandardDecoder};
use crate::richtext::layout::{
    resolve, CustomCommandHook, LayoutBlock, LayoutError, LayoutWarning,
};
use crate::richtext::lexing::{
    tokenize_with_decoder, LexWarning, Token, TokenizeError, TokenizeOptions,
};
use crate::richtext::parsing::{parse, Forest, ParseError};
use log::debug;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    pub case_insensitive_commands: bool,
    /// Start in UTF-8 rather than US-ASCII.
    pub utf8: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            case_insensitive_commands: true,
            utf8: true,
        }
    }
}

impl From<ProcessOptions> for TokenizeOptions {
    fn from(options: ProcessOptions) -> Self {
        TokenizeOptions {
            case_insensitive_commands: options.case_insensitive_commands,
            utf8: options.utf8,
        }
    }
}

/// A warning from any stage, in the order the stages ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
pub enum Warning {
    #[error("lexing: {0}")]
    Lexing(LexWarning),
    #[error("layout: {0}")]
    Layout(LayoutWarning),
}

impl Warning {
    pub fn byte_offset(&self) -> usize {
        match self {
            Warning::Lexing(warning) => warning.byte_offset,
            Warning::Layout(warning) => warning.byte_offset,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("tokenizing failed: {0}")]
    Tokenize(#[from] TokenizeError),
    #[error("parsing failed: {source}")]
    Parse {
        source: ParseError,
        lexing_warnings: Vec<LexWarning>,
    },
    #[error("layout failed: {source}")]
    Layout {
        source: LayoutError,
        lexing_warnings: Vec<LexWarning>,
    },
}

impl PipelineError {
    /// Warnings reported before the failure, tokenizer warnings first.
    pub fn warnings(&self) -> Vec<Warning> {
        match self {
            PipelineError::Tokenize(error) => {
                error.warnings.iter().copied().map(Warning::Lexing).collect()
            }
            PipelineError::Parse {
                lexing_warnings, ..
            } => lexing_warnings.iter().copied().map(Warning::Lexing).collect(),
            PipelineError::Layout {
                source,
                lexing_warnings,
            } => lexing_warnings
                .iter()
                .copied()
                .map(Warning::Lexing)
                .chain(source.warnings.iter().copied().map(Warning::Layout))
                .collect(),
        }
    }

    /// Byte offset of the failure in the input.
    pub fn byte_offset(&self) -> usize {
        match self {
            PipelineError::Tokenize(error) => error.byte_offset,
            PipelineError::Parse { source, .. } => source.byte_offset,
            PipelineError::Layout { source, .. } => source.byte_offset,
        }
    }
}

/// A fully processed document.
///
/// `blocks` refer to nodes of `forest` by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub tokens: Vec<Token>,
    pub forest: Forest,
    pub blocks: Vec<LayoutBlock>,
    pub warnings: Vec<Warning>,
}

impl Document {
    /// The text of every paragraph, paragraphs separated by a blank line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .flat_map(|block| &block.paragraphs)
            .map(|paragraph| paragraph.text(&self.forest))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Runs all three stages over `input` with the built-in decoder.
pub fn process(
    input: &[u8],
    options: &ProcessOptions,
    hook: Option<&dyn CustomCommandHook>,
) -> Result<Document, PipelineError> {
    process_with_decoder(input, options, hook, &StandardDecoder)
}

pub fn process_with_decoder(
    input: &[u8],
    options: &ProcessOptions,
    hook: Option<&dyn CustomCommandHook>,
    decoder: &dyn Decoder,
) -> Result<Document, PipelineError> {
    let tokenized = tokenize_with_decoder(input, (*options).into(), decoder)?;
    let forest = match parse(&tokenized.tokens, options.case_insensitive_commands) {
        Ok(forest) => forest,
        Err(source) => {
            return Err(PipelineError::Parse {
                source,
                lexing_warnings: tokenized.warnings,
            })
        }
    };
    let resolved = match resolve(&forest, hook, options.case_insensitive_commands) {
        Ok(resolved) => resolved,
        Err(source) => {
            return Err(PipelineError::Layout {
                source,
                lexing_warnings: tokenized.warnings,
            })
        }
    };

    let warnings: Vec<Warning> = tokenized
        .warnings
        .into_iter()
        .map(Warning::Lexing)
        .chain(resolved.warnings.into_iter().map(Warning::Layout))
        .collect();
    debug!(
        "processed {} bytes: {} tokens, {} nodes, {} blocks, {} warnings",
        input.len(),
        tokenized.tokens.len(),
        forest.len(),
        resolved.blocks.len(),
        warnings.len()
    );
    Ok(Document {
        tokens: tokenized.tokens,
        forest,
        blocks: resolved.blocks,
        warnings,
    })
}

/// Holds a document's bytes and the options to process it with.
///
/// # Example
///
/// ```rust
/// use richtext::richtext::pipeline::DocumentLoader;
///
/// let document = DocumentLoader::from_bytes("<Bold>hi</Bold>")
///     .process(None)
///     .unwrap();
/// assert_eq!(document.plain_text(), "hi");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    source: Vec<u8>,
    options: ProcessOptions,
}

impl DocumentLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    pub fn from_bytes(source: impl Into<Vec<u8>>) -> Self {
        DocumentLoader {
            source: source.into(),
            options: ProcessOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProcessOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Runs the tokenizer only.
    pub fn tokenize(&self) -> Result<Vec<Token>, TokenizeError> {
        tokenize_with_decoder(&self.source, self.options.into(), &StandardDecoder)
            .map(|tokenized| tokenized.tokens)
    }

    pub fn process(
        &self,
        hook: Option<&dyn CustomCommandHook>,
    ) -> Result<Document, PipelineError> {
        process(&self.source, &self.options, hook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::layout::{BlockKind, LayoutErrorKind, LayoutWarningKind};
    use crate::richtext::lexing::{LexWarningKind, TokenizeErrorKind};
    use crate::richtext::parsing::ParseErrorKind;

    #[test]
    fn test_process_simple_document() {
        let document = process(b"Hello <Bold>world</Bold>", &ProcessOptions::default(), None)
            .unwrap();
        assert_eq!(document.tokens.len(), 5);
        assert_eq!(document.blocks.len(), 1);
        assert_eq!(document.blocks[0].kind, BlockKind::MainContent);
        assert_eq!(document.plain_text(), "Hello world");
        assert!(document.warnings.is_empty());
    }

    #[test]
    fn test_warnings_merge_in_stage_order() {
        let input = b"\x80<SamePage><np></SamePage>";
        let document = process(input, &ProcessOptions::default(), None).unwrap();
        assert_eq!(document.warnings.len(), 2);
        assert!(matches!(
            document.warnings[0],
            Warning::Lexing(w) if w.kind == LexWarningKind::UnexpectedContinuationByte
        ));
        assert!(matches!(
            document.warnings[1],
            Warning::Layout(w) if w.kind == LayoutWarningKind::NewPageInsideSamePage
        ));
    }

    #[test]
    fn test_tokenize_failure() {
        let error = process(b"abc <Bold", &ProcessOptions::default(), None).unwrap_err();
        match error {
            PipelineError::Tokenize(ref inner) => {
                assert_eq!(inner.kind, TokenizeErrorKind::UnterminatedCommand)
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(error.byte_offset(), 4);
    }

    #[test]
    fn test_parse_failure_keeps_lexing_warnings() {
        let error = process(b"\xff</Bold>", &ProcessOptions::default(), None).unwrap_err();
        match &error {
            PipelineError::Parse { source, .. } => {
                assert_eq!(source.kind, ParseErrorKind::UnexpectedCommandEnd)
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(error.warnings().len(), 1);
        assert_eq!(error.byte_offset(), 1);
    }

    #[test]
    fn test_layout_failure() {
        let error = process(b"<Heading>x", &ProcessOptions::default(), None);
        assert!(matches!(error, Err(PipelineError::Parse { .. })));

        let hook = |_: crate::richtext::parsing::NodeRef<'_>, _: bool| {
            crate::richtext::layout::Interpretation::Invalid
        };
        let error = process(b"<Blink>x</Blink>", &ProcessOptions::default(), Some(&hook))
            .unwrap_err();
        match error {
            PipelineError::Layout { source, .. } => {
                assert_eq!(source.kind, LayoutErrorKind::InvalidCustomCommand)
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_loader_options() {
        let loader = DocumentLoader::from_bytes("<bold>x</BOLD>").with_options(ProcessOptions {
            case_insensitive_commands: false,
            utf8: true,
        });
        assert_eq!(loader.source(), b"<bold>x</BOLD>");
        assert!(matches!(
            loader.process(None),
            Err(PipelineError::Parse { .. })
        ));
        assert_eq!(loader.tokenize().unwrap().len(), 3);
    }

    #[test]
    fn test_loader_missing_file() {
        assert!(DocumentLoader::from_path("does-not-exist.rtx").is_err());
    }
}
