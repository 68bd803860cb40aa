//! Layout warnings and errors

use crate::richtext::parsing::NodeId;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
pub enum LayoutWarningKind {
    #[error("page break inside a SamePage region")]
    NewPageInsideSamePage,
    #[error("SamePage nested inside another SamePage")]
    NestedSamePage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[error("{kind} at byte {byte_offset} (codepoint {codepoint_offset})")]
pub struct LayoutWarning {
    pub kind: LayoutWarningKind,
    pub node: NodeId,
    pub byte_offset: usize,
    pub codepoint_offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
pub enum LayoutErrorKind {
    #[error("block end without a saved enclosing block kind")]
    BlockTypeStackUnderflow,
    #[error("alignment end without a saved enclosing alignment")]
    ContentAlignmentStackUnderflow,
    #[error("left indentation level overflow")]
    LeftIndentationLevelOverflow,
    #[error("left indentation level underflow")]
    LeftIndentationLevelUnderflow,
    #[error("right indentation level overflow")]
    RightIndentationLevelOverflow,
    #[error("right indentation level underflow")]
    RightIndentationLevelUnderflow,
    #[error("font size change overflow")]
    FontSizeChangeOverflow,
    #[error("font size change underflow")]
    FontSizeChangeUnderflow,
    #[error("bold level overflow")]
    FontBoldLevelOverflow,
    #[error("bold level underflow")]
    FontBoldLevelUnderflow,
    #[error("italic level overflow")]
    FontItalicLevelOverflow,
    #[error("italic level underflow")]
    FontItalicLevelUnderflow,
    #[error("underline level overflow")]
    FontUnderlineLevelOverflow,
    #[error("underline level underflow")]
    FontUnderlineLevelUnderflow,
    #[error("fixed-width level overflow")]
    FontFixedLevelOverflow,
    #[error("fixed-width level underflow")]
    FontFixedLevelUnderflow,
    #[error("segment marker end without an open marker")]
    OtherSegmentMarkerStackUnderflow,
    #[error("segment marker end does not match the innermost open marker")]
    OtherSegmentMarkerStackInconsistency,
    #[error("custom command rejected by the command hook")]
    InvalidCustomCommand,
    #[error("command hook returned an interpretation custom commands cannot have")]
    InvalidCustomCommandInterpretation,
}

/// Layout failure, located at the command being processed, with every warning
/// recorded before it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {byte_offset} (codepoint {codepoint_offset})")]
pub struct LayoutError {
    pub kind: LayoutErrorKind,
    pub node: NodeId,
    pub byte_offset: usize,
    pub codepoint_offset: usize,
    pub warnings: Vec<LayoutWarning>,
}
