//! Layout elements
//!
//!     The resolved document is a sequence of blocks, each holding paragraphs, which hold
//!     lines, which hold segments. A segment is a run of content that shares one style:
//!     alignment, indentation, font size change and font levels.
//!
//!     Layout elements never own AST nodes. `causing_command`, `content` and
//!     `open_markers` are [`NodeId`]s into the forest the layout was resolved from.

use super::style::SegmentStyle;
use crate::richtext::commands::names_equal;
use crate::richtext::parsing::{Forest, NodeId, NodeKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockKind {
    Heading,
    Footing,
    MainContent,
    PageBreak,
    SamePageStart,
    SamePageEnd,
    Custom,
}

impl BlockKind {
    /// Marker blocks are kept even when they hold no paragraphs.
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            BlockKind::PageBreak | BlockKind::SamePageStart | BlockKind::SamePageEnd
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParagraphKind {
    /// Opened by a `<Paragraph>` command.
    Explicit,
    Implicit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutBlock {
    pub causing_command: Option<NodeId>,
    pub kind: BlockKind,
    pub paragraphs: Vec<LayoutParagraph>,
}

impl LayoutBlock {
    pub fn new(causing_command: Option<NodeId>, kind: BlockKind) -> Self {
        LayoutBlock {
            causing_command,
            kind,
            paragraphs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutParagraph {
    pub causing_command: Option<NodeId>,
    pub kind: ParagraphKind,
    pub lines: Vec<LayoutLine>,
}

impl LayoutParagraph {
    pub fn new(causing_command: Option<NodeId>, kind: ParagraphKind) -> Self {
        LayoutParagraph {
            causing_command,
            kind,
            lines: Vec::new(),
        }
    }

    /// Lines joined with `\n`.
    pub fn text(&self, forest: &Forest) -> String {
        self.lines
            .iter()
            .map(|line| line.text(forest))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutLine {
    pub causing_command: Option<NodeId>,
    pub segments: Vec<LayoutLineSegment>,
}

impl LayoutLine {
    pub fn new(causing_command: Option<NodeId>) -> Self {
        LayoutLine {
            causing_command,
            segments: Vec::new(),
        }
    }

    pub fn text(&self, forest: &Forest) -> String {
        self.segments
            .iter()
            .map(|segment| segment.text(forest))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutLineSegment {
    pub causing_command: Option<NodeId>,
    pub style: SegmentStyle,
    /// Custom segment commands currently open, innermost last.
    ///
    /// Only commands a custom-command hook classifies as new line segments end up
    /// here. `Subscript`, `Superscript`, `Excerpt` and `Signature` are inline content
    /// in the standard vocabulary and never appear on this stack.
    pub open_markers: Vec<NodeId>,
    pub content: Vec<NodeId>,
}

impl LayoutLineSegment {
    pub fn new(causing_command: Option<NodeId>) -> Self {
        LayoutLineSegment {
            causing_command,
            style: SegmentStyle::default(),
            open_markers: Vec::new(),
            content: Vec::new(),
        }
    }

    /// An empty segment carrying this segment's style and open markers.
    pub fn continuation(&self, causing_command: Option<NodeId>) -> Self {
        LayoutLineSegment {
            causing_command,
            style: self.style,
            open_markers: self.open_markers.clone(),
            content: Vec::new(),
        }
    }

    /// Plain text of the segment's content.
    ///
    /// Text and whitespace nodes contribute their text and `<lt>` contributes `<`,
    /// its name compared the way `forest` was parsed. Other commands contribute
    /// nothing; the content they enclose is listed in the segment separately unless
    /// it is a comment.
    pub fn text(&self, forest: &Forest) -> String {
        let case_insensitive = forest.case_insensitive_commands();
        let mut out = String::new();
        for &id in &self.content {
            let node = &forest[id];
            match node.kind {
                NodeKind::Text | NodeKind::Whitespace => out.push_str(&node.text.to_string()),
                NodeKind::Command if names_equal(&node.text, b"lt", case_insensitive) => {
                    out.push('<')
                }
                NodeKind::Command => {}
            }
        }
        out
    }
}
