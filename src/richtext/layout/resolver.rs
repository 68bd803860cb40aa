//! The layout state machine
//!
//!     Walks the forest depth-first, handling each command twice: when it opens and after
//!     its children were visited. Four accumulators hold the block, paragraph, line and
//!     segment currently being filled. Boundary commands flush them from the bottom up:
//!
//!         new segment    current segment (if it has content) -> pending segments
//!         new line       new segment, pending segments -> current line,
//!                        current line (if it has segments) -> pending lines
//!         new paragraph  new line, pending lines -> current paragraph,
//!                        current paragraph (if it has lines) -> pending paragraphs
//!         new block      new paragraph, pending paragraphs -> current block,
//!                        current block (if it has paragraphs or is a marker) -> output
//!
//!     A fresh segment keeps the style and open markers of the one it replaces. Style
//!     only changes through segment commands, after the flush, so every segment has one
//!     uniform style.
//!
//!     The walk uses an explicit stack rather than recursion: documents nest tens of
//!     thousands of commands deep when they exercise the style counter limits.

use super::blocks::{
    BlockKind, LayoutBlock, LayoutLine, LayoutLineSegment, LayoutParagraph, ParagraphKind,
};
use super::error::{LayoutError, LayoutErrorKind, LayoutWarning, LayoutWarningKind};
use super::interpretation::{standard_interpretation, CustomCommandHook, Interpretation};
use super::style::{Alignment, StyleCommand};
use crate::richtext::commands::names_equal;
use crate::richtext::parsing::{Forest, NodeId, NodeKind, NodeRef};
use log::{debug, trace};
use std::mem;

/// Successful layout output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolved {
    pub blocks: Vec<LayoutBlock>,
    pub warnings: Vec<LayoutWarning>,
}

/// Resolves `forest` into layout blocks.
///
/// `hook` decides the meaning of commands outside the standard vocabulary; without
/// one they are no-ops.
pub fn resolve(
    forest: &Forest,
    hook: Option<&dyn CustomCommandHook>,
    case_insensitive_commands: bool,
) -> Result<Resolved, LayoutError> {
    let mut resolver = Resolver::new(forest, hook, case_insensitive_commands);
    resolver.walk()?;
    // Anything still open at the end of the document is flushed as if a final
    // boundary had been reached.
    resolver.new_block(None);
    debug!(
        "resolved {} nodes into {} blocks ({} warnings)",
        forest.len(),
        resolver.blocks.len(),
        resolver.warnings.len()
    );
    Ok(Resolved {
        blocks: resolver.blocks,
        warnings: resolver.warnings,
    })
}

enum Visit {
    Enter(NodeId),
    Exit(NodeId, Interpretation),
}

struct Resolver<'a> {
    forest: &'a Forest,
    hook: Option<&'a dyn CustomCommandHook>,
    case_insensitive: bool,

    block: LayoutBlock,
    paragraph: LayoutParagraph,
    line: LayoutLine,
    segment: LayoutLineSegment,

    pending_segments: Vec<LayoutLineSegment>,
    pending_lines: Vec<LayoutLine>,
    pending_paragraphs: Vec<LayoutParagraph>,
    blocks: Vec<LayoutBlock>,

    block_kind_stack: Vec<BlockKind>,
    alignment_stack: Vec<Alignment>,
    warnings: Vec<LayoutWarning>,
}

impl<'a> Resolver<'a> {
    fn new(
        forest: &'a Forest,
        hook: Option<&'a dyn CustomCommandHook>,
        case_insensitive: bool,
    ) -> Self {
        Resolver {
            forest,
            hook,
            case_insensitive,
            block: LayoutBlock::new(None, BlockKind::MainContent),
            paragraph: LayoutParagraph::new(None, ParagraphKind::Implicit),
            line: LayoutLine::new(None),
            segment: LayoutLineSegment::new(None),
            pending_segments: Vec::new(),
            pending_lines: Vec::new(),
            pending_paragraphs: Vec::new(),
            blocks: Vec::new(),
            block_kind_stack: Vec::new(),
            alignment_stack: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn walk(&mut self) -> Result<(), LayoutError> {
        let forest = self.forest;
        let mut stack: Vec<Visit> = forest
            .roots()
            .iter()
            .rev()
            .map(|&id| Visit::Enter(id))
            .collect();

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id) => {
                    let node = forest.node(id);
                    if node.kind() != NodeKind::Command {
                        self.segment.content.push(id);
                        continue;
                    }
                    let interpretation = self.interpret(node)?;
                    self.on_command_start(node, interpretation)?;
                    stack.push(Visit::Exit(id, interpretation));
                    if interpretation != Interpretation::Comment {
                        let children = forest[id].children.iter().rev();
                        stack.extend(children.map(|&child| Visit::Enter(child)));
                    }
                }
                Visit::Exit(id, interpretation) => {
                    self.on_command_end(forest.node(id), interpretation)?;
                }
            }
        }
        Ok(())
    }

    fn interpret(&self, node: NodeRef<'_>) -> Result<Interpretation, LayoutError> {
        if let Some(standard) = standard_interpretation(node.text(), self.case_insensitive) {
            return Ok(standard);
        }
        let Some(hook) = self.hook else {
            return Ok(Interpretation::NoOp);
        };
        let interpretation = hook.interpret(node, self.case_insensitive);
        if !interpretation.is_allowed_for_custom() {
            return Err(self.error(
                LayoutErrorKind::InvalidCustomCommandInterpretation,
                node,
            ));
        }
        Ok(interpretation)
    }

    fn on_command_start(
        &mut self,
        node: NodeRef<'_>,
        interpretation: Interpretation,
    ) -> Result<(), LayoutError> {
        let cause = Some(node.id());
        match interpretation {
            Interpretation::Heading => self.open_block(cause, BlockKind::Heading),
            Interpretation::Footing => self.open_block(cause, BlockKind::Footing),
            Interpretation::NewBlock => self.open_block(cause, BlockKind::Custom),
            Interpretation::NewPage => {
                if node.has_ancestor_named("SamePage", self.case_insensitive) {
                    self.warn(LayoutWarningKind::NewPageInsideSamePage, node);
                }
                self.emit_marker(cause, BlockKind::PageBreak);
            }
            Interpretation::SamePage => {
                if node.has_ancestor_named("SamePage", self.case_insensitive) {
                    self.warn(LayoutWarningKind::NestedSamePage, node);
                }
                self.emit_marker(cause, BlockKind::SamePageStart);
            }
            Interpretation::NewParagraph | Interpretation::NewIsolatedParagraph => {
                let kind = if node.is_named("Paragraph", self.case_insensitive) {
                    ParagraphKind::Explicit
                } else {
                    ParagraphKind::Implicit
                };
                self.new_paragraph(cause, kind);
            }
            Interpretation::NewLine | Interpretation::NewIsolatedLine => self.new_line(cause),
            Interpretation::NewLineSegment => {
                self.new_segment(cause);
                self.open_segment_style(node)?;
            }
            Interpretation::InlineContent | Interpretation::Comment => {
                self.segment.content.push(node.id());
            }
            Interpretation::NoOp => {}
            Interpretation::Invalid => {
                return Err(self.error(LayoutErrorKind::InvalidCustomCommand, node));
            }
        }
        Ok(())
    }

    fn on_command_end(
        &mut self,
        node: NodeRef<'_>,
        interpretation: Interpretation,
    ) -> Result<(), LayoutError> {
        let cause = Some(node.id());
        match interpretation {
            Interpretation::Heading | Interpretation::Footing | Interpretation::NewBlock => {
                self.new_block(cause);
                self.block.kind = self
                    .block_kind_stack
                    .pop()
                    .ok_or_else(|| self.error(LayoutErrorKind::BlockTypeStackUnderflow, node))?;
            }
            Interpretation::SamePage => self.emit_marker(cause, BlockKind::SamePageEnd),
            Interpretation::NewIsolatedParagraph => {
                self.new_paragraph(cause, ParagraphKind::Implicit)
            }
            Interpretation::NewIsolatedLine => self.new_line(cause),
            Interpretation::NewLineSegment => {
                self.new_segment(cause);
                self.close_segment_style(node)?;
            }
            Interpretation::NewPage
            | Interpretation::NewParagraph
            | Interpretation::NewLine
            | Interpretation::InlineContent
            | Interpretation::Comment
            | Interpretation::NoOp
            | Interpretation::Invalid => {}
        }
        Ok(())
    }

    fn open_segment_style(&mut self, node: NodeRef<'_>) -> Result<(), LayoutError> {
        match StyleCommand::from_name(node.text(), self.case_insensitive) {
            Some(command) => self
                .segment
                .style
                .open(command, &mut self.alignment_stack)
                .map_err(|kind| self.error(kind, node)),
            None => {
                self.segment.open_markers.push(node.id());
                Ok(())
            }
        }
    }

    fn close_segment_style(&mut self, node: NodeRef<'_>) -> Result<(), LayoutError> {
        if let Some(command) = StyleCommand::from_name(node.text(), self.case_insensitive) {
            return self
                .segment
                .style
                .close(command, &mut self.alignment_stack)
                .map_err(|kind| self.error(kind, node));
        }
        let Some(open) = self.segment.open_markers.pop() else {
            return Err(self.error(LayoutErrorKind::OtherSegmentMarkerStackUnderflow, node));
        };
        if !names_equal(&self.forest[open].text, node.text(), false) {
            return Err(self.error(
                LayoutErrorKind::OtherSegmentMarkerStackInconsistency,
                node,
            ));
        }
        Ok(())
    }

    fn open_block(&mut self, cause: Option<NodeId>, kind: BlockKind) {
        self.block_kind_stack.push(self.block.kind);
        self.new_block(cause);
        self.block.kind = kind;
    }

    /// Emits a content-less marker block, then carries on with the enclosing kind.
    fn emit_marker(&mut self, cause: Option<NodeId>, kind: BlockKind) {
        let enclosing = self.block.kind;
        self.new_block(cause);
        self.block.kind = kind;
        self.new_block(cause);
        self.block.kind = enclosing;
    }

    fn new_segment(&mut self, cause: Option<NodeId>) {
        if self.segment.content.is_empty() {
            self.segment.causing_command = cause;
            return;
        }
        let fresh = self.segment.continuation(cause);
        self.pending_segments
            .push(mem::replace(&mut self.segment, fresh));
    }

    fn new_line(&mut self, cause: Option<NodeId>) {
        self.new_segment(cause);
        self.line.segments.append(&mut self.pending_segments);
        if self.line.segments.is_empty() {
            self.line.causing_command = cause;
            return;
        }
        let finished = mem::replace(&mut self.line, LayoutLine::new(cause));
        self.pending_lines.push(finished);
    }

    /// `kind` applies to the paragraph opened by this boundary.
    fn new_paragraph(&mut self, cause: Option<NodeId>, kind: ParagraphKind) {
        self.new_line(cause);
        self.paragraph.lines.append(&mut self.pending_lines);
        if !self.paragraph.lines.is_empty() {
            let finished = mem::replace(&mut self.paragraph, LayoutParagraph::new(cause, kind));
            self.pending_paragraphs.push(finished);
        }
        self.paragraph.causing_command = cause;
        self.paragraph.kind = kind;
    }

    fn new_block(&mut self, cause: Option<NodeId>) {
        self.new_paragraph(cause, ParagraphKind::Implicit);
        self.block.paragraphs.append(&mut self.pending_paragraphs);
        if self.block.paragraphs.is_empty() && !self.block.kind.is_marker() {
            self.block.causing_command = cause;
            return;
        }
        let fresh = LayoutBlock::new(cause, self.block.kind);
        let finished = mem::replace(&mut self.block, fresh);
        trace!(
            "block {:?} finished with {} paragraphs",
            finished.kind,
            finished.paragraphs.len()
        );
        self.blocks.push(finished);
    }

    fn warn(&mut self, kind: LayoutWarningKind, node: NodeRef<'_>) {
        let data = node.data();
        self.warnings.push(LayoutWarning {
            kind,
            node: node.id(),
            byte_offset: data.byte_offset,
            codepoint_offset: data.codepoint_offset,
        });
    }

    fn error(&self, kind: LayoutErrorKind, node: NodeRef<'_>) -> LayoutError {
        let data = node.data();
        LayoutError {
            kind,
            node: node.id(),
            byte_offset: data.byte_offset,
            codepoint_offset: data.codepoint_offset,
            warnings: self.warnings.clone(),
        }
    }
}
