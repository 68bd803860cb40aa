//! Testing utilities
//!
//!     Factories for processed documents and fluent assertions over their layout. The
//!     assertions panic with the path of the failing element (`blocks[1].paragraphs[0]`)
//!     so a failure names the element without dumping the whole tree.
//!
//!     ```rust,ignore
//!     use richtext::richtext::testing::{assert_layout, process_str};
//!     use richtext::richtext::layout::BlockKind;
//!
//!     let doc = process_str("<Heading>Title</Heading>Body");
//!     assert_layout(&doc)
//!         .block_count(2)
//!         .block(0, |b| {
//!             b.kind(BlockKind::Heading).caused_by("Heading").paragraph(0, |p| {
//!                 p.text("Title");
//!             });
//!         });
//!     ```

use crate::richtext::layout::{
    Alignment, BlockKind, CustomCommandHook, LayoutBlock, LayoutLine, LayoutLineSegment,
    LayoutParagraph, ParagraphKind, SegmentStyle,
};
use crate::richtext::parsing::{Forest, NodeId};
use crate::richtext::pipeline::{process, Document, PipelineError, ProcessOptions};

/// Processes `source` with default options, panicking on failure.
pub fn process_str(source: &str) -> Document {
    try_process_str(source)
        .unwrap_or_else(|error| panic!("processing {source:?} failed: {error}"))
}

pub fn try_process_str(source: &str) -> Result<Document, PipelineError> {
    process(source.as_bytes(), &ProcessOptions::default(), None)
}

pub fn process_with_hook(
    source: &str,
    hook: &dyn CustomCommandHook,
) -> Result<Document, PipelineError> {
    process(source.as_bytes(), &ProcessOptions::default(), Some(hook))
}

/// `count` nested `<name>` commands around `inner`.
pub fn nested(name: &str, count: usize, inner: &str) -> String {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let mut out = String::with_capacity(count * (open.len() + close.len()) + inner.len());
    for _ in 0..count {
        out.push_str(&open);
    }
    out.push_str(inner);
    for _ in 0..count {
        out.push_str(&close);
    }
    out
}

pub fn assert_layout(document: &Document) -> DocumentAssertion<'_> {
    DocumentAssertion { document }
}

fn cause_name(forest: &Forest, cause: Option<NodeId>) -> Option<String> {
    cause.map(|id| forest[id].text.to_string())
}

pub struct DocumentAssertion<'a> {
    document: &'a Document,
}

impl<'a> DocumentAssertion<'a> {
    pub fn block_count(self, expected: usize) -> Self {
        let kinds: Vec<BlockKind> = self.document.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds.len(),
            expected,
            "Expected {expected} blocks, found {kinds:?}"
        );
        self
    }

    pub fn block_kinds(self, expected: &[BlockKind]) -> Self {
        let kinds: Vec<BlockKind> = self.document.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(kinds, expected, "Block kinds differ");
        self
    }

    pub fn warning_count(self, expected: usize) -> Self {
        assert_eq!(
            self.document.warnings.len(),
            expected,
            "Expected {expected} warnings, found {:?}",
            self.document.warnings
        );
        self
    }

    pub fn block<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>),
    {
        let blocks = &self.document.blocks;
        assert!(
            index < blocks.len(),
            "Block index {index} out of bounds (document has {} blocks)",
            blocks.len()
        );
        assertion(BlockAssertion {
            forest: &self.document.forest,
            block: &blocks[index],
            context: format!("blocks[{index}]"),
        });
        self
    }
}

pub struct BlockAssertion<'a> {
    forest: &'a Forest,
    block: &'a LayoutBlock,
    context: String,
}

impl<'a> BlockAssertion<'a> {
    pub fn kind(self, expected: BlockKind) -> Self {
        assert_eq!(self.block.kind, expected, "{}: kind", self.context);
        self
    }

    /// Asserts the name of the causing command.
    pub fn caused_by(self, expected: &str) -> Self {
        assert_eq!(
            cause_name(self.forest, self.block.causing_command).as_deref(),
            Some(expected),
            "{}: causing command",
            self.context
        );
        self
    }

    pub fn uncaused(self) -> Self {
        assert_eq!(
            self.block.causing_command, None,
            "{}: expected no causing command",
            self.context
        );
        self
    }

    pub fn paragraph_count(self, expected: usize) -> Self {
        assert_eq!(
            self.block.paragraphs.len(),
            expected,
            "{}: paragraph count",
            self.context
        );
        self
    }

    pub fn paragraph<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ParagraphAssertion<'a>),
    {
        let paragraphs = &self.block.paragraphs;
        assert!(
            index < paragraphs.len(),
            "{}: paragraph index {index} out of bounds ({} paragraphs)",
            self.context,
            paragraphs.len()
        );
        assertion(ParagraphAssertion {
            forest: self.forest,
            paragraph: &paragraphs[index],
            context: format!("{}.paragraphs[{index}]", self.context),
        });
        self
    }
}

pub struct ParagraphAssertion<'a> {
    forest: &'a Forest,
    paragraph: &'a LayoutParagraph,
    context: String,
}

impl<'a> ParagraphAssertion<'a> {
    pub fn kind(self, expected: ParagraphKind) -> Self {
        assert_eq!(self.paragraph.kind, expected, "{}: kind", self.context);
        self
    }

    pub fn caused_by(self, expected: &str) -> Self {
        assert_eq!(
            cause_name(self.forest, self.paragraph.causing_command).as_deref(),
            Some(expected),
            "{}: causing command",
            self.context
        );
        self
    }

    /// Lines joined with `\n`.
    pub fn text(self, expected: &str) -> Self {
        assert_eq!(
            self.paragraph.text(self.forest),
            expected,
            "{}: text",
            self.context
        );
        self
    }

    pub fn line_count(self, expected: usize) -> Self {
        assert_eq!(
            self.paragraph.lines.len(),
            expected,
            "{}: line count",
            self.context
        );
        self
    }

    pub fn line<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(LineAssertion<'a>),
    {
        let lines = &self.paragraph.lines;
        assert!(
            index < lines.len(),
            "{}: line index {index} out of bounds ({} lines)",
            self.context,
            lines.len()
        );
        assertion(LineAssertion {
            forest: self.forest,
            line: &lines[index],
            context: format!("{}.lines[{index}]", self.context),
        });
        self
    }
}

pub struct LineAssertion<'a> {
    forest: &'a Forest,
    line: &'a LayoutLine,
    context: String,
}

impl<'a> LineAssertion<'a> {
    pub fn text(self, expected: &str) -> Self {
        assert_eq!(self.line.text(self.forest), expected, "{}: text", self.context);
        self
    }

    pub fn caused_by(self, expected: &str) -> Self {
        assert_eq!(
            cause_name(self.forest, self.line.causing_command).as_deref(),
            Some(expected),
            "{}: causing command",
            self.context
        );
        self
    }

    pub fn segment_count(self, expected: usize) -> Self {
        let texts: Vec<String> = self
            .line
            .segments
            .iter()
            .map(|segment| segment.text(self.forest))
            .collect();
        assert_eq!(
            texts.len(),
            expected,
            "{}: expected {expected} segments, found {texts:?}",
            self.context
        );
        self
    }

    pub fn segment<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(SegmentAssertion<'a>),
    {
        let segments = &self.line.segments;
        assert!(
            index < segments.len(),
            "{}: segment index {index} out of bounds ({} segments)",
            self.context,
            segments.len()
        );
        assertion(SegmentAssertion {
            forest: self.forest,
            segment: &segments[index],
            context: format!("{}.segments[{index}]", self.context),
        });
        self
    }
}

pub struct SegmentAssertion<'a> {
    forest: &'a Forest,
    segment: &'a LayoutLineSegment,
    context: String,
}

impl SegmentAssertion<'_> {
    pub fn text(self, expected: &str) -> Self {
        assert_eq!(
            self.segment.text(self.forest),
            expected,
            "{}: text",
            self.context
        );
        self
    }

    pub fn caused_by(self, expected: &str) -> Self {
        assert_eq!(
            cause_name(self.forest, self.segment.causing_command).as_deref(),
            Some(expected),
            "{}: causing command",
            self.context
        );
        self
    }

    pub fn alignment(self, expected: Alignment) -> Self {
        assert_eq!(
            self.segment.style.alignment, expected,
            "{}: alignment",
            self.context
        );
        self
    }

    pub fn bold(self, expected: u16) -> Self {
        assert_eq!(self.segment.style.bold_level, expected, "{}: bold", self.context);
        self
    }

    pub fn italic(self, expected: u16) -> Self {
        assert_eq!(
            self.segment.style.italic_level, expected,
            "{}: italic",
            self.context
        );
        self
    }

    pub fn left_indent(self, expected: i16) -> Self {
        assert_eq!(
            self.segment.style.left_indent, expected,
            "{}: left indent",
            self.context
        );
        self
    }

    pub fn font_size_change(self, expected: i16) -> Self {
        assert_eq!(
            self.segment.style.font_size_change, expected,
            "{}: font size change",
            self.context
        );
        self
    }

    pub fn default_style(self) -> Self {
        assert_eq!(
            self.segment.style,
            SegmentStyle::default(),
            "{}: expected default style",
            self.context
        );
        self
    }

    /// Names of the open custom segment markers, outermost first.
    pub fn open_markers(self, expected: &[&str]) -> Self {
        let names: Vec<String> = self
            .segment
            .open_markers
            .iter()
            .map(|&id| self.forest[id].text.to_string())
            .collect();
        assert_eq!(names, expected, "{}: open markers", self.context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested() {
        assert_eq!(nested("Bold", 2, "x"), "<Bold><Bold>x</Bold></Bold>");
        assert_eq!(nested("Bold", 0, "x"), "x");
    }

    #[test]
    fn test_fluent_assertions() {
        let doc = process_str("<Heading>Title</Heading><Center>mid</Center>");
        assert_layout(&doc)
            .block_kinds(&[BlockKind::Heading, BlockKind::MainContent])
            .warning_count(0)
            .block(0, |b| {
                b.caused_by("Heading").paragraph_count(1).paragraph(0, |p| {
                    p.text("Title").kind(ParagraphKind::Implicit);
                });
            })
            .block(1, |b| {
                b.paragraph(0, |p| {
                    p.line(0, |l| {
                        l.segment_count(1).segment(0, |s| {
                            s.text("mid").alignment(Alignment::Center).caused_by("Center");
                        });
                    });
                });
            });
    }

    #[test]
    #[should_panic(expected = "blocks[0]: kind")]
    fn test_failure_names_the_element() {
        let doc = process_str("x");
        assert_layout(&doc).block(0, |b| {
            b.kind(BlockKind::Heading);
        });
    }
}
