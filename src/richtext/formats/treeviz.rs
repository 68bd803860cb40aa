//! Treeviz renderers
//!
//! Treeviz shows a tree one element per line, nesting drawn with box connectors:
//!
//!     <prefix><connector> <icon> <label>
//!
//! Text labels are truncated to 30 characters, with line breaks and tabs escaped so
//! every element stays on one line.
//!
//! Icons
//!     Layout:
//!         MainContent: ⧉
//!         Heading: ⊤
//!         Footing: ⊥
//!         PageBreak: ⤓
//!         SamePageStart: ⟦
//!         SamePageEnd: ⟧
//!         Custom: ▣
//!         Paragraph: ¶
//!         Line: ↵
//!         Segment: ◦
//!     Commands:
//!         Command: ⌘
//!         Text: ◦
//!         Whitespace: ␣

use super::{FormatError, Renderer};
use crate::richtext::layout::{
    Alignment, BlockKind, LayoutLine, LayoutLineSegment, LayoutParagraph, SegmentStyle,
};
use crate::richtext::parsing::{Forest, NodeId, NodeKind};
use crate::richtext::pipeline::Document;
use bstr::ByteSlice;

const MAX_LABEL_CHARS: usize = 30;

/// Layout tree: blocks, paragraphs, lines and segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreevizRenderer {
    show_offsets: bool,
}

impl TreevizRenderer {
    pub fn new(show_offsets: bool) -> Self {
        TreevizRenderer { show_offsets }
    }

    /// Appends `@<byte offset>` of the causing command to every element.
    pub fn with_offsets() -> Self {
        Self::new(true)
    }
}

impl Renderer for TreevizRenderer {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Layout tree, one line per block, paragraph, line and segment"
    }

    fn render(&self, document: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(document, self.show_offsets))
    }
}

/// Command tree: every node of the forest.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstTreevizRenderer {
    show_offsets: bool,
}

impl AstTreevizRenderer {
    pub fn new(show_offsets: bool) -> Self {
        AstTreevizRenderer { show_offsets }
    }
}

impl Renderer for AstTreevizRenderer {
    fn name(&self) -> &str {
        "ast"
    }

    fn description(&self) -> &str {
        "Command tree, one line per node"
    }

    fn render(&self, document: &Document) -> Result<String, FormatError> {
        Ok(ast_to_treeviz_str(&document.forest, self.show_offsets))
    }
}

pub fn to_treeviz_str(document: &Document, show_offsets: bool) -> String {
    let mut tree = Tree::new(&document.forest, show_offsets);
    let count = document.blocks.len();
    for (i, block) in document.blocks.iter().enumerate() {
        let label = format!("{:?}", block.kind);
        let prefix = tree.item(
            "",
            i + 1 == count,
            block_icon(block.kind),
            &label,
            block.causing_command,
        );
        tree.paragraphs(&prefix, &block.paragraphs);
    }
    tree.out
}

pub fn ast_to_treeviz_str(forest: &Forest, show_offsets: bool) -> String {
    let mut tree = Tree::new(forest, show_offsets);
    let roots = forest.roots();
    let mut stack: Vec<(NodeId, String, bool)> = roots
        .iter()
        .enumerate()
        .rev()
        .map(|(i, &id)| (id, String::new(), i + 1 == roots.len()))
        .collect();

    while let Some((id, prefix, is_last)) = stack.pop() {
        let node = &forest[id];
        let (icon, label) = match node.kind {
            NodeKind::Command => ("⌘", format!("<{}>", node.text)),
            NodeKind::Text => ("◦", quoted(&node.text.to_str_lossy())),
            NodeKind::Whitespace => ("␣", quoted(&node.text.to_str_lossy())),
        };
        let child_prefix = tree.item(&prefix, is_last, icon, &label, Some(id));
        let count = node.children.len();
        stack.extend(
            node.children
                .iter()
                .enumerate()
                .rev()
                .map(|(i, &child)| (child, child_prefix.clone(), i + 1 == count)),
        );
    }
    tree.out
}

struct Tree<'a> {
    forest: &'a Forest,
    show_offsets: bool,
    out: String,
}

impl<'a> Tree<'a> {
    fn new(forest: &'a Forest, show_offsets: bool) -> Self {
        Tree {
            forest,
            show_offsets,
            out: String::new(),
        }
    }

    /// Writes one element and returns the prefix for its children.
    fn item(
        &mut self,
        prefix: &str,
        is_last: bool,
        icon: &str,
        label: &str,
        cause: Option<NodeId>,
    ) -> String {
        let connector = if is_last { "└─" } else { "├─" };
        self.out
            .push_str(&format!("{prefix}{connector} {icon} {label}"));
        if self.show_offsets {
            if let Some(node) = cause.and_then(|id| self.forest.get(id)) {
                self.out.push_str(&format!(" @{}", node.byte_offset));
            }
        }
        self.out.push('\n');
        format!("{}{}", prefix, if is_last { "  " } else { "│ " })
    }

    fn paragraphs(&mut self, prefix: &str, paragraphs: &[LayoutParagraph]) {
        for (i, paragraph) in paragraphs.iter().enumerate() {
            let label = format!("{:?}", paragraph.kind);
            let is_last = i + 1 == paragraphs.len();
            let child_prefix =
                self.item(prefix, is_last, "¶", &label, paragraph.causing_command);
            self.lines(&child_prefix, &paragraph.lines);
        }
    }

    fn lines(&mut self, prefix: &str, lines: &[LayoutLine]) {
        for (i, line) in lines.iter().enumerate() {
            let label = truncate(&escape(&line.text(self.forest)), MAX_LABEL_CHARS);
            let is_last = i + 1 == lines.len();
            let child_prefix = self.item(prefix, is_last, "↵", &label, line.causing_command);
            self.segments(&child_prefix, &line.segments);
        }
    }

    fn segments(&mut self, prefix: &str, segments: &[LayoutLineSegment]) {
        for (i, segment) in segments.iter().enumerate() {
            let mut label = quoted(&segment.text(self.forest));
            let style = style_summary(&segment.style);
            if !style.is_empty() {
                label.push(' ');
                label.push_str(&style);
            }
            if !segment.open_markers.is_empty() {
                let names: Vec<String> = segment
                    .open_markers
                    .iter()
                    .map(|&id| self.forest[id].text.to_string())
                    .collect();
                label.push_str(&format!(" markers=[{}]", names.join(",")));
            }
            let is_last = i + 1 == segments.len();
            self.item(prefix, is_last, "◦", &label, segment.causing_command);
        }
    }
}

fn block_icon(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::MainContent => "⧉",
        BlockKind::Heading => "⊤",
        BlockKind::Footing => "⊥",
        BlockKind::PageBreak => "⤓",
        BlockKind::SamePageStart => "⟦",
        BlockKind::SamePageEnd => "⟧",
        BlockKind::Custom => "▣",
    }
}

/// Non-default style fields, e.g. `align=Center bold=1 size=-2`.
fn style_summary(style: &SegmentStyle) -> String {
    let mut parts = Vec::new();
    if style.alignment != Alignment::Default {
        parts.push(format!("align={:?}", style.alignment));
    }
    for (name, value) in [
        ("indent", style.left_indent),
        ("indent_right", style.right_indent),
        ("size", style.font_size_change),
    ] {
        if value != 0 {
            parts.push(format!("{name}={value:+}"));
        }
    }
    for (name, value) in [
        ("bold", style.bold_level),
        ("italic", style.italic_level),
        ("underline", style.underline_level),
        ("fixed", style.fixed_level),
    ] {
        if value != 0 {
            parts.push(format!("{name}={value}"));
        }
    }
    parts.join(" ")
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", truncate(&escape(text), MAX_LABEL_CHARS))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::pipeline::{process, ProcessOptions};

    fn document(input: &str) -> Document {
        process(input.as_bytes(), &ProcessOptions::default(), None).unwrap()
    }

    #[test]
    fn test_blocks_and_styles() {
        let doc = document("<Heading>Title</Heading>Hello <Bold>world</Bold><np>Bye");
        insta::assert_snapshot!(to_treeviz_str(&doc, false), @r#"
        ├─ ⊤ Heading
        │ └─ ¶ Implicit
        │   └─ ↵ Title
        │     └─ ◦ "Title"
        ├─ ⧉ MainContent
        │ └─ ¶ Implicit
        │   └─ ↵ Hello world
        │     ├─ ◦ "Hello "
        │     └─ ◦ "world" bold=1
        ├─ ⤓ PageBreak
        └─ ⧉ MainContent
          └─ ¶ Implicit
            └─ ↵ Bye
              └─ ◦ "Bye"
        "#);
    }

    #[test]
    fn test_offsets() {
        let doc = document("a<nl>b");
        assert_eq!(
            to_treeviz_str(&doc, true),
            "└─ ⧉ MainContent\n  └─ ¶ Implicit\n    ├─ ↵ a\n    │ └─ ◦ \"a\"\n    └─ ↵ b @1\n      └─ ◦ \"b\" @1\n"
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(to_treeviz_str(&document(""), false), "");
    }

    #[test]
    fn test_ast_tree() {
        let doc = document("<Center>x\n<lt></Center>");
        insta::assert_snapshot!(ast_to_treeviz_str(&doc.forest, true), @r#"
        └─ ⌘ <Center> @0
          ├─ ◦ "x" @8
          ├─ ␣ "\n" @9
          └─ ⌘ <lt> @10
        "#);
    }

    #[test]
    fn test_labels() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(escape("a\tb\r\n"), "a\\tb\\r\\n");
        let style = SegmentStyle {
            alignment: Alignment::Center,
            font_size_change: -2,
            italic_level: 1,
            ..SegmentStyle::default()
        };
        assert_eq!(style_summary(&style), "align=Center size=-2 italic=1");
    }
}
