//! JSON renderers
//!
//! `json` renders the resolved layout. Node ids mean nothing outside the forest, so
//! causing commands are written as their name and byte offset, and segment content is
//! written as plain text.
//!
//! `tokens` dumps the token stream as produced by the tokenizer.

use super::{FormatError, Renderer};
use crate::richtext::layout::{
    BlockKind, LayoutBlock, LayoutLine, LayoutLineSegment, LayoutParagraph, ParagraphKind,
    SegmentStyle,
};
use crate::richtext::parsing::{Forest, NodeId};
use crate::richtext::pipeline::{Document, Warning};
use bstr::ByteSlice;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Resolved layout as JSON"
    }

    fn render(&self, document: &Document) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(&DocumentView::new(document))?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokensRenderer;

impl Renderer for TokensRenderer {
    fn name(&self) -> &str {
        "tokens"
    }

    fn description(&self) -> &str {
        "Token stream as JSON"
    }

    fn render(&self, document: &Document) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(&document.tokens)?)
    }
}

#[derive(Debug, Serialize)]
struct DocumentView<'a> {
    blocks: Vec<BlockView>,
    warnings: &'a [Warning],
}

#[derive(Debug, Serialize)]
struct CommandView {
    name: String,
    byte_offset: usize,
}

#[derive(Debug, Serialize)]
struct BlockView {
    kind: BlockKind,
    cause: Option<CommandView>,
    paragraphs: Vec<ParagraphView>,
}

#[derive(Debug, Serialize)]
struct ParagraphView {
    kind: ParagraphKind,
    cause: Option<CommandView>,
    lines: Vec<LineView>,
}

#[derive(Debug, Serialize)]
struct LineView {
    cause: Option<CommandView>,
    segments: Vec<SegmentView>,
}

#[derive(Debug, Serialize)]
struct SegmentView {
    cause: Option<CommandView>,
    style: SegmentStyle,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    open_markers: Vec<String>,
    text: String,
}

impl<'a> DocumentView<'a> {
    fn new(document: &'a Document) -> Self {
        let forest = &document.forest;
        DocumentView {
            blocks: document
                .blocks
                .iter()
                .map(|block| BlockView::new(forest, block))
                .collect(),
            warnings: &document.warnings,
        }
    }
}

fn command(forest: &Forest, id: Option<NodeId>) -> Option<CommandView> {
    let node = forest.get(id?)?;
    Some(CommandView {
        name: node.text.to_str_lossy().into_owned(),
        byte_offset: node.byte_offset,
    })
}

impl BlockView {
    fn new(forest: &Forest, block: &LayoutBlock) -> Self {
        BlockView {
            kind: block.kind,
            cause: command(forest, block.causing_command),
            paragraphs: block
                .paragraphs
                .iter()
                .map(|paragraph| ParagraphView::new(forest, paragraph))
                .collect(),
        }
    }
}

impl ParagraphView {
    fn new(forest: &Forest, paragraph: &LayoutParagraph) -> Self {
        ParagraphView {
            kind: paragraph.kind,
            cause: command(forest, paragraph.causing_command),
            lines: paragraph
                .lines
                .iter()
                .map(|line| LineView::new(forest, line))
                .collect(),
        }
    }
}

impl LineView {
    fn new(forest: &Forest, line: &LayoutLine) -> Self {
        LineView {
            cause: command(forest, line.causing_command),
            segments: line
                .segments
                .iter()
                .map(|segment| SegmentView::new(forest, segment))
                .collect(),
        }
    }
}

impl SegmentView {
    fn new(forest: &Forest, segment: &LayoutLineSegment) -> Self {
        SegmentView {
            cause: command(forest, segment.causing_command),
            style: segment.style,
            open_markers: segment
                .open_markers
                .iter()
                .map(|&id| forest[id].text.to_str_lossy().into_owned())
                .collect(),
            text: segment.text(forest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::pipeline::{process, ProcessOptions};
    use serde_json::{json, Value};

    fn render(renderer: &dyn Renderer, input: &[u8]) -> Value {
        let document = process(input, &ProcessOptions::default(), None).unwrap();
        serde_json::from_str(&renderer.render(&document).unwrap()).unwrap()
    }

    #[test]
    fn test_layout_json() {
        let value = render(&JsonRenderer, b"<Paragraph>a <Italic>b</Italic></Paragraph>");
        let paragraph = &value["blocks"][0]["paragraphs"][0];
        assert_eq!(paragraph["kind"], "Explicit");
        assert_eq!(paragraph["cause"], json!({"name": "Paragraph", "byte_offset": 0}));

        let segments = paragraph["lines"][0]["segments"].as_array().unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0]["text"], "a ");
        assert_eq!(segments[1]["text"], "b");
        assert_eq!(segments[1]["style"]["italic_level"], 1);
        assert_eq!(segments[1]["style"]["alignment"], "Default");
        assert!(segments[1].get("open_markers").is_none());
        assert_eq!(value["warnings"], json!([]));
    }

    #[test]
    fn test_warnings_json() {
        let value = render(&JsonRenderer, b"<SamePage><SamePage></SamePage></SamePage>");
        assert_eq!(
            value["warnings"][0]["Layout"]["kind"],
            "NestedSamePage"
        );
        assert_eq!(value["warnings"][0]["Layout"]["byte_offset"], 10);
    }

    #[test]
    fn test_tokens_json() {
        let value = render(&TokensRenderer, b"<b>\xff</b>");
        assert_eq!(value[0]["kind"], "CommandStart");
        assert_eq!(value[0]["text"], "b");
        assert_eq!(value[0]["byte_len"], 3);
        assert_eq!(value[1]["text"], "\u{fffd}");
        assert_eq!(value[2]["byte_offset"], 4);
    }
}
