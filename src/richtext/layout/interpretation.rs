//! What a command means for layout
//!
//!     Every command in the standard vocabulary has a fixed [`Interpretation`]. Any other
//!     command name is handed to a [`CustomCommandHook`] when one is supplied, and is a
//!     no-op otherwise.
//!
//!     The encoding commands are standard no-ops. That includes `UTF-8`, so a hook is
//!     never asked about it either.

use crate::richtext::commands::CommandTable;
use crate::richtext::parsing::NodeRef;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Interpretation {
    Heading,
    Footing,
    /// A block of kind `Custom`.
    NewBlock,
    /// Single page-break marker.
    NewPage,
    SamePage,
    /// Starts a paragraph when the command opens.
    NewParagraph,
    /// Starts a paragraph when the command opens and ends it when it closes.
    NewIsolatedParagraph,
    NewLine,
    NewIsolatedLine,
    NewLineSegment,
    InlineContent,
    NoOp,
    /// Inline, but the enclosed content is left out of the layout.
    Comment,
    /// Only returned by hooks, to reject a command.
    Invalid,
}

impl Interpretation {
    /// Interpretations a custom command hook may hand back.
    pub fn is_allowed_for_custom(self) -> bool {
        matches!(
            self,
            Interpretation::NewBlock
                | Interpretation::NewParagraph
                | Interpretation::NewIsolatedParagraph
                | Interpretation::NewLine
                | Interpretation::NewIsolatedLine
                | Interpretation::NewLineSegment
                | Interpretation::InlineContent
                | Interpretation::NoOp
                | Interpretation::Invalid
        )
    }
}

static STANDARD_COMMANDS: Lazy<CommandTable<Interpretation>> = Lazy::new(|| {
    use Interpretation::*;
    CommandTable::new(&[
        ("lt", InlineContent),
        ("Bold", NewLineSegment),
        ("Italic", NewLineSegment),
        ("Fixed", NewLineSegment),
        ("Smaller", NewLineSegment),
        ("Bigger", NewLineSegment),
        ("Underline", NewLineSegment),
        ("Subscript", InlineContent),
        ("Superscript", InlineContent),
        ("Center", NewLineSegment),
        ("FlushLeft", NewLineSegment),
        ("FlushRight", NewLineSegment),
        ("Indent", NewLineSegment),
        ("IndentRight", NewLineSegment),
        ("Outdent", NewLineSegment),
        ("OutdentRight", NewLineSegment),
        ("Excerpt", InlineContent),
        ("Signature", InlineContent),
        ("Paragraph", NewIsolatedParagraph),
        ("SamePage", SamePage),
        ("Heading", Heading),
        ("Footing", Footing),
        ("ISO-8859-1", NoOp),
        ("ISO-8859-2", NoOp),
        ("ISO-8859-3", NoOp),
        ("ISO-8859-4", NoOp),
        ("ISO-8859-5", NoOp),
        ("ISO-8859-6", NoOp),
        ("ISO-8859-7", NoOp),
        ("ISO-8859-8", NoOp),
        ("ISO-8859-9", NoOp),
        ("US-ASCII", NoOp),
        ("UTF-8", NoOp),
        ("No-op", NoOp),
        ("Comment", Comment),
        ("nl", NewLine),
        ("np", NewPage),
    ])
});

/// The interpretation of a standard command, `None` for custom commands.
pub fn standard_interpretation(name: &[u8], case_insensitive: bool) -> Option<Interpretation> {
    STANDARD_COMMANDS.lookup(name, case_insensitive)
}

/// Decides what a custom command means.
pub trait CustomCommandHook {
    fn interpret(&self, command: NodeRef<'_>, case_insensitive: bool) -> Interpretation;
}

impl<F> CustomCommandHook for F
where
    F: Fn(NodeRef<'_>, bool) -> Interpretation,
{
    fn interpret(&self, command: NodeRef<'_>, case_insensitive: bool) -> Interpretation {
        self(command, case_insensitive)
    }
}
