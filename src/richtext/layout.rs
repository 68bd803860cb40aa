//! Layout resolution
//!
//!     Interprets the command forest as document structure: blocks (main content,
//!     headings, footings, page and same-page markers, custom regions) made of
//!     paragraphs, made of lines, made of uniformly styled segments.
//!
//! Interpretations
//!
//!     Each command maps to one [`Interpretation`]. The standard vocabulary is fixed:
//!
//!         Heading, Footing                     block of that kind
//!         np                                   page-break marker block
//!         SamePage                             same-page start/end marker blocks
//!         Paragraph                            isolated paragraph
//!         nl                                   new line
//!         Bold Italic Underline Fixed          new segment, font level +1
//!         Bigger Smaller                       new segment, font size change +1/-1
//!         Indent Outdent                       new segment, left indent +1/-1
//!         IndentRight OutdentRight             new segment, right indent +1/-1
//!         FlushLeft FlushRight Center          new segment, alignment
//!         lt Subscript Superscript
//!         Excerpt Signature                    inline content
//!         Comment                              inline, subtree ignored
//!         No-op ISO-8859-1..9
//!         US-ASCII UTF-8                       transparent
//!
//!     Other commands are classified by an optional [`CustomCommandHook`].
//!
//! Warnings and errors
//!
//!     Page breaks and same-page regions inside a same-page region produce warnings.
//!     Style counters and the balance stacks are checked on every change; the first
//!     violation aborts resolution with a [`LayoutError`] at the offending command.

pub mod blocks;
pub mod error;
pub mod interpretation;
pub mod resolver;
pub mod style;

pub use blocks::{
    BlockKind, LayoutBlock, LayoutLine, LayoutLineSegment, LayoutParagraph, ParagraphKind,
};
pub use error::{LayoutError, LayoutErrorKind, LayoutWarning, LayoutWarningKind};
pub use interpretation::{standard_interpretation, CustomCommandHook, Interpretation};
pub use resolver::{resolve, Resolved};
pub use style::{Alignment, SegmentStyle, StyleCommand};
