//! Segment style state
//!
//!     Each styling command applies its effect when it opens and reverses it when it
//!     closes. The counters are range-checked on every step; running past either end
//!     is an error rather than a wraparound.

use super::error::LayoutErrorKind;
use crate::richtext::commands::CommandTable;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Alignment {
    #[default]
    Default,
    JustifyLeft,
    JustifyRight,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SegmentStyle {
    pub alignment: Alignment,
    pub left_indent: i16,
    pub right_indent: i16,
    pub font_size_change: i16,
    pub bold_level: u16,
    pub italic_level: u16,
    pub underline_level: u16,
    pub fixed_level: u16,
}

/// Standard commands that start a new segment with a different style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCommand {
    FlushLeft,
    FlushRight,
    Center,
    Indent,
    Outdent,
    IndentRight,
    OutdentRight,
    Bigger,
    Smaller,
    Bold,
    Italic,
    Underline,
    Fixed,
}

static STYLE_COMMANDS: Lazy<CommandTable<StyleCommand>> = Lazy::new(|| {
    CommandTable::new(&[
        ("FlushLeft", StyleCommand::FlushLeft),
        ("FlushRight", StyleCommand::FlushRight),
        ("Center", StyleCommand::Center),
        ("Indent", StyleCommand::Indent),
        ("Outdent", StyleCommand::Outdent),
        ("IndentRight", StyleCommand::IndentRight),
        ("OutdentRight", StyleCommand::OutdentRight),
        ("Bigger", StyleCommand::Bigger),
        ("Smaller", StyleCommand::Smaller),
        ("Bold", StyleCommand::Bold),
        ("Italic", StyleCommand::Italic),
        ("Underline", StyleCommand::Underline),
        ("Fixed", StyleCommand::Fixed),
    ])
});

impl StyleCommand {
    pub fn from_name(name: &[u8], case_insensitive: bool) -> Option<StyleCommand> {
        STYLE_COMMANDS.lookup(name, case_insensitive)
    }
}

impl SegmentStyle {
    /// Applies the effect of `command` opening.
    pub fn open(
        &mut self,
        command: StyleCommand,
        alignment_stack: &mut Vec<Alignment>,
    ) -> Result<(), LayoutErrorKind> {
        let alignment = match command {
            StyleCommand::FlushLeft => Alignment::JustifyLeft,
            StyleCommand::FlushRight => Alignment::JustifyRight,
            StyleCommand::Center => Alignment::Center,
            _ => return self.step(command, true),
        };
        alignment_stack.push(self.alignment);
        self.alignment = alignment;
        Ok(())
    }

    /// Reverses the effect of `command` as it closes.
    pub fn close(
        &mut self,
        command: StyleCommand,
        alignment_stack: &mut Vec<Alignment>,
    ) -> Result<(), LayoutErrorKind> {
        match command {
            StyleCommand::FlushLeft | StyleCommand::FlushRight | StyleCommand::Center => {
                self.alignment = alignment_stack
                    .pop()
                    .ok_or(LayoutErrorKind::ContentAlignmentStackUnderflow)?;
                Ok(())
            }
            _ => self.step(command, false),
        }
    }

    fn step(&mut self, command: StyleCommand, opening: bool) -> Result<(), LayoutErrorKind> {
        use LayoutErrorKind::*;
        match command {
            StyleCommand::Indent => shift_signed(
                &mut self.left_indent,
                opening,
                LeftIndentationLevelOverflow,
                LeftIndentationLevelUnderflow,
            ),
            StyleCommand::Outdent => shift_signed(
                &mut self.left_indent,
                !opening,
                LeftIndentationLevelOverflow,
                LeftIndentationLevelUnderflow,
            ),
            StyleCommand::IndentRight => shift_signed(
                &mut self.right_indent,
                opening,
                RightIndentationLevelOverflow,
                RightIndentationLevelUnderflow,
            ),
            StyleCommand::OutdentRight => shift_signed(
                &mut self.right_indent,
                !opening,
                RightIndentationLevelOverflow,
                RightIndentationLevelUnderflow,
            ),
            StyleCommand::Bigger => shift_signed(
                &mut self.font_size_change,
                opening,
                FontSizeChangeOverflow,
                FontSizeChangeUnderflow,
            ),
            StyleCommand::Smaller => shift_signed(
                &mut self.font_size_change,
                !opening,
                FontSizeChangeOverflow,
                FontSizeChangeUnderflow,
            ),
            StyleCommand::Bold => shift_level(
                &mut self.bold_level,
                opening,
                FontBoldLevelOverflow,
                FontBoldLevelUnderflow,
            ),
            StyleCommand::Italic => shift_level(
                &mut self.italic_level,
                opening,
                FontItalicLevelOverflow,
                FontItalicLevelUnderflow,
            ),
            StyleCommand::Underline => shift_level(
                &mut self.underline_level,
                opening,
                FontUnderlineLevelOverflow,
                FontUnderlineLevelUnderflow,
            ),
            StyleCommand::Fixed => shift_level(
                &mut self.fixed_level,
                opening,
                FontFixedLevelOverflow,
                FontFixedLevelUnderflow,
            ),
            StyleCommand::FlushLeft | StyleCommand::FlushRight | StyleCommand::Center => Ok(()),
        }
    }
}

/// Moves `value` one step up or down.
fn shift_signed(
    value: &mut i16,
    up: bool,
    overflow: LayoutErrorKind,
    underflow: LayoutErrorKind,
) -> Result<(), LayoutErrorKind> {
    *value = if up {
        value.checked_add(1).ok_or(overflow)?
    } else {
        value.checked_sub(1).ok_or(underflow)?
    };
    Ok(())
}

fn shift_level(
    value: &mut u16,
    up: bool,
    overflow: LayoutErrorKind,
    underflow: LayoutErrorKind,
) -> Result<(), LayoutErrorKind> {
    *value = if up {
        value.checked_add(1).ok_or(overflow)?
    } else {
        value.checked_sub(1).ok_or(underflow)?
    };
    Ok(())
}
