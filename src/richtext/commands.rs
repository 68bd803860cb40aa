//! Command names
//!
//!     Command names are compared byte-wise. With case-insensitive commands enabled the
//!     comparison folds ASCII letters only: richtext command names are ASCII, and any
//!     other byte is compared as-is.
//!
//!     Lookup tables keyed by command name (encodings, the standard layout vocabulary)
//!     are built once as [`CommandTable`]s and never mutated afterwards.

use std::collections::HashMap;

/// Commands that never enclose content: `<lt>`, `<nl>` and `<np>`.
pub const NON_NESTING_COMMANDS: [&str; 3] = ["lt", "nl", "np"];

/// Compares two command names, folding ASCII case when `case_insensitive` is set.
pub fn names_equal(a: &[u8], b: &[u8], case_insensitive: bool) -> bool {
    if case_insensitive {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

/// True for `lt`, `nl` and `np`.
pub fn is_non_nesting(name: &[u8], case_insensitive: bool) -> bool {
    NON_NESTING_COMMANDS
        .iter()
        .any(|candidate| names_equal(name, candidate.as_bytes(), case_insensitive))
}

/// Read-only name → value map supporting both comparison modes.
#[derive(Debug)]
pub struct CommandTable<T> {
    exact: HashMap<&'static [u8], T>,
    folded: HashMap<Vec<u8>, T>,
}

impl<T: Copy> CommandTable<T> {
    pub fn new(entries: &[(&'static str, T)]) -> Self {
        let mut exact = HashMap::with_capacity(entries.len());
        let mut folded = HashMap::with_capacity(entries.len());
        for (name, value) in entries {
            exact.insert(name.as_bytes(), *value);
            folded.insert(name.as_bytes().to_ascii_lowercase(), *value);
        }
        Self { exact, folded }
    }

    pub fn lookup(&self, name: &[u8], case_insensitive: bool) -> Option<T> {
        if case_insensitive {
            self.folded.get(&name.to_ascii_lowercase()).copied()
        } else {
            self.exact.get(name).copied()
        }
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
