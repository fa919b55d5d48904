//! The string referent of [`ScriptAny`](crate::values::any::ScriptAny).

use std::cmp::Ordering;
use std::fmt;

/// Shared-ownership handle to a [`ScriptString`].
pub type StringHandle = std::rc::Rc<ScriptString>;

/// An immutable script string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptString {
    text: String,
}

impl ScriptString {
    /// Create a new script string.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The UTF-8 contents.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes (code units).
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` for the empty string.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// XOR of code units, each shifted left by its index modulo the word
    /// width, seeded with the length.
    pub fn get_hash(&self) -> u64 {
        let mut result = self.text.len() as u64;
        for (i, b) in self.text.bytes().enumerate() {
            result ^= (b as u64) << (i % 64);
        }
        result
    }

    /// Lexicographic byte-wise comparison.
    pub fn compare(&self, other: &ScriptString) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl fmt::Display for ScriptString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
