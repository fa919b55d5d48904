//! The array referent of [`ScriptAny`](crate::values::any::ScriptAny).

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::values::any::ScriptAny;

/// Shared-ownership handle to a mutable [`ScriptArray`].
pub type ArrayHandle = Rc<RefCell<ScriptArray>>;

/// A growable array of dynamic values.
#[derive(Debug, Clone, Default)]
pub struct ScriptArray {
    /// The element storage.
    pub elements: Vec<ScriptAny>,
}

impl ScriptArray {
    /// Create an array from its elements.
    pub fn new(elements: Vec<ScriptAny>) -> Self {
        Self { elements }
    }

    /// Wrap an array in a shared handle.
    pub fn into_handle(self) -> ArrayHandle {
        Rc::new(RefCell::new(self))
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` for an empty array.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The length XOR'd with every element hash.
    pub fn get_hash(&self) -> u64 {
        let mut result = self.elements.len() as u64;
        for item in &self.elements {
            result ^= item.get_hash();
        }
        result
    }

    /// Element-wise lexicographic comparison; ties broken by length.
    pub fn compare(&self, other: &ScriptArray) -> Ordering {
        for (a, b) in self.elements.iter().zip(&other.elements) {
            match a.compare(b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        self.elements.len().cmp(&other.elements.len())
    }
}

impl PartialEq for ScriptArray {
    /// Element-wise loose equality.
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl fmt::Display for ScriptArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_element_wise() {
        let a = ScriptArray::new(vec![ScriptAny::from(1i64), ScriptAny::from(2i64)]);
        let b = ScriptArray::new(vec![ScriptAny::from(1i64), ScriptAny::from(2i64)]);
        let c = ScriptArray::new(vec![ScriptAny::from(1i64), ScriptAny::from(3i64)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_hash_is_length_xor_elements() {
        let empty = ScriptArray::default();
        assert_eq!(empty.get_hash(), 0);
        let a = ScriptArray::new(vec![ScriptAny::from(7i64)]);
        let b = ScriptArray::new(vec![ScriptAny::from(7i64)]);
        assert_eq!(a.get_hash(), b.get_hash());
    }

    #[test]
    fn test_compare_lexicographic() {
        let a = ScriptArray::new(vec![ScriptAny::from(1i64)]);
        let b = ScriptArray::new(vec![ScriptAny::from(1i64), ScriptAny::from(0i64)]);
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn test_display() {
        let a = ScriptArray::new(vec![ScriptAny::from(1i64), ScriptAny::from(true)]);
        assert_eq!(a.to_string(), "[1, true]");
    }
}
