//! The plain-object referent of [`ScriptAny`](crate::values::any::ScriptAny).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::values::any::ScriptAny;

/// Shared-ownership handle to a mutable [`ScriptObject`].
pub type ObjectHandle = Rc<RefCell<ScriptObject>>;

/// A dictionary object with an optional prototype chain.
///
/// The front-end treats objects as opaque referents; only the dictionary
/// shape, prototype walk, and equality/hash rules are relied upon.
#[derive(Debug, Clone)]
pub struct ScriptObject {
    name: String,
    prototype: Option<ObjectHandle>,
    dictionary: FxHashMap<String, ScriptAny>,
}

impl ScriptObject {
    /// Create an object with the given type name and optional prototype.
    pub fn new(name: impl Into<String>, prototype: Option<ObjectHandle>) -> Self {
        Self {
            name: name.into(),
            prototype,
            dictionary: FxHashMap::default(),
        }
    }

    /// Wrap an object in a shared handle.
    pub fn into_handle(self) -> ObjectHandle {
        Rc::new(RefCell::new(self))
    }

    /// The object's type name (e.g. `"Object"`, `"Array"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The prototype object, when set.
    pub fn prototype(&self) -> Option<ObjectHandle> {
        self.prototype.clone()
    }

    /// Replace the prototype object.
    pub fn set_prototype(&mut self, prototype: Option<ObjectHandle>) {
        self.prototype = prototype;
    }

    /// The own-field dictionary.
    pub fn dictionary(&self) -> &FxHashMap<String, ScriptAny> {
        &self.dictionary
    }

    /// Set an own field, overwriting any previous value.
    pub fn assign_field(&mut self, name: impl Into<String>, value: ScriptAny) {
        self.dictionary.insert(name.into(), value);
    }

    /// Look up a field on this object, then along the prototype chain.
    /// Returns `Undefined` when the name is found nowhere.
    pub fn lookup_field(&self, name: &str) -> ScriptAny {
        if let Some(value) = self.dictionary.get(name) {
            return value.clone();
        }
        match &self.prototype {
            Some(proto) => proto.borrow().lookup_field(name),
            None => ScriptAny::Undefined,
        }
    }

    /// A structure-dependent stable hash: the own-field count.
    pub fn get_hash(&self) -> u64 {
        self.dictionary.len() as u64
    }
}

impl PartialEq for ScriptObject {
    /// Structural equality: identical own-field maps plus an identical
    /// prototype referent.
    fn eq(&self, other: &Self) -> bool {
        let protos_match = match (&self.prototype, &other.prototype) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        protos_match && self.dictionary == other.dictionary
    }
}

impl fmt::Display for ScriptObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.dictionary.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{key}\": {value}")?;
        }
        write!(f, "}}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_lookup() {
        let mut obj = ScriptObject::new("Object", None);
        obj.assign_field("x", ScriptAny::from(42i64));
        assert_eq!(obj.lookup_field("x"), ScriptAny::from(42i64));
        assert_eq!(obj.lookup_field("missing"), ScriptAny::Undefined);
    }

    #[test]
    fn test_lookup_walks_prototype_chain() {
        let mut proto = ScriptObject::new("Object", None);
        proto.assign_field("inherited", ScriptAny::from(true));
        let child = ScriptObject::new("Object", Some(proto.into_handle()));
        assert_eq!(child.lookup_field("inherited"), ScriptAny::from(true));
    }

    #[test]
    fn test_equality_requires_same_prototype_referent() {
        let proto_a = ScriptObject::new("Object", None).into_handle();
        let proto_b = ScriptObject::new("Object", None).into_handle();
        let a = ScriptObject::new("Object", Some(proto_a.clone()));
        let b = ScriptObject::new("Object", Some(proto_a));
        let c = ScriptObject::new("Object", Some(proto_b));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_assign_overwrites() {
        let mut obj = ScriptObject::new("Object", None);
        obj.assign_field("x", ScriptAny::from(1i64));
        obj.assign_field("x", ScriptAny::from(2i64));
        assert_eq!(obj.lookup_field("x"), ScriptAny::from(2i64));
        assert_eq!(obj.get_hash(), 1);
    }
}
