//! The universal dynamic value.
//!
//! [`ScriptAny`] is the tagged value used by the parser for compile-time
//! folding of switch case keys and by the downstream interpreter as its
//! run-time value.  Scalar variants carry their data inline; the four
//! reference variants hold shared-ownership handles, so a clone aliases the
//! same referent.
//!
//! Equality is the *loose* script equality (`undefined == null`,
//! `1 == true`, string coercion), ordering places `undefined` first and
//! falls back to tag order across unrelated kinds, and hashing is consistent
//! with equality within a single tag family — which is all the switch
//! jump table relies on, since case keys are grouped by their lexical token
//! type.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::values::array::{ArrayHandle, ScriptArray};
use crate::values::function::{FunctionHandle, ScriptFunction};
use crate::values::object::{ObjectHandle, ScriptObject};
use crate::values::string::{ScriptString, StringHandle};

/// Hash a value with a deterministic hasher instance.
pub(crate) fn stable_hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Any Mildew value.
#[derive(Debug, Clone, Default)]
pub enum ScriptAny {
    /// The `undefined` value; the default.
    #[default]
    Undefined,
    /// The `null` value.  Distinct from `Undefined` but loosely equal to it.
    Null,
    /// `true` / `false`.
    Boolean(bool),
    /// A 64-bit integer.
    Integer(i64),
    /// A double-precision float.
    Double(f64),
    /// A shared plain object.
    Object(ObjectHandle),
    /// A shared array.
    Array(ArrayHandle),
    /// A shared function.
    Function(FunctionHandle),
    /// A shared string.
    String(StringHandle),
}

// ─────────────────────────────────────────────────────────────────────────────
// Constructors
// ─────────────────────────────────────────────────────────────────────────────

impl From<bool> for ScriptAny {
    fn from(value: bool) -> Self {
        ScriptAny::Boolean(value)
    }
}

impl From<i32> for ScriptAny {
    fn from(value: i32) -> Self {
        ScriptAny::Integer(value as i64)
    }
}

impl From<i64> for ScriptAny {
    fn from(value: i64) -> Self {
        ScriptAny::Integer(value)
    }
}

impl From<u32> for ScriptAny {
    fn from(value: u32) -> Self {
        ScriptAny::Integer(value as i64)
    }
}

impl From<f32> for ScriptAny {
    fn from(value: f32) -> Self {
        ScriptAny::Double(value as f64)
    }
}

impl From<f64> for ScriptAny {
    fn from(value: f64) -> Self {
        ScriptAny::Double(value)
    }
}

impl From<&str> for ScriptAny {
    fn from(value: &str) -> Self {
        ScriptAny::String(Rc::new(ScriptString::new(value)))
    }
}

impl From<String> for ScriptAny {
    fn from(value: String) -> Self {
        ScriptAny::String(Rc::new(ScriptString::new(value)))
    }
}

impl From<ScriptObject> for ScriptAny {
    fn from(value: ScriptObject) -> Self {
        ScriptAny::Object(value.into_handle())
    }
}

impl From<ScriptArray> for ScriptAny {
    fn from(value: ScriptArray) -> Self {
        ScriptAny::Array(value.into_handle())
    }
}

impl From<ScriptFunction> for ScriptAny {
    fn from(value: ScriptFunction) -> Self {
        ScriptAny::Function(value.into_handle())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Predicates
// ─────────────────────────────────────────────────────────────────────────────

impl ScriptAny {
    /// Returns `true` for the `Integer` variant.
    pub fn is_integer(&self) -> bool {
        matches!(self, ScriptAny::Integer(_))
    }

    /// Returns `true` for the `Integer` and `Double` variants.
    pub fn is_number(&self) -> bool {
        matches!(self, ScriptAny::Integer(_) | ScriptAny::Double(_))
    }

    /// Returns `true` for every reference-tagged variant.
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            ScriptAny::Object(_) | ScriptAny::Array(_) | ScriptAny::Function(_) | ScriptAny::String(_)
        )
    }

    /// Returns `true` for `Undefined` and `Null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, ScriptAny::Undefined | ScriptAny::Null)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generic coercion
// ─────────────────────────────────────────────────────────────────────────────

mod private {
    /// Seals [`super::FromAny`] against downstream implementations.
    pub trait Sealed {}
}

/// Conversion target types accepted by [`ScriptAny::to_value`].
pub trait FromAny: private::Sealed + Sized {
    /// Convert by the tag-directed coercion rules.
    fn from_any(value: &ScriptAny) -> Self;
}

impl private::Sealed for bool {}

impl FromAny for bool {
    /// Truthiness: nullish is `false`, numbers compare against zero,
    /// reference values are always `true`.
    fn from_any(value: &ScriptAny) -> bool {
        match value {
            ScriptAny::Undefined | ScriptAny::Null => false,
            ScriptAny::Boolean(b) => *b,
            ScriptAny::Integer(i) => *i != 0,
            ScriptAny::Double(d) => *d != 0.0,
            ScriptAny::Object(_)
            | ScriptAny::Array(_)
            | ScriptAny::Function(_)
            | ScriptAny::String(_) => true,
        }
    }
}

macro_rules! impl_from_any_numeric {
    ($($ty:ty),*) => {
        $(
            impl private::Sealed for $ty {}

            impl FromAny for $ty {
                /// Numeric cast chain; reference values coerce to zero.
                fn from_any(value: &ScriptAny) -> $ty {
                    match value {
                        ScriptAny::Undefined | ScriptAny::Null => 0 as $ty,
                        ScriptAny::Boolean(b) => (*b as i64) as $ty,
                        ScriptAny::Integer(i) => *i as $ty,
                        ScriptAny::Double(d) => *d as $ty,
                        ScriptAny::Object(_)
                        | ScriptAny::Array(_)
                        | ScriptAny::Function(_)
                        | ScriptAny::String(_) => 0 as $ty,
                    }
                }
            }
        )*
    };
}

impl_from_any_numeric!(i32, i64, u32, f32, f64);

impl private::Sealed for Option<ObjectHandle> {}

impl FromAny for Option<ObjectHandle> {
    fn from_any(value: &ScriptAny) -> Self {
        match value {
            ScriptAny::Object(handle) => Some(handle.clone()),
            _ => None,
        }
    }
}

impl private::Sealed for Option<ArrayHandle> {}

impl FromAny for Option<ArrayHandle> {
    fn from_any(value: &ScriptAny) -> Self {
        match value {
            ScriptAny::Array(handle) => Some(handle.clone()),
            _ => None,
        }
    }
}

impl private::Sealed for Option<FunctionHandle> {}

impl FromAny for Option<FunctionHandle> {
    fn from_any(value: &ScriptAny) -> Self {
        match value {
            ScriptAny::Function(handle) => Some(handle.clone()),
            _ => None,
        }
    }
}

impl private::Sealed for Option<StringHandle> {}

impl FromAny for Option<StringHandle> {
    fn from_any(value: &ScriptAny) -> Self {
        match value {
            ScriptAny::String(handle) => Some(handle.clone()),
            _ => None,
        }
    }
}

impl ScriptAny {
    /// Coerce to `T` by the tag-directed rules: truthiness for `bool`,
    /// numeric casts for the number types (reference kinds become zero), and
    /// handle clones (or `None`) for the reference kinds.
    pub fn to_value<T: FromAny>(&self) -> T {
        T::from_any(self)
    }

    /// The canonical textual form: `undefined` / `null` / `true` / `false`
    /// verbatim, numbers through the host's default printer, strings as-is,
    /// arrays and objects through their printers.
    pub fn to_utf8_string(&self) -> String {
        self.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Equality / ordering / hashing
// ─────────────────────────────────────────────────────────────────────────────

/// Numeric view used for the loose-equality number family (bool counts as
/// 0/1).
fn as_number_family(value: &ScriptAny) -> Option<(i64, Option<f64>)> {
    match value {
        ScriptAny::Boolean(b) => Some((*b as i64, None)),
        ScriptAny::Integer(i) => Some((*i, None)),
        ScriptAny::Double(d) => Some((0, Some(*d))),
        _ => None,
    }
}

impl PartialEq for ScriptAny {
    /// Loose script equality as used for switch case-key deduplication.
    fn eq(&self, other: &Self) -> bool {
        use ScriptAny::*;
        match (self, other) {
            (Undefined | Null, Undefined | Null) => true,
            // Either side string: compare against the coerced textual form.
            (String(a), String(b)) => a.as_str() == b.as_str(),
            (String(a), b) => a.as_str() == b.to_utf8_string(),
            (a, String(b)) => a.to_utf8_string() == b.as_str(),
            (Array(a), Array(b)) => *a.borrow() == *b.borrow(),
            (Function(a), Function(b)) => *a.borrow() == *b.borrow(),
            (Object(a), Object(b)) => *a.borrow() == *b.borrow(),
            (a, b) => match (as_number_family(a), as_number_family(b)) {
                (Some((ai, af)), Some((bi, bf))) => {
                    if af.is_some() || bf.is_some() {
                        let left = af.unwrap_or(ai as f64);
                        let right = bf.unwrap_or(bi as f64);
                        left == right
                    } else {
                        ai == bi
                    }
                }
                _ => false,
            },
        }
    }
}

// Jump-table keys are literal-folded values; NaN never appears as a key.
impl Eq for ScriptAny {}

/// Tag rank used when two values have no direct ordering rule.
fn tag_order(value: &ScriptAny) -> u8 {
    match value {
        ScriptAny::Undefined => 0,
        ScriptAny::Null => 1,
        ScriptAny::Boolean(_) => 2,
        ScriptAny::Integer(_) => 3,
        ScriptAny::Double(_) => 4,
        ScriptAny::Object(_) => 5,
        ScriptAny::Array(_) => 6,
        ScriptAny::Function(_) => 7,
        ScriptAny::String(_) => 8,
    }
}

impl ScriptAny {
    /// Total ordering: `Undefined` is the least kind, `Null` second, the
    /// number family is ordered as doubles, strings lexicographically;
    /// everything else falls through to tag order.
    pub fn compare(&self, other: &Self) -> Ordering {
        use ScriptAny::*;
        match (self, other) {
            (Undefined, Undefined) => Ordering::Equal,
            (Undefined, _) => Ordering::Less,
            (_, Undefined) => Ordering::Greater,
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (String(a), String(b)) => a.compare(b),
            (Array(a), Array(b)) => a.borrow().compare(&b.borrow()),
            (a, b) => match (as_number_family(a), as_number_family(b)) {
                (Some((ai, af)), Some((bi, bf))) => {
                    let left = af.unwrap_or(ai as f64);
                    let right = bf.unwrap_or(bi as f64);
                    left.total_cmp(&right)
                }
                _ => tag_order(a).cmp(&tag_order(b)),
            },
        }
    }

    /// The per-tag hash; consistent with equality within a tag family.
    pub fn get_hash(&self) -> u64 {
        match self {
            ScriptAny::Undefined => 0,
            ScriptAny::Null => 1,
            ScriptAny::Boolean(b) => stable_hash_of(b),
            ScriptAny::Integer(i) => stable_hash_of(i),
            ScriptAny::Double(d) => stable_hash_of(&d.to_bits()),
            ScriptAny::Object(o) => o.borrow().get_hash(),
            ScriptAny::Array(a) => a.borrow().get_hash(),
            ScriptAny::Function(f) => f.borrow().get_hash(),
            ScriptAny::String(s) => s.get_hash(),
        }
    }
}

impl PartialOrd for ScriptAny {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Hash for ScriptAny {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.get_hash());
    }
}

impl fmt::Display for ScriptAny {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptAny::Undefined => write!(f, "undefined"),
            ScriptAny::Null => write!(f, "null"),
            ScriptAny::Boolean(b) => write!(f, "{b}"),
            ScriptAny::Integer(i) => write!(f, "{i}"),
            ScriptAny::Double(d) => write!(f, "{d}"),
            ScriptAny::Object(o) => write!(f, "{}", o.borrow()),
            ScriptAny::Array(a) => write!(f, "{}", a.borrow()),
            ScriptAny::Function(func) => write!(f, "{}", func.borrow()),
            ScriptAny::String(s) => write!(f, "{s}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
