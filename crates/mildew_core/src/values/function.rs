//! The function referent of [`ScriptAny`](crate::values::any::ScriptAny).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::values::any::ScriptAny;
use crate::values::environment::{Environment, EnvironmentHandle};
use crate::values::object::{ObjectHandle, ScriptObject};

/// Shared-ownership handle to a mutable [`ScriptFunction`].
pub type FunctionHandle = Rc<RefCell<ScriptFunction>>;

/// Error channel for native function calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NativeFunctionError {
    /// The call completed normally.
    #[default]
    NoError,
    /// The call received the wrong number of arguments.
    WrongNumberOfArgs,
    /// An argument had an unusable type.
    WrongTypeOfArg,
    /// The returned value is a thrown exception.
    ReturnValueIsException,
}

/// Signature of a host-implemented function: `(environment, this, args,
/// error-out) -> value`.
pub type NativeFunction = fn(
    &mut Environment,
    &mut ScriptAny,
    &[ScriptAny],
    &mut NativeFunctionError,
) -> ScriptAny;

/// Whether a function body is compiled script code or a host callback.
#[derive(Clone)]
pub enum FunctionKind {
    /// A script function holding its compiled body.
    Script {
        /// The compiled bytecode; empty until the compiler stage fills it.
        compiled: Vec<u8>,
    },
    /// A host-implemented function.
    Native(NativeFunction),
}

/// A callable script value: either compiled script code with a closure, or a
/// native host callback.
#[derive(Clone)]
pub struct ScriptFunction {
    kind: FunctionKind,
    function_name: String,
    arg_names: Vec<String>,
    bound_this: ScriptAny,
    closure: Option<EnvironmentHandle>,
    is_class: bool,
    is_generator: bool,
    prototype: ObjectHandle,
}

impl ScriptFunction {
    /// Create a script function from its compiled body.
    pub fn new_script(
        function_name: impl Into<String>,
        arg_names: Vec<String>,
        compiled: Vec<u8>,
        is_class: bool,
        is_generator: bool,
    ) -> Self {
        Self {
            kind: FunctionKind::Script { compiled },
            function_name: function_name.into(),
            arg_names,
            bound_this: ScriptAny::Undefined,
            closure: None,
            is_class,
            is_generator,
            prototype: ScriptObject::new("Object", None).into_handle(),
        }
    }

    /// Create a native function.
    pub fn new_native(
        function_name: impl Into<String>,
        native: NativeFunction,
        is_class: bool,
    ) -> Self {
        Self {
            kind: FunctionKind::Native(native),
            function_name: function_name.into(),
            arg_names: Vec::new(),
            bound_this: ScriptAny::Undefined,
            closure: None,
            is_class,
            is_generator: false,
            prototype: ScriptObject::new("Object", None).into_handle(),
        }
    }

    /// Wrap a function in a shared handle and point the prototype object's
    /// `constructor` field back at it.
    pub fn into_handle(self) -> FunctionHandle {
        let handle = Rc::new(RefCell::new(self));
        let prototype = handle.borrow().prototype.clone();
        prototype
            .borrow_mut()
            .assign_field("constructor", ScriptAny::Function(Rc::clone(&handle)));
        handle
    }

    /// The declared function name.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Parameter names in declaration order.
    pub fn arg_names(&self) -> &[String] {
        &self.arg_names
    }

    /// The compiled body for script functions; empty for natives.
    pub fn compiled(&self) -> &[u8] {
        match &self.kind {
            FunctionKind::Script { compiled } => compiled,
            FunctionKind::Native(_) => &[],
        }
    }

    /// The bound `this` value.
    pub fn bound_this(&self) -> &ScriptAny {
        &self.bound_this
    }

    /// The captured closure environment, when set.
    pub fn closure(&self) -> Option<EnvironmentHandle> {
        self.closure.clone()
    }

    /// `true` when this function is a class constructor.
    pub fn is_class(&self) -> bool {
        self.is_class
    }

    /// `true` for generator functions.
    pub fn is_generator(&self) -> bool {
        self.is_generator
    }

    /// The `prototype` property object.
    pub fn prototype(&self) -> ObjectHandle {
        self.prototype.clone()
    }

    /// Clone this function with a fresh closure environment.
    pub fn copy(&self, closure: Option<EnvironmentHandle>) -> ScriptFunction {
        let mut copied = self.clone();
        copied.closure = closure;
        copied
    }

    /// Bind `this` for subsequent calls.
    pub fn bind(&mut self, this_value: ScriptAny) {
        self.bound_this = this_value;
    }

    /// A bound copy sharing this function's closure.
    pub fn bind_copy(&self, this_value: ScriptAny) -> ScriptFunction {
        let mut copied = self.copy(self.closure.clone());
        copied.bind(this_value);
        copied
    }

    /// Hash by function name; stable across copies of the same declaration.
    pub fn get_hash(&self) -> u64 {
        crate::values::any::stable_hash_of(&self.function_name)
    }

    /// Walk `object`'s prototype chain looking for a prototype whose
    /// `constructor` field is `class_fn`.
    pub fn is_instance_of(object: Option<&ObjectHandle>, class_fn: Option<&FunctionHandle>) -> bool {
        let (Some(object), Some(class_fn)) = (object, class_fn) else {
            return false;
        };
        let mut prototype = object.borrow().prototype();
        while let Some(proto) = prototype {
            if let ScriptAny::Function(ctor) = proto.borrow().lookup_field("constructor") {
                if Rc::ptr_eq(&ctor, class_fn) {
                    return true;
                }
            }
            prototype = proto.borrow().prototype();
        }
        false
    }
}

impl PartialEq for ScriptFunction {
    /// Script functions compare by compiled body; natives by callback
    /// identity.
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (FunctionKind::Script { compiled: a }, FunctionKind::Script { compiled: b }) => a == b,
            (FunctionKind::Native(a), FunctionKind::Native(b)) => std::ptr::fn_addr_eq(*a, *b),
            _ => false,
        }
    }
}

impl fmt::Debug for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The prototype object holds a back-reference to this function;
        // printing it would recurse forever.
        f.debug_struct("ScriptFunction")
            .field("function_name", &self.function_name)
            .field("arg_names", &self.arg_names)
            .field("is_class", &self.is_class)
            .field("is_generator", &self.is_generator)
            .field(
                "kind",
                &match self.kind {
                    FunctionKind::Script { .. } => "script",
                    FunctionKind::Native(_) => "native",
                },
            )
            .finish()
    }
}

impl fmt::Display for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_class { "Class" } else { "Function" };
        write!(f, "[{} {}]", kind, self.function_name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn native_noop(
        _env: &mut Environment,
        _this: &mut ScriptAny,
        _args: &[ScriptAny],
        _err: &mut NativeFunctionError,
    ) -> ScriptAny {
        ScriptAny::Undefined
    }

    fn native_other(
        _env: &mut Environment,
        _this: &mut ScriptAny,
        _args: &[ScriptAny],
        _err: &mut NativeFunctionError,
    ) -> ScriptAny {
        ScriptAny::Null
    }

    #[test]
    fn test_script_function_equality_by_compiled_body() {
        let a = ScriptFunction::new_script("f", vec![], vec![1, 2, 3], false, false);
        let b = ScriptFunction::new_script("g", vec![], vec![1, 2, 3], false, false);
        let c = ScriptFunction::new_script("f", vec![], vec![9], false, false);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_native_function_equality_by_identity() {
        let a = ScriptFunction::new_native("n", native_noop, false);
        let b = ScriptFunction::new_native("n", native_noop, false);
        let c = ScriptFunction::new_native("n", native_other, false);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_script_never_equals_native() {
        let script = ScriptFunction::new_script("f", vec![], vec![], false, false);
        let native = ScriptFunction::new_native("f", native_noop, false);
        assert_ne!(script, native);
    }

    #[test]
    fn test_bind_copy_keeps_original_unbound() {
        let f = ScriptFunction::new_script("f", vec![], vec![], false, false);
        let bound = f.bind_copy(ScriptAny::from(42i64));
        assert_eq!(*bound.bound_this(), ScriptAny::from(42i64));
        assert_eq!(*f.bound_this(), ScriptAny::Undefined);
    }

    #[test]
    fn test_prototype_constructor_back_reference() {
        let handle = ScriptFunction::new_script("Ctor", vec![], vec![], true, false).into_handle();
        let proto = handle.borrow().prototype();
        let proto_ref = proto.borrow();
        match proto_ref.lookup_field("constructor") {
            ScriptAny::Function(ctor) => assert!(Rc::ptr_eq(&ctor, &handle)),
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_is_instance_of_walks_prototype_chain() {
        let class_fn =
            ScriptFunction::new_script("Ctor", vec![], vec![], true, false).into_handle();
        let instance =
            ScriptObject::new("Object", Some(class_fn.borrow().prototype())).into_handle();
        assert!(ScriptFunction::is_instance_of(
            Some(&instance),
            Some(&class_fn)
        ));
        let unrelated = ScriptObject::new("Object", None).into_handle();
        assert!(!ScriptFunction::is_instance_of(
            Some(&unrelated),
            Some(&class_fn)
        ));
        assert!(!ScriptFunction::is_instance_of(None, Some(&class_fn)));
    }
}
