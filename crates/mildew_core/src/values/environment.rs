//! Lexical environments — chained name→value tables.
//!
//! The parser never touches environments; function values carry one as their
//! closure.  The shape and operations here pin the interface a later bytecode
//! pass will implement against.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::values::any::ScriptAny;

/// Shared-ownership handle to a mutable [`Environment`].
pub type EnvironmentHandle = Rc<RefCell<Environment>>;

/// A single declared variable slot.
#[derive(Debug, Clone)]
pub struct EnvEntry {
    /// The stored value.
    pub value: ScriptAny,
    /// `true` for `const` declarations.
    pub is_const: bool,
}

/// Outcome of [`Environment::reassign_variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reassign {
    /// The variable was found and updated.
    Assigned,
    /// No environment in the chain declares the variable.
    NotDeclared,
    /// The nearest declaration is `const`.
    ConstViolation,
}

/// A chained name→value table.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    parent: Option<EnvironmentHandle>,
    name: String,
    value_table: FxHashMap<String, EnvEntry>,
}

impl Environment {
    /// Create the root (global) environment.
    pub fn new_global() -> Self {
        Self {
            parent: None,
            name: "<global>".to_string(),
            value_table: FxHashMap::default(),
        }
    }

    /// Create a child environment.
    pub fn new(parent: EnvironmentHandle, name: impl Into<String>) -> Self {
        Self {
            parent: Some(parent),
            name: name.into(),
            value_table: FxHashMap::default(),
        }
    }

    /// Wrap an environment in a shared handle.
    pub fn into_handle(self) -> EnvironmentHandle {
        Rc::new(RefCell::new(self))
    }

    /// The environment's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent environment, when one exists.
    pub fn parent(&self) -> Option<EnvironmentHandle> {
        self.parent.clone()
    }

    /// Number of parent links above this environment.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.clone();
        while let Some(env) = current {
            depth += 1;
            current = env.borrow().parent();
        }
        depth
    }

    /// Declare a variable in *this* environment.  Returns `false` when the
    /// name is already declared here.
    pub fn declare_variable(
        &mut self,
        name: impl Into<String>,
        value: ScriptAny,
        is_const: bool,
    ) -> bool {
        let name = name.into();
        if self.value_table.contains_key(&name) {
            return false;
        }
        self.value_table.insert(name, EnvEntry { value, is_const });
        true
    }

    /// Look a name up here, then along the parent chain.
    pub fn lookup_variable(&self, name: &str) -> Option<EnvEntry> {
        if let Some(entry) = self.value_table.get(name) {
            return Some(entry.clone());
        }
        match &self.parent {
            Some(parent) => parent.borrow().lookup_variable(name),
            None => None,
        }
    }

    /// Returns `true` when the name is declared anywhere in the chain.
    pub fn variable_exists(&self, name: &str) -> bool {
        self.lookup_variable(name).is_some()
    }

    /// Update the nearest declaration of `name`, refusing `const` slots.
    pub fn reassign_variable(&mut self, name: &str, new_value: ScriptAny) -> Reassign {
        if let Some(entry) = self.value_table.get_mut(name) {
            if entry.is_const {
                return Reassign::ConstViolation;
            }
            entry.value = new_value;
            return Reassign::Assigned;
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().reassign_variable(name, new_value),
            None => Reassign::NotDeclared,
        }
    }

    /// Set a variable in *this* environment, overwriting any previous slot
    /// and ignoring const-ness.
    pub fn force_set_variable(
        &mut self,
        name: impl Into<String>,
        value: ScriptAny,
        is_const: bool,
    ) {
        self.value_table
            .insert(name.into(), EnvEntry { value, is_const });
    }

    /// Remove a declaration from *this* environment, if present.
    pub fn force_remove_variable(&mut self, name: &str) {
        self.value_table.remove(name);
    }

    /// Remove the nearest declaration of `name` anywhere in the chain.
    pub fn unset_variable(&mut self, name: &str) {
        if self.value_table.remove(name).is_some() {
            return;
        }
        if let Some(parent) = &self.parent {
            parent.borrow_mut().unset_variable(name);
        }
    }
}

/// Walk to the root of an environment chain.
pub fn global_of(env: &EnvironmentHandle) -> EnvironmentHandle {
    let mut current = env.clone();
    loop {
        let parent = current.borrow().parent();
        match parent {
            Some(p) => current = p,
            None => return current,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let mut env = Environment::new_global();
        assert!(env.declare_variable("x", ScriptAny::from(1i64), false));
        assert!(!env.declare_variable("x", ScriptAny::from(2i64), false));
        let entry = env.lookup_variable("x").unwrap();
        assert_eq!(entry.value, ScriptAny::from(1i64));
        assert!(!entry.is_const);
    }

    #[test]
    fn test_lookup_walks_parent_chain() {
        let global = Environment::new_global().into_handle();
        global
            .borrow_mut()
            .declare_variable("g", ScriptAny::from(true), true);
        let child = Environment::new(global, "<child>");
        let entry = child.lookup_variable("g").unwrap();
        assert!(entry.is_const);
    }

    #[test]
    fn test_reassign_const_check() {
        let mut env = Environment::new_global();
        env.declare_variable("k", ScriptAny::from(1i64), true);
        env.declare_variable("v", ScriptAny::from(1i64), false);
        assert_eq!(
            env.reassign_variable("k", ScriptAny::from(2i64)),
            Reassign::ConstViolation
        );
        assert_eq!(
            env.reassign_variable("v", ScriptAny::from(2i64)),
            Reassign::Assigned
        );
        assert_eq!(
            env.reassign_variable("missing", ScriptAny::Null),
            Reassign::NotDeclared
        );
    }

    #[test]
    fn test_reassign_updates_nearest_declaration() {
        let global = Environment::new_global().into_handle();
        global
            .borrow_mut()
            .declare_variable("x", ScriptAny::from(1i64), false);
        let mut child = Environment::new(global.clone(), "<child>");
        assert_eq!(
            child.reassign_variable("x", ScriptAny::from(9i64)),
            Reassign::Assigned
        );
        assert_eq!(
            global.borrow().lookup_variable("x").unwrap().value,
            ScriptAny::from(9i64)
        );
    }

    #[test]
    fn test_force_set_ignores_const() {
        let mut env = Environment::new_global();
        env.declare_variable("k", ScriptAny::from(1i64), true);
        env.force_set_variable("k", ScriptAny::from(5i64), false);
        assert_eq!(env.lookup_variable("k").unwrap().value, ScriptAny::from(5i64));
    }

    #[test]
    fn test_unset_walks_chain() {
        let global = Environment::new_global().into_handle();
        global
            .borrow_mut()
            .declare_variable("x", ScriptAny::from(1i64), false);
        let mut child = Environment::new(global.clone(), "<child>");
        child.unset_variable("x");
        assert!(!global.borrow().variable_exists("x"));
    }

    #[test]
    fn test_depth_and_global() {
        let global = Environment::new_global().into_handle();
        let mid = Environment::new(global.clone(), "<mid>").into_handle();
        let leaf = Environment::new(mid, "<leaf>").into_handle();
        assert_eq!(leaf.borrow().depth(), 2);
        assert!(Rc::ptr_eq(&global_of(&leaf), &global));
    }
}
