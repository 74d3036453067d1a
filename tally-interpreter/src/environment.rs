//! Variable environments for the Tally interpreter.
//!
//! A program runs against one top-level environment. `map` and `reduce`
//! bodies run in environments derived from an `Arc` snapshot of the
//! scope they were evaluated in, so lazy sequences and rayon workers can
//! share the outer bindings without copying or locking them.

use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Bindings owned by this scope
    bindings: HashMap<String, Value>,
    /// Scope consulted when a name is not bound here
    parent: Option<Arc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope layered over `parent`; `bindings` shadow the parent's
    pub fn derive<I>(parent: &Arc<Environment>, bindings: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Self {
            bindings: bindings.into_iter().collect(),
            parent: Some(Arc::clone(parent)),
        }
    }

    /// Create or overwrite a binding in this scope
    pub fn assign(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look a name up here, then in the parent chain
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut scope = self;
        loop {
            if let Some(value) = scope.bindings.get(name) {
                return Some(value);
            }
            scope = scope.parent.as_deref()?;
        }
    }

    /// Freeze the current bindings for sharing with derived scopes
    pub fn snapshot(&self) -> Arc<Environment> {
        Arc::new(self.clone())
    }

    /// Names bound in this scope, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::Number;

    fn number(value: i64) -> Value {
        Value::Number(Number::from(value))
    }

    fn lookup_number(environment: &Environment, name: &str) -> Option<Number> {
        environment
            .lookup(name)
            .and_then(Value::as_number)
            .cloned()
    }

    #[test]
    fn test_assign_overwrites() {
        let mut environment = Environment::new();
        environment.assign("x", number(1));
        environment.assign("x", number(2));

        assert_eq!(environment.len(), 1);
        assert_eq!(lookup_number(&environment, "x"), Some(Number::from(2)));
    }

    #[test]
    fn test_unbound_lookup() {
        assert!(Environment::new().lookup("missing").is_none());
    }

    #[test]
    fn test_derived_scope_shadows_without_mutating_parent() {
        let mut top = Environment::new();
        top.assign("x", number(1));
        top.assign("y", number(10));
        let parent = top.snapshot();

        let derived = Environment::derive(&parent, [("x".to_string(), number(5))]);

        assert_eq!(lookup_number(&derived, "x"), Some(Number::from(5)));
        assert_eq!(lookup_number(&derived, "y"), Some(Number::from(10)));
        assert_eq!(lookup_number(&parent, "x"), Some(Number::from(1)));
        assert_eq!(derived.names(), vec!["x"]);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_assignments() {
        let mut top = Environment::new();
        top.assign("x", number(1));
        let snapshot = top.snapshot();

        top.assign("x", number(2));

        assert_eq!(lookup_number(&snapshot, "x"), Some(Number::from(1)));
    }

    #[test]
    fn test_nested_derivation() {
        let mut top = Environment::new();
        top.assign("a", number(1));
        let middle = Environment::derive(&top.snapshot(), [("b".to_string(), number(2))]);
        let inner = Environment::derive(&middle.snapshot(), [("c".to_string(), number(3))]);

        assert!(inner.lookup("a").is_some());
        assert!(inner.lookup("b").is_some());
        assert!(inner.lookup("c").is_some());
    }

    #[test]
    fn test_clear_and_names() {
        let mut environment = Environment::new();
        environment.assign("zeta", number(1));
        environment.assign("alpha", number(2));

        assert_eq!(environment.names(), vec!["alpha", "zeta"]);

        environment.clear();
        assert!(environment.is_empty());
    }
}
