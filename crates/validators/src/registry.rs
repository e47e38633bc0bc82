//! Named predicates and transforms for declarative signatures.
//!
//! A JSON signature cannot carry code, so `{"custom": "non_empty"}` and
//! `{"call": "lower"}` refer to callables registered here by name.

use std::collections::HashMap;
use std::sync::Arc;

use validecor::{Cause, TransformFn, Value};

use crate::custom::CheckFn;

/// Registry of named checks and transforms.
#[derive(Default, Clone)]
pub struct Registry {
    predicates: HashMap<String, Arc<CheckFn>>,
    transforms: HashMap<String, Arc<TransformFn>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the builtin predicates
    /// (`non_empty`, `positive`, `non_negative`) and transforms (`len`,
    /// `lower`, `upper`, `trim`, `keys`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    /// Register a check. `Err(reason)` rejects the argument.
    pub fn register_predicate(
        &mut self,
        name: impl Into<String>,
        check: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) {
        self.predicates.insert(name.into(), Arc::new(check));
    }

    /// Register a transform.
    pub fn register_transform(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Value) -> Result<Value, Cause> + Send + Sync + 'static,
    ) {
        self.transforms.insert(name.into(), Arc::new(f));
    }

    /// Look up a check by name.
    pub fn predicate(&self, name: &str) -> Option<Arc<CheckFn>> {
        self.predicates.get(name).cloned()
    }

    /// Look up a transform by name.
    pub fn transform(&self, name: &str) -> Option<Arc<TransformFn>> {
        self.transforms.get(name).cloned()
    }

    /// List predicate names, sorted.
    pub fn predicate_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// List transform names, sorted.
    pub fn transform_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("predicates", &self.predicate_names())
            .field("transforms", &self.transform_names())
            .finish()
    }
}

/// Register all builtin predicates and transforms with the registry.
pub fn register_builtins(registry: &mut Registry) {
    registry.register_predicate("non_empty", |v| match v {
        Value::String(s) if s.trim().is_empty() => Err("string cannot be empty".into()),
        Value::Array(items) if items.is_empty() => Err("list cannot be empty".into()),
        Value::Object(fields) if fields.is_empty() => Err("dict cannot be empty".into()),
        Value::Null => Err("value cannot be none".into()),
        _ => Ok(()),
    });
    registry.register_predicate("positive", |v| match v.as_f64() {
        Some(n) if n > 0.0 => Ok(()),
        Some(_) => Err("number must be positive".into()),
        None => Err("not a number".into()),
    });
    registry.register_predicate("non_negative", |v| match v.as_f64() {
        Some(n) if n >= 0.0 => Ok(()),
        Some(_) => Err("number cannot be negative".into()),
        None => Err("not a number".into()),
    });

    registry.register_transform("len", |v| match v {
        Value::String(s) => Ok(Value::from(s.chars().count())),
        Value::Array(items) => Ok(Value::from(items.len())),
        Value::Object(fields) => Ok(Value::from(fields.len())),
        _ => Err(Cause::Rejected { reason: "value has no length".into() }),
    });
    registry.register_transform("lower", |v| string_op(v, str::to_lowercase));
    registry.register_transform("upper", |v| string_op(v, str::to_uppercase));
    registry.register_transform("trim", |v| string_op(v, |s| s.trim().to_string()));
    registry.register_transform("keys", |v| match v {
        Value::Object(fields) => Ok(Value::Array(fields.keys().cloned().map(Value::from).collect())),
        _ => Err(Cause::Rejected { reason: "value is not a dict".into() }),
    });
}

fn string_op(v: &Value, op: impl Fn(&str) -> String) -> Result<Value, Cause> {
    v.as_str()
        .map(|s| Value::String(op(s)))
        .ok_or_else(|| Cause::Rejected { reason: "value is not a string".into() })
}
