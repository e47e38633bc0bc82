//! Shared value types: the dynamic argument value, argument maps, declared
//! types, and the positional/keyword shape of a call.
//!
//! Arguments are carried as [`serde_json::Value`] so that any callable can be
//! described without generic reflection over Rust types; typed access is
//! recovered at the edges through serde ([`CallArgs::get_as`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A single argument value.
pub use serde_json::Value;

/// Canonical name→value argument map.
pub type ArgMap = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Declared / observed types
// ---------------------------------------------------------------------------

/// Type of an argument value, as declared in an annotation or observed at
/// call time.
///
/// Serialises in lowercase (`"int"`, `"str"`, ...). `"null"` is accepted as
/// an alias of `"none"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    /// Matches every value; never the observed type of a value.
    #[default]
    Any,
    /// The null value.
    #[serde(alias = "null")]
    None,
    /// `true` / `false`.
    Bool,
    /// A number representable as a 64-bit integer.
    Int,
    /// Any other number.
    Float,
    /// A string.
    Str,
    /// An ordered sequence.
    List,
    /// A string-keyed mapping.
    Dict,
}

impl ArgType {
    /// Classifies a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Int,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::Str,
            Value::Array(_) => Self::List,
            Value::Object(_) => Self::Dict,
        }
    }

    /// Returns `true` if `value` is of this type. [`ArgType::Any`] accepts
    /// everything.
    pub fn accepts(self, value: &Value) -> bool {
        self == Self::Any || self == Self::of(value)
    }

    /// Lowercase type name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::None => "none",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::List => "list",
            Self::Dict => "dict",
        }
    }
}

impl std::fmt::Display for ArgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Call shape
// ---------------------------------------------------------------------------

/// Positional and keyword arguments of one call.
///
/// This is both what a caller hands to a decorated function and what the
/// wrapped function finally receives after mapping and validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    /// Positional arguments, in order.
    #[serde(rename = "args", default)]
    pub positional: Vec<Value>,
    /// Keyword arguments.
    #[serde(rename = "kwargs", default)]
    pub keyword: ArgMap,
}

impl CallArgs {
    /// Creates an empty call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// Positional argument at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Keyword argument `name`, if present.
    pub fn get_kwarg(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    /// Deserialises the positional argument at `index` into `T`.
    ///
    /// A missing argument deserialises from `null`, so `Option<T>` targets
    /// yield `None`.
    pub fn get_as<T: DeserializeOwned>(&self, index: usize) -> Result<T, serde_json::Error> {
        T::deserialize(self.get(index).unwrap_or(&Value::Null))
    }

    /// Deserialises the keyword argument `name` into `T`.
    pub fn kwarg_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, serde_json::Error> {
        T::deserialize(self.get_kwarg(name).unwrap_or(&Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), ArgType::None)]
    #[case(json!(true), ArgType::Bool)]
    #[case(json!(3), ArgType::Int)]
    #[case(json!(u64::MAX), ArgType::Int)]
    #[case(json!(3.5), ArgType::Float)]
    #[case(json!(1.0), ArgType::Float)]
    #[case(json!("x"), ArgType::Str)]
    #[case(json!([1]), ArgType::List)]
    #[case(json!({"a": 1}), ArgType::Dict)]
    fn classifies_values(#[case] value: Value, #[case] expected: ArgType) {
        assert_eq!(ArgType::of(&value), expected);
    }

    #[test]
    fn any_accepts_everything() {
        assert!(ArgType::Any.accepts(&json!(null)));
        assert!(ArgType::Any.accepts(&json!({"k": [1, 2]})));
        assert!(!ArgType::Int.accepts(&json!("1")));
    }

    #[test]
    fn type_names_round_trip_through_serde() {
        let t: ArgType = serde_json::from_str("\"null\"").unwrap();
        assert_eq!(t, ArgType::None);
        assert_eq!(serde_json::to_string(&ArgType::Dict).unwrap(), "\"dict\"");
    }

    #[test]
    fn typed_accessors_use_serde() {
        let call = CallArgs::new().arg(7).kwarg("label", "seven");
        assert_eq!(call.get_as::<i64>(0).unwrap(), 7);
        assert_eq!(call.kwarg_as::<String>("label").unwrap(), "seven");
        assert_eq!(call.get_as::<Option<i64>>(5).unwrap(), None);
        assert!(call.get_as::<String>(0).is_err());
    }
}
