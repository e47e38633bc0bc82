//! Exact type checks and conversions.

use std::fmt;

use validecor::{ArgMap, ArgName, ArgType, Cause, ValidecorError, Validator};

use crate::convert::convert;

fn render(name: &str, type_override: Option<ArgType>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match type_override {
        Some(t) => write!(f, "{name}({t})"),
        None => write!(f, "{name}()"),
    }
}

/// Ensures the argument's type matches the declared (or override) type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsType {
    type_override: Option<ArgType>,
}

impl IsType {
    /// Checks against the declared type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks against `arg_type` instead of the declared type.
    pub fn with_override(arg_type: ArgType) -> Self {
        Self { type_override: Some(arg_type) }
    }
}

impl fmt::Display for IsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render("IsType", self.type_override, f)
    }
}

impl Validator for IsType {
    fn validate(
        &self,
        arg_name: &ArgName,
        arg_type: ArgType,
        _source: &ArgMap,
        target: &mut ArgMap,
    ) -> Result<(), ValidecorError> {
        let expected = self.type_override.unwrap_or(arg_type);
        let actual = target.get(arg_name.as_str()).map_or(ArgType::None, ArgType::of);
        if expected == ArgType::Any || expected == actual {
            return Ok(());
        }
        Err(ValidecorError::ArgVal {
            arg_name: arg_name.clone(),
            arg_type: expected,
            validator: self.to_string(),
            actual_type: Some(actual),
            sub_error: None,
        })
    }
}

/// Converts the argument to the declared (or override) type, writing the
/// converted value back. Fails when the conversion is impossible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsTypable {
    type_override: Option<ArgType>,
}

impl IsTypable {
    /// Converts to the declared type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts to `arg_type` instead of the declared type.
    pub fn with_override(arg_type: ArgType) -> Self {
        Self { type_override: Some(arg_type) }
    }
}

impl fmt::Display for IsTypable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render("IsTypable", self.type_override, f)
    }
}

impl Validator for IsTypable {
    fn validate(
        &self,
        arg_name: &ArgName,
        arg_type: ArgType,
        _source: &ArgMap,
        target: &mut ArgMap,
    ) -> Result<(), ValidecorError> {
        let to = self.type_override.unwrap_or(arg_type);
        let converted = match target.get(arg_name.as_str()) {
            Some(value) => convert(value, to),
            None => Err(Cause::MissingKey { key: arg_name.to_string() }),
        };
        match converted {
            Ok(value) => {
                target.insert(arg_name.to_string(), value);
                Ok(())
            }
            Err(cause) => Err(ValidecorError::rejected(arg_name, to, self, Some(cause))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use validecor::{ErrorType, Value};

    fn target(value: Value) -> ArgMap {
        let mut m = ArgMap::new();
        m.insert("x".into(), value);
        m
    }

    fn x() -> ArgName {
        ArgName::new("x").unwrap()
    }

    #[test]
    fn is_type_uses_declared_type() {
        let mut t = target(json!(3));
        assert!(IsType::new().validate(&x(), ArgType::Int, &ArgMap::new(), &mut t).is_ok());

        let err = IsType::new().validate(&x(), ArgType::Str, &ArgMap::new(), &mut t).unwrap_err();
        assert_eq!(
            err,
            ValidecorError::ArgVal {
                arg_name: x(),
                arg_type: ArgType::Str,
                validator: "IsType()".into(),
                actual_type: Some(ArgType::Int),
                sub_error: None,
            }
        );
    }

    #[test]
    fn is_type_override_wins() {
        let mut t = target(json!("s"));
        let v = IsType::with_override(ArgType::Str);
        assert_eq!(v.to_string(), "IsType(str)");
        assert!(v.validate(&x(), ArgType::Int, &ArgMap::new(), &mut t).is_ok());
    }

    #[test]
    fn is_type_any_accepts_everything() {
        let mut t = target(json!({"a": 1}));
        assert!(IsType::new().validate(&x(), ArgType::Any, &ArgMap::new(), &mut t).is_ok());
    }

    #[test]
    fn is_type_distinguishes_int_and_float() {
        let mut t = target(json!(1.0));
        let err = IsType::new().validate(&x(), ArgType::Int, &ArgMap::new(), &mut t).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::ArgVal);
    }

    #[test]
    fn is_typable_rewrites_target() {
        let mut t = target(json!(" 42 "));
        IsTypable::new().validate(&x(), ArgType::Int, &ArgMap::new(), &mut t).unwrap();
        assert_eq!(t["x"], json!(42));
    }

    #[test]
    fn is_typable_failure_carries_conversion_cause() {
        let mut t = target(json!("forty-two"));
        let err = IsTypable::new().validate(&x(), ArgType::Int, &ArgMap::new(), &mut t).unwrap_err();
        match err {
            ValidecorError::ArgVal { sub_error: Some(Cause::Conversion { from, to, .. }), validator, .. } => {
                assert_eq!((from, to), (ArgType::Str, ArgType::Int));
                assert_eq!(validator, "IsTypable()");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(t["x"], json!("forty-two"));
    }
}
