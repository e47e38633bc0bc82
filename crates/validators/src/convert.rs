//! Value conversion between [`ArgType`]s.
//!
//! Mirrors calling a type as a constructor on a dynamic value: `int(" 7 ")`,
//! `float(3)`, `str(x)`, `bool(x)` by truthiness, `list("ab")`, `dict(pairs)`.

use serde_json::Number;
use validecor::{ArgMap, ArgType, Cause, Value};

/// Converts `value` to `to`.
pub fn convert(value: &Value, to: ArgType) -> Result<Value, Cause> {
    let from = ArgType::of(value);
    let fail = |reason: &str| Cause::Conversion { from, to, reason: reason.to_string() };

    match to {
        ArgType::Any => Ok(value.clone()),
        ArgType::None => match value {
            Value::Null => Ok(Value::Null),
            _ => Err(fail("only none converts to none")),
        },
        ArgType::Bool => Ok(Value::Bool(truthy(value))),
        ArgType::Int => match value {
            Value::Bool(b) => Ok(Value::from(i64::from(*b))),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::Number(n) => {
                let f = n.as_f64().ok_or_else(|| fail("not a finite number"))?;
                let truncated = f.trunc();
                // i64::MAX rounds up to 2^63 as f64, which is out of range.
                if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                    Ok(Value::from(truncated as i64))
                } else {
                    Err(fail("out of integer range"))
                }
            }
            Value::String(s) => parse_int(s.trim())
                .map(Value::from)
                .map_err(|e| fail(&format!("invalid literal '{s}': {e}"))),
            _ => Err(fail("not a number or numeric string")),
        },
        ArgType::Float => {
            let f = match value {
                Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
                Value::Number(n) => n.as_f64().ok_or_else(|| fail("not a finite number")),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| fail(&format!("invalid literal '{s}': {e}"))),
                _ => Err(fail("not a number or numeric string")),
            }?;
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| fail("not representable as a finite float"))
        }
        ArgType::Str => Ok(Value::String(match value {
            Value::String(s) => s.clone(),
            Value::Null => "None".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            other => other.to_string(),
        })),
        ArgType::List => match value {
            Value::Array(_) => Ok(value.clone()),
            Value::String(s) => Ok(Value::Array(s.chars().map(|c| Value::from(c.to_string())).collect())),
            Value::Object(fields) => Ok(Value::Array(fields.keys().cloned().map(Value::from).collect())),
            _ => Err(fail("not iterable")),
        },
        ArgType::Dict => match value {
            Value::Object(_) => Ok(value.clone()),
            Value::Array(items) => items
                .iter()
                .map(|item| match item.as_array().map(Vec::as_slice) {
                    Some([Value::String(k), v]) => Ok((k.clone(), v.clone())),
                    _ => Err(fail("expected a list of [str, value] pairs")),
                })
                .collect::<Result<ArgMap, _>>()
                .map(Value::Object),
            _ => Err(fail("not a mapping")),
        },
    }
}

/// Parses an integer literal; `_` is allowed only singly between digits.
fn parse_int(s: &str) -> Result<i64, String> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return Err("misplaced underscore".to_string());
    }
    s.replace('_', "").parse::<i64>().map_err(|e| e.to_string())
}

/// Truthiness: null, `false`, zero, and empty strings/lists/dicts are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("12"), ArgType::Int, json!(12))]
    #[case(json!(" -3 "), ArgType::Int, json!(-3))]
    #[case(json!("1_000"), ArgType::Int, json!(1000))]
    #[case(json!(3.9), ArgType::Int, json!(3))]
    #[case(json!(-3.9), ArgType::Int, json!(-3))]
    #[case(json!(true), ArgType::Int, json!(1))]
    #[case(json!(9.2e18), ArgType::Int, json!(9_200_000_000_000_000_000_i64))]
    #[case(json!(-9_223_372_036_854_775_808.0_f64), ArgType::Int, json!(i64::MIN))]
    #[case(json!(2), ArgType::Float, json!(2.0))]
    #[case(json!("2.5"), ArgType::Float, json!(2.5))]
    #[case(json!(false), ArgType::Float, json!(0.0))]
    #[case(json!(1.5), ArgType::Str, json!("1.5"))]
    #[case(json!(null), ArgType::Str, json!("None"))]
    #[case(json!(true), ArgType::Str, json!("True"))]
    #[case(json!(""), ArgType::Bool, json!(false))]
    #[case(json!([0]), ArgType::Bool, json!(true))]
    #[case(json!(0.0), ArgType::Bool, json!(false))]
    #[case(json!("ab"), ArgType::List, json!(["a", "b"]))]
    #[case(json!({"k": 1}), ArgType::List, json!(["k"]))]
    #[case(json!([["a", 1], ["b", 2]]), ArgType::Dict, json!({"a": 1, "b": 2}))]
    #[case(json!(null), ArgType::None, json!(null))]
    #[case(json!({"x": [1]}), ArgType::Any, json!({"x": [1]}))]
    fn converts(#[case] input: Value, #[case] to: ArgType, #[case] expected: Value) {
        assert_eq!(convert(&input, to).unwrap(), expected);
    }

    #[rstest]
    #[case(json!("3.5"), ArgType::Int)]
    #[case(json!("abc"), ArgType::Float)]
    #[case(json!("inf"), ArgType::Float)]
    #[case(json!(null), ArgType::Int)]
    #[case(json!(4), ArgType::List)]
    #[case(json!([1, 2]), ArgType::Dict)]
    #[case(json!(0), ArgType::None)]
    #[case(json!(1e300), ArgType::Int)]
    #[case(json!(9_223_372_036_854_775_808.0_f64), ArgType::Int)]
    #[case(json!("_1"), ArgType::Int)]
    #[case(json!("1_"), ArgType::Int)]
    #[case(json!("1__0"), ArgType::Int)]
    #[case(json!("-_1"), ArgType::Int)]
    fn refuses(#[case] input: Value, #[case] to: ArgType) {
        match convert(&input, to) {
            Err(Cause::Conversion { from, to: target, .. }) => {
                assert_eq!(from, ArgType::of(&input));
                assert_eq!(target, to);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
