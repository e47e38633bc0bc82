//! Inclusive range check.

use std::cmp::Ordering;
use std::fmt;

use validecor::{ArgMap, ArgName, ArgType, Cause, ValidecorError, Validator, Value};

/// Checks that the argument is between `lo` and `hi` (inclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct Between {
    lo: Value,
    hi: Value,
}

impl Between {
    /// Creates a bound check.
    pub fn new(lo: impl Into<Value>, hi: impl Into<Value>) -> Self {
        Self { lo: lo.into(), hi: hi.into() }
    }
}

impl fmt::Display for Between {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Between({},{})", self.lo, self.hi)
    }
}

impl Validator for Between {
    fn validate(
        &self,
        arg_name: &ArgName,
        arg_type: ArgType,
        _source: &ArgMap,
        target: &mut ArgMap,
    ) -> Result<(), ValidecorError> {
        static NULL: Value = Value::Null;
        let arg = target.get(arg_name.as_str()).unwrap_or(&NULL);
        let check = |lower: &Value, upper: &Value, bound: &Value| match compare(lower, upper) {
            Some(Ordering::Less) => Err(ValidecorError::rejected(arg_name, arg_type, self, None)),
            Some(_) => Ok(()),
            None => {
                let cause = Cause::Incomparable { found: ArgType::of(arg), bound: ArgType::of(bound) };
                Err(ValidecorError::rejected(arg_name, arg_type, self, Some(cause)))
            }
        };
        check(arg, &self.lo, &self.lo)?;
        check(&self.hi, arg, &self.hi)
    }
}

/// Orders two values the way a dynamically typed comparison would.
///
/// Numbers compare numerically (integers exactly), strings and lists
/// lexicographically, bools as `false < true`. A bool against a number
/// counts as `0` or `1`. Any other pairing is unordered.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => match (x.as_u64(), y.as_u64()) {
                (Some(x), Some(y)) => Some(x.cmp(&y)),
                _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
            },
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Number(_)) => compare(&Value::from(u8::from(*x)), b),
        (Value::Number(_), Value::Bool(y)) => compare(a, &Value::from(u8::from(*y))),
        (Value::Array(xs), Value::Array(ys)) => {
            for (x, y) in xs.iter().zip(ys) {
                match compare(x, y)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(xs.len().cmp(&ys.len()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;
    use validecor::ErrorType;

    fn run(v: &Between, value: Value) -> Result<(), ValidecorError> {
        let name = ArgName::new("x").unwrap();
        let mut target = ArgMap::new();
        target.insert("x".into(), value);
        v.validate(&name, ArgType::Any, &ArgMap::new(), &mut target)
    }

    #[rstest]
    #[case(json!(1))]
    #[case(json!(5))]
    #[case(json!(10))]
    #[case(json!(7.5))]
    fn accepts_inclusive_range(#[case] value: Value) {
        assert!(run(&Between::new(1, 10), value).is_ok());
    }

    #[rstest]
    #[case(json!(0))]
    #[case(json!(11))]
    #[case(json!(10.01))]
    fn rejects_out_of_range_without_sub_error(#[case] value: Value) {
        match run(&Between::new(1, 10), value) {
            Err(ValidecorError::ArgVal { sub_error: None, validator, .. }) => {
                assert_eq!(validator, "Between(1,10)");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn strings_compare_lexicographically() {
        let v = Between::new("b", "d");
        assert!(run(&v, json!("c")).is_ok());
        assert!(run(&v, json!("a")).is_err());
    }

    #[test]
    fn incomparable_values_carry_a_cause() {
        let err = run(&Between::new(1, 10), json!("5")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::ArgVal);
        match err {
            ValidecorError::ArgVal { sub_error: Some(Cause::Incomparable { found, bound }), .. } => {
                assert_eq!(found, ArgType::Str);
                assert_eq!(bound, ArgType::Int);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bools_order_as_zero_and_one_against_numbers() {
        let v = Between::new(0, 1);
        assert!(run(&v, json!(true)).is_ok());
        assert!(run(&v, json!(false)).is_ok());
        assert!(run(&Between::new(0.5, 2), json!(false)).is_err());
        assert_eq!(compare(&json!([true, 2]), &json!([1, 3])), Some(Ordering::Less));
    }

    #[test]
    fn lists_compare_element_wise() {
        assert_eq!(compare(&json!([1, 2]), &json!([1, 3])), Some(Ordering::Less));
        assert_eq!(compare(&json!([1, 2]), &json!([1])), Some(Ordering::Greater));
        assert_eq!(compare(&json!([1, "a"]), &json!([1, 2])), None);
    }

    proptest! {
        #[test]
        fn agrees_with_integer_ordering(lo in -1000i64..1000, span in 0i64..1000, x in -3000i64..3000) {
            let hi = lo + span;
            let inside = (lo..=hi).contains(&x);
            prop_assert_eq!(run(&Between::new(lo, hi), json!(x)).is_ok(), inside);
        }
    }
}
