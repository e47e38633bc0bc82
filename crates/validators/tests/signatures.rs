//! Declarative signatures driving the decorator with the stock validators.

use serde_json::json;
use validecor::{validecor, Annotation, ArgName, ArgSpec, ArgType, CallArgs, Cause, ErrorType, ValidecorError};
use validators::{load_signature, Between, Custom, IsTypable, IsType, Registry};

const TRANSFER: &str = r#"{
    "name": "transfer",
    "params": [{"name": "amount"}, {"name": "note", "default": ""}],
    "varargs": "rest",
    "kwonly": [{"name": "currency", "default": "EUR"}],
    "varkw": "extra",
    "annotations": [
        {"param": "amount", "type": "int",
         "metadata": [{"is_typable": null}, {"between": [0, 1000]}]},
        {"param": "currency", "type": "str",
         "metadata": [{"is_type": null}, {"custom": "non_empty"}]}
    ]
}"#;

fn n(s: &str) -> ArgName {
    ArgName::new(s).unwrap()
}

#[test]
fn transfer_converts_and_bounds_the_amount() {
    let spec = load_signature(TRANSFER, &Registry::with_builtins()).unwrap();
    let decor = validecor(spec).unwrap();

    let resolved = decor
        .resolve(&CallArgs::new().arg("250").arg("rent").arg(1).kwarg("tag", "x"))
        .unwrap();
    assert_eq!(resolved.positional, vec![json!(250), json!("rent"), json!(1)]);
    assert_eq!(resolved.keyword["currency"], json!("EUR"));
    assert_eq!(resolved.keyword["tag"], json!("x"));

    let err = decor.resolve(&CallArgs::new().arg(5000)).unwrap_err();
    assert_eq!(
        err,
        ValidecorError::ArgVal {
            arg_name: n("amount"),
            arg_type: ArgType::Int,
            validator: "Between(0,1000)".into(),
            actual_type: None,
            sub_error: None,
        }
    );

    let err = decor.resolve(&CallArgs::new().arg("lots")).unwrap_err();
    assert!(matches!(
        err,
        ValidecorError::ArgVal { sub_error: Some(Cause::Conversion { .. }), .. }
    ));
}

#[test]
fn keyword_only_checks_run_against_caller_values() {
    let spec = load_signature(TRANSFER, &Registry::with_builtins()).unwrap();
    let decor = validecor(spec).unwrap();

    let err = decor
        .resolve(&CallArgs::new().arg(1).kwarg("currency", 978))
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::ArgVal);
    assert!(err.to_string().contains("actual_type: int"), "{err}");

    let err = decor
        .resolve(&CallArgs::new().arg(1).kwarg("currency", " "))
        .unwrap_err();
    assert!(err.to_string().contains("Custom(non_empty)"), "{err}");
}

#[test]
fn user_registered_predicates_and_transforms() {
    let mut registry = Registry::with_builtins();
    registry.register_predicate("even", |v| match v.as_i64() {
        Some(i) if i % 2 == 0 => Ok(()),
        _ => Err("not even".into()),
    });
    let target = load_signature(
        r#"{"name": "pairs", "params": [{"name": "count"}],
            "annotations": [{"param": "count", "type": "int",
                             "metadata": [{"map": ["items", {"call": "len"}]}, {"custom": "even"}]}]}"#,
        &registry,
    )
    .unwrap();
    let source = load_signature(r#"{"name": "caller", "params": [{"name": "items"}]}"#, &registry).unwrap();
    let decor = validecor(target).and_then(|d| d.with_source(source)).unwrap();

    let resolved = decor.resolve(&CallArgs::new().arg(json!(["a", "b"]))).unwrap();
    assert_eq!(resolved.positional, vec![json!(2)]);

    let err = decor.resolve(&CallArgs::new().arg(json!(["a"]))).unwrap_err();
    assert!(matches!(
        err,
        ValidecorError::ArgVal { sub_error: Some(Cause::Rejected { ref reason }), .. } if reason == "not even"
    ));
}

#[test]
fn opaque_metadata_loads_but_fails_the_call() {
    let spec = load_signature(
        r#"{"name": "f", "params": [{"name": "a"}],
            "annotations": [{"param": "a", "metadata": [{"between": [0, 1]}, "docs: must be small"]}]}"#,
        &Registry::with_builtins(),
    )
    .unwrap();
    let err = validecor(spec).unwrap().resolve(&CallArgs::new().arg(0)).unwrap_err();
    assert_eq!(
        err,
        ValidecorError::BadMetadata { arg_name: n("a"), metadata: "\"docs: must be small\"".into() }
    );
}

#[test]
fn stock_validators_compose_in_code() {
    let spec = ArgSpec::new("scale")
        .param(n("factor"))
        .annotate(
            n("factor"),
            Annotation::new(ArgType::Any)
                .with(IsTypable::with_override(ArgType::Float))
                .with(IsType::with_override(ArgType::Float))
                .with(Between::new(0.5, 2.0))
                .with(Custom::predicate("not_one", |v| v.as_f64() != Some(1.0))),
        );
    let scale = validecor(spec)
        .unwrap()
        .wrap(|call: CallArgs| call.get_as::<f64>(0).unwrap() * 10.0);

    assert_eq!(scale.call(CallArgs::new().arg("1.5")).unwrap(), 15.0);
    assert_eq!(scale.call(CallArgs::new().arg(2)).unwrap(), 20.0);
    assert_eq!(scale.call(CallArgs::new().arg(3)).unwrap_err().error_type(), ErrorType::ArgVal);
    assert!(scale
        .call(CallArgs::new().arg(1))
        .unwrap_err()
        .to_string()
        .contains("predicate 'not_one' returned false"));
}
