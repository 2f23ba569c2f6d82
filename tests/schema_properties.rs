//! Property tests for validation invariants.

use proptest::prelude::*;
use schemata::schema::{
    SchemaNode, ValidationOptions, Value, array, boolean, nullable, number, object, optional,
    string, union, with_default,
};

/// Arbitrary values up to a small nesting depth.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e9..1.0e9f64).prop_map(Value::Float),
        "[a-z0-9]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::vec(("[a-c]", inner), 0..4)
                .prop_map(|pairs| pairs.into_iter().collect::<Value>()),
        ]
    })
}

fn sample_schema() -> SchemaNode {
    object([
        ("a", string()),
        ("b", optional(array(number()))),
        ("c", nullable(boolean())),
        (
            "d",
            union([string(), number()]).unwrap_or_else(|e| panic!("union should build: {e}")),
        ),
    ])
    .unwrap_or_else(|e| panic!("object should build: {e}"))
}

proptest! {
    #[test]
    fn validation_is_deterministic(value in arb_value()) {
        let schema = sample_schema();
        prop_assert_eq!(schema.validate(&value), schema.validate(&value));
    }

    #[test]
    fn numeric_strings_never_satisfy_number(n in any::<i64>()) {
        let input = Value::String(n.to_string());
        prop_assert!(number().validate(&input).is_err());
    }

    #[test]
    fn optional_accepts_absence_for_any_inner(value in arb_value()) {
        let options = ValidationOptions::default();
        let schema = optional(array(string()));
        prop_assert_eq!(schema.validate_field(None, &options), Ok(None));
        // Presence is always delegated.
        prop_assert_eq!(
            schema.validate(&value).is_ok(),
            array(string()).validate(&value).is_ok()
        );
    }

    #[test]
    fn default_yields_exact_default_for_absence(default in arb_value()) {
        let options = ValidationOptions::default();
        let schema = with_default(number(), default.clone());
        prop_assert_eq!(schema.validate_field(None, &options), Ok(Some(default)));
    }

    #[test]
    fn successful_validation_is_idempotent(value in arb_value()) {
        let schema = sample_schema();
        if let Ok(output) = schema.validate(&value) {
            prop_assert_eq!(schema.validate(&output), Ok(output.clone()));
        }
    }
}
