use super::*;
use crate::{PrepareError, boolean, enumeration, raw_bytes, unmarshaler};

#[derive(Debug, Default)]
struct Doubly {
    inner: Option<Option<String>>,
}

crate::target_struct!(Doubly { inner });

#[test]
fn leaf_kind_must_match() {
    assert!(matches!(
        ValidatingParser::<i64>::try_new(string()),
        Err(PrepareError::WrongKind { expected: "a string", .. })
    ));
    assert!(matches!(
        ValidatingParser::<String>::try_new(object([])),
        Err(PrepareError::WrongKind { expected: "a struct", .. })
    ));
    assert!(matches!(
        ValidatingParser::<f64>::try_new(boolean()),
        Err(PrepareError::WrongKind { .. })
    ));
    assert!(matches!(
        ValidatingParser::<Vec<u16>>::try_new(raw_bytes()),
        Err(PrepareError::WrongKind { expected: "Vec<u8>", .. })
    ));
}

#[test]
fn property_errors_name_the_property() {
    let err = ValidatingParser::<Person>::try_new(object([prop("name", integer())])).unwrap_err();
    insta::assert_snapshot!(
        err,
        @"property `name`: want an integer type not alloc::string::String"
    );
}

#[test]
fn element_errors_are_wrapped() {
    let err = ValidatingParser::<Vec<String>>::try_new(slice(integer())).unwrap_err();
    match err {
        PrepareError::InElement(inner) => {
            assert!(matches!(*inner, PrepareError::WrongKind { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn every_prop_needs_a_field() {
    let schema = object([
        prop("street", string()),
        prop("city", string()),
        prop("country", string()),
    ]);
    match ValidatingParser::<Address>::try_new(schema) {
        Err(PrepareError::MissingFields { props, .. }) => {
            assert_eq!(props, ["city", "country"]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn prop_names_bind_case_insensitively() {
    let schema = object([prop("Street", string()), prop("ZIP", string())]);
    assert!(ValidatingParser::<Address>::try_new(schema).is_ok());
}

#[test]
fn default_must_have_the_field_type() {
    let schema = object([prop("age", integer()).with_default("zero")]);
    assert!(matches!(
        ValidatingParser::<Person>::try_new(schema),
        Err(PrepareError::DefaultTypeMismatch { .. })
    ));

    let schema = object([prop("email", string()).with_default("x".to_string())]);
    assert!(ValidatingParser::<Person>::try_new(schema).is_ok());
}

#[test]
fn enum_values_must_have_the_field_type() {
    let schema = object([prop("name", enumeration(string(), [1_i64, 2]))]);
    match ValidatingParser::<Person>::try_new(schema) {
        Err(PrepareError::InProperty { source, .. }) => {
            assert!(matches!(*source, PrepareError::EnumTypeMismatch { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn nested_optionals_are_rejected() {
    let schema = object([prop("inner", string())]);
    assert!(matches!(
        ValidatingParser::<Doubly>::try_new(schema),
        Err(PrepareError::NestedOptional(_))
    ));
}

#[test]
fn unmarshaler_needs_an_implementation() {
    assert!(matches!(
        ValidatingParser::<String>::try_new(unmarshaler()),
        Err(PrepareError::NotUnmarshaler(_))
    ));
}

#[test]
#[should_panic(expected = "schema does not fit")]
fn new_panics_on_a_bad_schema() {
    let _ = ValidatingParser::<bool>::new(integer());
}
