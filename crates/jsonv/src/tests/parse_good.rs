use rstest::rstest;

use super::*;

#[test]
fn decodes_a_full_document() {
    let mut person = Person::default();
    person_parser()
        .parse(FULL_PERSON.as_bytes(), &mut person)
        .unwrap();
    assert_eq!(person, full_person());
}

#[test]
fn optional_fields_may_be_absent() {
    let mut person = Person::default();
    person_parser()
        .parse(r#"{"name": "Bob", "age": 3}"#.as_bytes(), &mut person)
        .unwrap();
    assert_eq!(
        person,
        Person {
            name: "Bob".to_string(),
            age: 3,
            ..Person::default()
        }
    );
}

#[test]
fn null_clears_an_optional_field() {
    let mut person = Person {
        email: Some("stale@example.com".to_string()),
        ..Person::default()
    };
    person_parser()
        .parse(
            r#"{"name": "Bob", "age": 3, "email": null, "address": null}"#.as_bytes(),
            &mut person,
        )
        .unwrap();
    assert_eq!(person.email, None);
    assert_eq!(person.address, None);
}

#[rstest]
#[case::scalar(r#""x""#)]
#[case::object(r#"{"deep": {"deeper": [1, {"name": "not me"}]}}"#)]
#[case::array(r#"[[], [1, 2, [3]], {"a": null}]"#)]
#[case::literal("false")]
fn unknown_keys_are_skipped(#[case] value: &str) {
    let doc = format!(r#"{{"unknown": {value}, "name": "Bob", "other": {value}, "age": 3}}"#);
    let mut person = Person::default();
    person_parser().parse(doc.as_bytes(), &mut person).unwrap();
    assert_eq!(person.name, "Bob");
    assert_eq!(person.age, 3);
}

#[test]
fn keys_match_case_insensitively() {
    let mut person = Person::default();
    person_parser()
        .parse(r#"{"NAME": "Bob", "Age": 3}"#.as_bytes(), &mut person)
        .unwrap();
    assert_eq!((person.name.as_str(), person.age), ("Bob", 3));
}

#[test]
fn defaults_fill_absent_properties() {
    let mut person = Person {
        tags: vec!["old".to_string()],
        ..Person::default()
    };
    person_parser()
        .parse(r#"{"name": "Bob", "age": 3}"#.as_bytes(), &mut person)
        .unwrap();
    assert!(person.tags.is_empty());
}

#[test]
fn trailing_comma_before_close_brace() {
    let mut person = Person::default();
    person_parser()
        .parse(r#"{"name": "Bob", "age": 3,}"#.as_bytes(), &mut person)
        .unwrap();
    assert_eq!(person.age, 3);
}

#[test]
fn empty_array() {
    let mut person = Person::default();
    person_parser()
        .parse(r#"{"name": "Bob", "age": 3, "tags": [ ]}"#.as_bytes(), &mut person)
        .unwrap();
    assert!(person.tags.is_empty());
}

#[test]
fn reuse_does_not_leak_state() {
    let parser = person_parser();
    let mut person = Person::default();
    parser.parse(FULL_PERSON.as_bytes(), &mut person).unwrap();

    let mut next = person.clone();
    parser
        .parse(
            r#"{"name": "Bob", "age": 3, "tags": ["x"]}"#.as_bytes(),
            &mut next,
        )
        .unwrap();
    assert_eq!(
        next,
        Person {
            name: "Bob".to_string(),
            age: 3,
            tags: vec!["x".to_string()],
            ..Person::default()
        }
    );

    let err = parser.parse(r#"{"age": 3}"#.as_bytes(), &mut next).unwrap_err();
    assert_eq!(err.validation_errors().map(crate::ValidationErrors::len), Some(1));
}

#[test]
fn byte_at_a_time_reader() {
    let mut person = Person::default();
    trickle_person_parser()
        .parse(FULL_PERSON.as_bytes(), &mut person)
        .unwrap();
    assert_eq!(person, full_person());
}

#[test]
fn trailing_data_can_be_allowed() {
    let parser = person_parser().with_options(ParserOptions {
        allow_trailing_data: true,
        ..ParserOptions::default()
    });
    let mut person = Person::default();
    parser
        .parse(r#"{"name": "Bob", "age": 3} {"ignored": true}"#.as_bytes(), &mut person)
        .unwrap();
    assert_eq!(person.name, "Bob");
}
