//! Parser-level tests over a shared `Person` fixture.

mod parse_bad;
mod parse_good;
mod prepare;

use chrono::NaiveDate;

use crate::{
    ParserOptions, ValidatingParser, date, integer, object, prop, slice, string,
    types::ObjectSchema,
    validators::{max, max_len, min, min_len, pattern},
};

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Address {
    pub street: String,
    pub zip: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Person {
    pub name: String,
    pub age: i64,
    pub email: Option<String>,
    pub tags: Vec<String>,
    pub address: Option<Address>,
    pub born: Option<NaiveDate>,
}

crate::target_struct!(Address { street, zip });
crate::target_struct!(Person { name, age, email, tags, address, born });

pub(crate) fn person_schema() -> ObjectSchema {
    object([
        prop("name", string().validate(min_len(1))),
        prop("age", integer().validate(min(0)).validate(max(150))),
        prop("email", string().validate(pattern("@"))),
        prop("tags", slice(string()).validate(max_len(3))).with_default(Vec::<String>::new()),
        prop(
            "address",
            object([
                prop("street", string()),
                prop("zip", string().validate(pattern("^[0-9]{5}$"))),
            ]),
        ),
        prop("born", date()),
    ])
}

pub(crate) fn person_parser() -> ValidatingParser<Person> {
    ValidatingParser::new(person_schema())
}

/// Same parser, reading one byte per refill.
pub(crate) fn trickle_person_parser() -> ValidatingParser<Person> {
    person_parser().with_options(ParserOptions {
        read_size: 1,
        ..ParserOptions::default()
    })
}

pub(crate) const FULL_PERSON: &str = r#"{
    "name": "Ada Lovelace",
    "age": 36,
    "email": "ada@example.com",
    "tags": ["math", "poetry"],
    "address": {"street": "St James's Square", "zip": "12345"},
    "born": "1815-12-10"
}"#;

pub(crate) fn full_person() -> Person {
    Person {
        name: "Ada Lovelace".to_string(),
        age: 36,
        email: Some("ada@example.com".to_string()),
        tags: vec!["math".to_string(), "poetry".to_string()],
        address: Some(Address {
            street: "St James's Square".to_string(),
            zip: "12345".to_string(),
        }),
        born: NaiveDate::from_ymd_opt(1815, 12, 10),
    }
}

/// Renders the validation records of a failed parse, one per line.
pub(crate) fn report(result: Result<(), crate::Error>) -> String {
    match result {
        Err(crate::Error::Invalid(errors)) => errors.to_string(),
        other => panic!("expected validation errors, got {other:?}"),
    }
}
