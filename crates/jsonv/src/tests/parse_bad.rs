use std::io::{self, Read};

use super::*;
use crate::error::{Error, SyntaxError};

fn parse(input: &str) -> Result<(), Error> {
    person_parser().parse(input.as_bytes(), &mut Person::default())
}

#[test]
fn missing_required_properties_in_declared_order() {
    insta::assert_snapshot!(report(parse("{}")), @r"
    /name: Is required
    /age: Is required
    ");
}

#[test]
fn collects_every_problem() {
    let doc = r#"{
        "name": "",
        "age": 200,
        "email": "nobody",
        "tags": ["a", "b", "c", "d"],
        "address": {"street": 12, "zip": "1234"},
        "born": "1815-13-10"
    }"#;
    insta::assert_snapshot!(report(parse(doc)), @r"
    /name: Must be at least 1 characters long
    /age: Must be less than or equal to 150
    /email: Must match regex pattern @
    /tags: Must contain no more than 3 items
    /address/street: Must be a string, got value 12
    /address/zip: Must match regex pattern ^[0-9]{5}$
    /born: Must be a date in the format yyyy-mm-dd, got value 1815-13-10
    ");
}

#[test]
fn wrong_kinds_skip_the_whole_value() {
    let doc = r#"{"name": {"first": "Ada", "rest": [1, 2]}, "age": [3], "tags": ["ok", false]}"#;
    insta::assert_snapshot!(report(parse(doc)), @r"
    /name: Must be a string, got value {
    /age: Must be an integer, got value [
    /tags/1/: Must be a string, got value false
    ");
}

#[test]
fn integer_literal_checks() {
    insta::assert_snapshot!(
        report(parse(r#"{"name": "x", "age": 1.5}"#)),
        @"/age: Must be an integer, got value 1.5"
    );
    insta::assert_snapshot!(
        report(parse(r#"{"name": "x", "age": 99999999999999999999}"#)),
        @"/age: Error parsing integer, number too large to fit in target type"
    );
}

#[test]
fn null_on_a_required_field() {
    insta::assert_snapshot!(
        report(parse(r#"{"name": null, "age": 1}"#)),
        @"/name: Must not be null"
    );
}

#[test]
fn empty_input_is_one_root_record() {
    for input in ["", "  \n\t "] {
        let err = parse(input).unwrap_err();
        let records = err.validation_errors().unwrap().as_slice();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "/");
        assert_eq!(records[0].message, "Unexpected end of input");
    }
}

#[test]
fn truncated_document_is_a_syntax_error() {
    for input in [r#"{"name": "Bob""#, r#"{"name": "Bo"#, r#"{"name":"#, "{"] {
        assert!(
            matches!(
                parse(input),
                Err(Error::Syntax(SyntaxError::UnexpectedEndOfInput))
            ),
            "{input}"
        );
    }
}

#[test]
fn malformed_json_is_fatal() {
    assert!(matches!(
        parse(r#"{"name" "Bob"}"#),
        Err(Error::Syntax(SyntaxError::UnexpectedToken { .. }))
    ));
    assert!(matches!(
        parse(r#"{"name": "Bob", "age": 01}"#),
        Err(Error::Syntax(SyntaxError::InvalidNumber(_)))
    ));
    assert!(matches!(
        parse(r#"{"address": 5}"#),
        Err(Error::Syntax(SyntaxError::UnexpectedToken { .. }))
    ));
    assert!(matches!(parse("[]"), Err(Error::Syntax(_))));
}

#[test]
fn trailing_data_is_rejected() {
    assert!(matches!(
        parse(r#"{"name": "Bob", "age": 3} x"#),
        Err(Error::Syntax(SyntaxError::TrailingData))
    ));
}

struct FailingReader<'a> {
    prefix: &'a [u8],
}

impl Read for FailingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.prefix.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "slow client"));
        }
        let n = self.prefix.len().min(buf.len());
        buf[..n].copy_from_slice(&self.prefix[..n]);
        self.prefix = &self.prefix[n..];
        Ok(n)
    }
}

#[test]
fn io_errors_pass_through() {
    for prefix in [&b""[..], br#"{"name": "Bo"#] {
        let result =
            person_parser().parse(FailingReader { prefix }, &mut Person::default());
        match result {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::TimedOut),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
