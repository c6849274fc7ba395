use std::any::Any;

use chrono::{DateTime, NaiveDateTime, Utc};

use super::{SchemaType, date::has_date_shape, reject, run_validators, slot, token_text, wrong_kind};
use crate::{
    Path,
    error::{Fatal, PrepareError, ValidationErrors},
    messages,
    scanner::{Scanner, TokenKind},
    target::{Kind, TypeInfo},
    unescape,
    validators::DateTimeValidator,
};

/// UTC timestamp with optional fractional seconds, e.g.
/// `2016-03-10T23:00:00.000Z`.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if !has_date_shape(text) || text.as_bytes().get(10) != Some(&b'T') {
        return None;
    }
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}

/// Decodes a UTC timestamp string into a [`DateTime<Utc>`].
#[derive(Default)]
pub struct DateTimeSchema {
    validators: Vec<Box<dyn DateTimeValidator>>,
}

#[must_use]
pub fn datetime() -> DateTimeSchema {
    DateTimeSchema::default()
}

impl DateTimeSchema {
    #[must_use]
    pub fn validate(mut self, validator: impl DateTimeValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl SchemaType for DateTimeSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        match ty.kind() {
            Kind::DateTime => Ok(()),
            _ => Err(wrong_kind("a date-time", ty)),
        }
    }

    fn parse(
        &self,
        path: &Path<'_>,
        scanner: &mut Scanner<'_>,
        dest: &mut dyn Any,
        errors: &mut ValidationErrors,
    ) -> Result<(), Fatal> {
        let token = scanner.read_token()?;
        if token.kind != TokenKind::String {
            let (kind, found) = (token.kind, token_text(token.bytes));
            return reject(scanner, kind, path, errors, messages::invalid_datetime(&found));
        }
        let Some(text) = unescape::unquote(token.bytes) else {
            errors.add(path, messages::MALFORMED_STRING);
            return Ok(());
        };
        let Some(value) = parse_datetime(&text) else {
            errors.add(path, messages::invalid_datetime(&text));
            return Ok(());
        };
        if run_validators(&self.validators, path, errors, |v| v.validate_datetime(&value)) {
            *slot::<DateTime<Utc>>(dest, "a date-time", path)? = value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn fractional_seconds_are_optional() {
        let expected = Utc.with_ymd_and_hms(2016, 3, 10, 23, 0, 0).unwrap();
        assert_eq!(parse_datetime("2016-03-10T23:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("2016-03-10T23:00:00.000Z"), Some(expected));
        let precise = parse_datetime("2016-03-10T23:00:00.250Z").unwrap();
        assert_eq!(precise.nanosecond(), 250_000_000);
    }

    #[test]
    fn rejects_other_layouts() {
        assert_eq!(parse_datetime("2016-03-10 23:00:00Z"), None);
        assert_eq!(parse_datetime("2016-03-10T23:00:00"), None);
        assert_eq!(parse_datetime("2016-03-10T23:00:00+01:00"), None);
        assert_eq!(parse_datetime("2016-03-10"), None);
    }
}
