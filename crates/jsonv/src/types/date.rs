use std::any::Any;

use chrono::NaiveDate;

use super::{SchemaType, reject, run_validators, slot, token_text, wrong_kind};
use crate::{
    Path,
    error::{Fatal, PrepareError, ValidationErrors},
    messages,
    scanner::{Scanner, TokenKind},
    target::{Kind, TypeInfo},
    unescape,
    validators::DateValidator,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether `text` starts with `yyyy-mm-dd`.
pub(super) fn has_date_shape(text: &str) -> bool {
    text.len() >= 10
        && text.bytes().take(10).enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

pub(super) fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 10 || !has_date_shape(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Decodes a `"yyyy-mm-dd"` string into a [`NaiveDate`].
#[derive(Default)]
pub struct DateSchema {
    validators: Vec<Box<dyn DateValidator>>,
}

#[must_use]
pub fn date() -> DateSchema {
    DateSchema::default()
}

impl DateSchema {
    #[must_use]
    pub fn validate(mut self, validator: impl DateValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl SchemaType for DateSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        match ty.kind() {
            Kind::Date => Ok(()),
            _ => Err(wrong_kind("a date", ty)),
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
            return reject(scanner, kind, path, errors, messages::invalid_date(&found));
        }
        let Some(text) = unescape::unquote(token.bytes) else {
            errors.add(path, messages::MALFORMED_STRING);
            return Ok(());
        };
        let Some(value) = parse_date(&text) else {
            errors.add(path, messages::invalid_date(&text));
            return Ok(());
        };
        if run_validators(&self.validators, path, errors, |v| v.validate_date(&value)) {
            *slot::<NaiveDate>(dest, "a date", path)? = value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_format() {
        assert_eq!(parse_date("2016-03-10"), NaiveDate::from_ymd_opt(2016, 3, 10));
        assert_eq!(parse_date("2016-3-10"), None);
        assert_eq!(parse_date("2016-02-30"), None);
        assert_eq!(parse_date("+2016-03-1"), None);
        assert_eq!(parse_date("2016-03-10T00:00:00Z"), None);
    }
}
