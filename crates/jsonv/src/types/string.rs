use std::any::Any;

use super::{SchemaType, reject, run_validators, slot, token_text, wrong_kind};
use crate::{
    Path,
    error::{Fatal, PrepareError, ValidationErrors},
    messages,
    scanner::{Scanner, TokenKind},
    target::{Kind, TypeInfo},
    unescape,
    validators::StringValidator,
};

/// Decodes a JSON string into a `String`.
#[derive(Default)]
pub struct StringSchema {
    validators: Vec<Box<dyn StringValidator>>,
}

#[must_use]
pub fn string() -> StringSchema {
    StringSchema::default()
}

impl StringSchema {
    #[must_use]
    pub fn validate(mut self, validator: impl StringValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl SchemaType for StringSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        match ty.kind() {
            Kind::String => Ok(()),
            _ => Err(wrong_kind("a string", ty)),
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
            return reject(scanner, kind, path, errors, messages::invalid_string(&found));
        }
        let Some(text) = unescape::unquote(token.bytes) else {
            errors.add(path, messages::MALFORMED_STRING);
            return Ok(());
        };
        if run_validators(&self.validators, path, errors, |v| v.validate_string(&text)) {
            *slot::<String>(dest, "a string", path)? = text.into_owned();
        }
        Ok(())
    }
}
