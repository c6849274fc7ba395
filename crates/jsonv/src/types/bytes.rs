use std::any::{Any, TypeId};

use super::{SchemaType, reject, run_validators, slot, token_text, wrong_kind};
use crate::{
    Path,
    error::{Fatal, PrepareError, ValidationErrors},
    messages,
    scanner::{Scanner, TokenKind},
    target::TypeInfo,
    unescape,
    validators::BytesValidator,
};

fn expect_byte_vec(ty: &TypeInfo) -> Result<(), PrepareError> {
    if ty.type_id() == TypeId::of::<Vec<u8>>() {
        Ok(())
    } else {
        Err(wrong_kind("Vec<u8>", ty))
    }
}

/// Decodes a JSON string into its UTF-8 bytes, escapes expanded.
#[derive(Default)]
pub struct BytesSchema {
    validators: Vec<Box<dyn BytesValidator>>,
}

#[must_use]
pub fn bytes() -> BytesSchema {
    BytesSchema::default()
}

impl BytesSchema {
    #[must_use]
    pub fn validate(mut self, validator: impl BytesValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl SchemaType for BytesSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        expect_byte_vec(ty)
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
        let Some(value) = unescape::unquote_bytes(token.bytes) else {
            errors.add(path, messages::MALFORMED_STRING);
            return Ok(());
        };
        if run_validators(&self.validators, path, errors, |v| v.validate_bytes(&value)) {
            *slot::<Vec<u8>>(dest, "a byte vector", path)? = value.into_owned();
        }
        Ok(())
    }
}

/// Copies the bytes between the quotes of a JSON string verbatim, escapes
/// included.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawBytesSchema;

#[must_use]
pub fn raw_bytes() -> RawBytesSchema {
    RawBytesSchema
}

impl SchemaType for RawBytesSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        expect_byte_vec(ty)
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
        let raw = unescape::interior(token.bytes).unwrap_or_default().to_vec();
        *slot::<Vec<u8>>(dest, "a byte vector", path)? = raw;
        Ok(())
    }
}
