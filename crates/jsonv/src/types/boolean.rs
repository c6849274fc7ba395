use std::any::Any;

use super::{SchemaType, destination_error, reject, token_text, wrong_kind};
use crate::{
    Path,
    error::{Fatal, PrepareError, ValidationErrors},
    messages,
    scanner::{Scanner, TokenKind},
    target::{Kind, TypeInfo},
};

/// Decodes `true`/`false` into a `bool`, or its literal text into a `String`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanSchema;

#[must_use]
pub fn boolean() -> BooleanSchema {
    BooleanSchema
}

impl SchemaType for BooleanSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        match ty.kind() {
            Kind::Bool | Kind::String => Ok(()),
            _ => Err(wrong_kind("a bool or string", ty)),
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
        let value = match token.kind {
            TokenKind::True => true,
            TokenKind::False => false,
            kind => {
                let found = token_text(token.bytes);
                return reject(scanner, kind, path, errors, messages::invalid_bool(&found));
            }
        };
        if let Some(slot) = dest.downcast_mut::<bool>() {
            *slot = value;
        } else if let Some(slot) = dest.downcast_mut::<String>() {
            *slot = value.to_string();
        } else {
            return Err(destination_error("a boolean", path));
        }
        Ok(())
    }
}
