use std::any::Any;

use bstr::ByteSlice;

use super::{SchemaType, destination_error, reject, run_validators, token_text, wrong_kind};
use crate::{
    Path,
    error::{Fatal, PrepareError, ValidationErrors},
    messages,
    scanner::{Scanner, TokenKind},
    target::{Kind, TypeInfo},
    validators::FloatValidator,
};

/// Decodes any JSON number into `f32` or `f64`.
pub struct FloatSchema {
    validators: Vec<Box<dyn FloatValidator>>,
    target: &'static str,
}

#[must_use]
pub fn float() -> FloatSchema {
    FloatSchema {
        validators: Vec::new(),
        target: "f64",
    }
}

impl FloatSchema {
    #[must_use]
    pub fn validate(mut self, validator: impl FloatValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

#[allow(clippy::cast_possible_truncation)]
fn store(dest: &mut dyn Any, value: f64) -> Option<bool> {
    if let Some(slot) = dest.downcast_mut::<f64>() {
        *slot = value;
        return Some(true);
    }
    let slot = dest.downcast_mut::<f32>()?;
    let narrowed = value as f32;
    if narrowed.is_finite() {
        *slot = narrowed;
        Some(true)
    } else {
        Some(false)
    }
}

impl SchemaType for FloatSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        match ty.kind() {
            Kind::Float { .. } => {
                self.target = ty.type_name();
                Ok(())
            }
            _ => Err(wrong_kind("a float type", ty)),
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
        if token.kind != TokenKind::Number {
            let (kind, found) = (token.kind, token_text(token.bytes));
            return reject(scanner, kind, path, errors, messages::invalid_float(&found));
        }
        let text = token.bytes.to_str_lossy();
        let value = match text.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                errors.add(path, messages::out_of_range(&text, self.target));
                return Ok(());
            }
        };
        if !run_validators(&self.validators, path, errors, |v| v.validate_float(value)) {
            return Ok(());
        }
        match store(dest, value) {
            Some(true) => {}
            Some(false) => errors.add(path, messages::out_of_range(value, self.target)),
            None => return Err(destination_error("a float", path)),
        }
        Ok(())
    }
}
