use std::any::Any;

use bstr::ByteSlice;

use super::{SchemaType, destination_error, reject, run_validators, token_text, wrong_kind};
use crate::{
    Path,
    error::{Fatal, PrepareError, ValidationErrors},
    messages,
    scanner::{NumberLexeme, Scanner, TokenKind},
    target::{Kind, TypeInfo},
    validators::IntegerValidator,
};

/// Decodes an integer into any primitive integer type.
///
/// The literal is parsed as an `i64` and validated before it is narrowed
/// into the destination; a value that does not fit is reported, never
/// truncated.
pub struct IntegerSchema {
    validators: Vec<Box<dyn IntegerValidator>>,
    target: &'static str,
}

#[must_use]
pub fn integer() -> IntegerSchema {
    IntegerSchema {
        validators: Vec::new(),
        target: "i64",
    }
}

impl IntegerSchema {
    #[must_use]
    pub fn validate(mut self, validator: impl IntegerValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

/// `None` if `dest` is not an integer, `Some(false)` if `value` does not fit.
fn store(dest: &mut dyn Any, value: i64) -> Option<bool> {
    macro_rules! try_store {
        ($($t:ty),*) => {
            $(
                if let Some(slot) = dest.downcast_mut::<$t>() {
                    return Some(<$t>::try_from(value).map(|v| *slot = v).is_ok());
                }
            )*
        };
    }
    try_store!(i64, i32, u32, u64, i16, u16, i8, u8, isize, usize);
    None
}

impl SchemaType for IntegerSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        match ty.kind() {
            Kind::Int { .. } => {
                self.target = ty.type_name();
                Ok(())
            }
            _ => Err(wrong_kind("an integer type", ty)),
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
            return reject(scanner, kind, path, errors, messages::invalid_int(&found));
        }
        let text = token.bytes.to_str_lossy();
        let value = match NumberLexeme::classify(&text) {
            NumberLexeme::Integer(digits) => match digits.parse::<i64>() {
                Ok(value) => value,
                Err(e) => {
                    errors.add(path, messages::parse_int(e));
                    return Ok(());
                }
            },
            NumberLexeme::Float(literal) => {
                errors.add(path, messages::invalid_int(literal));
                return Ok(());
            }
        };
        if !run_validators(&self.validators, path, errors, |v| v.validate_integer(value)) {
            return Ok(());
        }
        match store(dest, value) {
            Some(true) => {}
            Some(false) => errors.add(path, messages::out_of_range(value, self.target)),
            None => return Err(destination_error("an integer", path)),
        }
        Ok(())
    }
}
