use std::any::Any;

use super::{SchemaType, destination_error};
use crate::{
    Path,
    error::{Fatal, PrepareError, ValidationErrors},
    scanner::Scanner,
    target::{TypeInfo, UnmarshalFn},
};

/// Hands the raw JSON value to the destination's
/// [`UnmarshalJson`](crate::target::UnmarshalJson) implementation.
#[derive(Default)]
pub struct UnmarshalerSchema {
    decode: Option<UnmarshalFn>,
}

#[must_use]
pub fn unmarshaler() -> UnmarshalerSchema {
    UnmarshalerSchema::default()
}

impl SchemaType for UnmarshalerSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        let decode = ty
            .unmarshal_fn()
            .ok_or(PrepareError::NotUnmarshaler(ty.type_name()))?;
        self.decode = Some(decode);
        Ok(())
    }

    fn parse(
        &self,
        path: &Path<'_>,
        scanner: &mut Scanner<'_>,
        dest: &mut dyn Any,
        errors: &mut ValidationErrors,
    ) -> Result<(), Fatal> {
        let Some(decode) = self.decode else {
            return Err(destination_error("a prepared unmarshaler", path));
        };
        let raw = scanner.read_raw_value()?;
        match decode(dest, &raw) {
            Some(Ok(())) => Ok(()),
            Some(Err(message)) => {
                errors.add(path, message);
                Ok(())
            }
            None => Err(destination_error("an unmarshaler", path)),
        }
    }
}
