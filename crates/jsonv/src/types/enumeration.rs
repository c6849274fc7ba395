use std::{
    any::{Any, TypeId, type_name},
    fmt::Display,
};

use super::{SchemaType, destination_error};
use crate::{
    Path,
    error::{Fatal, PrepareError, ValidationErrors},
    messages,
    scanner::Scanner,
    target::TypeInfo,
};

/// Restricts the value decoded by an inner schema to a fixed set.
///
/// The destination type must be exactly `T`.
pub struct EnumSchema<T> {
    inner: Box<dyn SchemaType>,
    allowed: Vec<T>,
    message: String,
}

/// Accepts only values equal to one of `allowed`, after `inner` decodes them
/// without errors.
pub fn enumeration<T, I>(inner: impl SchemaType + 'static, allowed: I) -> EnumSchema<T>
where
    T: PartialEq + Display + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
{
    let allowed: Vec<T> = allowed.into_iter().collect();
    let listed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
    EnumSchema {
        inner: Box::new(inner),
        message: messages::one_of(&listed.join(",")),
        allowed,
    }
}

impl<T> SchemaType for EnumSchema<T>
where
    T: PartialEq + Display + Send + Sync + 'static,
{
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        if ty.type_id() != TypeId::of::<T>() {
            return Err(PrepareError::EnumTypeMismatch {
                value: type_name::<T>(),
                field: ty.type_name(),
            });
        }
        self.inner.prepare(ty)
    }

    fn parse(
        &self,
        path: &Path<'_>,
        scanner: &mut Scanner<'_>,
        dest: &mut dyn Any,
        errors: &mut ValidationErrors,
    ) -> Result<(), Fatal> {
        let before = errors.len();
        self.inner.parse(path, scanner, dest, errors)?;
        if errors.len() > before {
            return Ok(());
        }
        let value = dest
            .downcast_ref::<T>()
            .ok_or_else(|| destination_error("an enumerated value", path))?;
        if !self.allowed.contains(value) {
            errors.add(path, self.message.clone());
        }
        Ok(())
    }
}
