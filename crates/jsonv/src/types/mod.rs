//! Schema nodes.
//!
//! A schema is a tree of [`SchemaType`] nodes built once by the application,
//! bound to a destination type with [`SchemaType::prepare`] and then used for
//! any number of parses. Each node reads exactly one JSON value from the
//! scanner and writes it into the destination slot it is handed.
//!
//! Problems with the *content* of a value are pushed to the
//! [`ValidationErrors`] accumulator and parsing continues with the next
//! value. Only malformed JSON, I/O failures and destinations that do not
//! match the prepared type abort a parse.

mod boolean;
mod bytes;
mod date;
mod datetime;
mod enumeration;
mod float;
mod integer;
mod object;
mod slice;
mod string;
mod unmarshal;

use std::any::Any;

use bstr::ByteSlice;

pub use self::{
    boolean::{BooleanSchema, boolean},
    bytes::{BytesSchema, RawBytesSchema, bytes, raw_bytes},
    date::{DateSchema, date},
    datetime::{DateTimeSchema, datetime},
    enumeration::{EnumSchema, enumeration},
    float::{FloatSchema, float},
    integer::{IntegerSchema, integer},
    object::{ObjectSchema, Prop, object, prop},
    slice::{SliceSchema, slice},
    string::{StringSchema, string},
    unmarshal::{UnmarshalerSchema, unmarshaler},
};
use crate::{
    Path,
    error::{DestinationError, Fatal, PrepareError, ValidationErrors},
    scanner::{Scanner, TokenKind},
    target::TypeInfo,
};

/// A node of a validating schema.
pub trait SchemaType: Send + Sync {
    /// Binds the node to the destination type it will decode into.
    ///
    /// Called once, before any parse.
    ///
    /// # Errors
    ///
    /// Fails when the destination type cannot hold what the node decodes.
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError>;

    /// Decodes one value from `scanner` into `dest`.
    ///
    /// `dest` is the slot for this value and has the type passed to
    /// [`prepare`](Self::prepare). Validation problems are added to `errors`.
    ///
    /// # Errors
    ///
    /// Returns [`Fatal`] when parsing cannot continue.
    fn parse(
        &self,
        path: &Path<'_>,
        scanner: &mut Scanner<'_>,
        dest: &mut dyn Any,
        errors: &mut ValidationErrors,
    ) -> Result<(), Fatal>;
}

impl SchemaType for Box<dyn SchemaType> {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        (**self).prepare(ty)
    }

    fn parse(
        &self,
        path: &Path<'_>,
        scanner: &mut Scanner<'_>,
        dest: &mut dyn Any,
        errors: &mut ValidationErrors,
    ) -> Result<(), Fatal> {
        (**self).parse(path, scanner, dest, errors)
    }
}

pub(crate) fn destination_error(expected: &'static str, path: &Path<'_>) -> Fatal {
    DestinationError {
        expected,
        path: path.to_string(),
    }
    .into()
}

pub(crate) fn slot<'a, T: Any>(
    dest: &'a mut dyn Any,
    expected: &'static str,
    path: &Path<'_>,
) -> Result<&'a mut T, Fatal> {
    dest.downcast_mut::<T>()
        .ok_or_else(|| destination_error(expected, path))
}

pub(crate) fn wrong_kind(expected: &'static str, ty: &TypeInfo) -> PrepareError {
    PrepareError::WrongKind {
        expected,
        found: ty.type_name(),
    }
}

/// Source text of a token for messages.
pub(crate) fn token_text(bytes: &[u8]) -> String {
    bytes.to_str_lossy().into_owned()
}

/// Records `message` for a value of the wrong kind, then skips the rest of
/// that value so its siblings still decode.
pub(crate) fn reject(
    scanner: &mut Scanner<'_>,
    first: TokenKind,
    path: &Path<'_>,
    errors: &mut ValidationErrors,
    message: String,
) -> Result<(), Fatal> {
    errors.add(path, message);
    scanner.skip_rest(first)?;
    Ok(())
}

/// Runs every validator and records each failure. Returns whether all
/// passed.
pub(crate) fn run_validators<V: ?Sized>(
    validators: &[Box<V>],
    path: &Path<'_>,
    errors: &mut ValidationErrors,
    check: impl Fn(&V) -> Result<(), String>,
) -> bool {
    let mut passed = true;
    for validator in validators {
        if let Err(message) = check(&**validator) {
            errors.add(path, message);
            passed = false;
        }
    }
    passed
}
