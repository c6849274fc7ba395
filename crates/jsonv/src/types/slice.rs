use std::{any::Any, sync::Arc};

use super::{SchemaType, destination_error, run_validators, wrong_kind};
use crate::{
    Path,
    error::{Fatal, PrepareError, SyntaxError, ValidationErrors},
    scanner::{Scanner, TokenKind},
    target::{Kind, SliceAccess, TypeInfo},
    validators::SliceValidator,
};

/// Decodes a JSON array into a `Vec<T>`, one element schema for all items.
///
/// The vector is cleared before decoding. Slice validators see the final
/// item count.
pub struct SliceSchema {
    element: Box<dyn SchemaType>,
    validators: Vec<Box<dyn SliceValidator>>,
    access: Option<Arc<dyn SliceAccess>>,
}

#[must_use]
pub fn slice(element: impl SchemaType + 'static) -> SliceSchema {
    SliceSchema {
        element: Box::new(element),
        validators: Vec::new(),
        access: None,
    }
}

impl SliceSchema {
    #[must_use]
    pub fn validate(mut self, validator: impl SliceValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl SchemaType for SliceSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        let Kind::Slice(info) = ty.kind() else {
            return Err(wrong_kind("a slice", ty));
        };
        self.element
            .prepare(&info.element())
            .map_err(|e| PrepareError::InElement(Box::new(e)))?;
        self.access = Some(info.access());
        Ok(())
    }

    fn parse(
        &self,
        path: &Path<'_>,
        scanner: &mut Scanner<'_>,
        dest: &mut dyn Any,
        errors: &mut ValidationErrors,
    ) -> Result<(), Fatal> {
        let Some(access) = &self.access else {
            return Err(destination_error("a prepared slice", path));
        };
        match scanner.read_token()?.kind {
            TokenKind::ArrayBegin => {}
            found => {
                return Err(SyntaxError::UnexpectedToken {
                    found,
                    expected: "'['",
                }
                .into());
            }
        }
        if !access.clear(dest) {
            return Err(destination_error("a slice", path));
        }

        if scanner.peek_token()? == TokenKind::ArrayEnd {
            scanner.read_token()?;
        } else {
            for index in 0.. {
                let element = access
                    .push_default(dest)
                    .ok_or_else(|| destination_error("a slice", path))?;
                self.element
                    .parse(&path.index(index), scanner, element, errors)?;
                match scanner.read_token()?.kind {
                    TokenKind::ItemSep => {}
                    TokenKind::ArrayEnd => break,
                    found => {
                        return Err(SyntaxError::UnexpectedToken {
                            found,
                            expected: "',' or ']'",
                        }
                        .into());
                    }
                }
            }
        }

        let len = access.len(dest).unwrap_or_default();
        run_validators(&self.validators, path, errors, |v| v.validate_len(len));
        Ok(())
    }
}
