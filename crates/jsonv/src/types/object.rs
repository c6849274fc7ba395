//! Struct destinations.
//!
//! An object is read as
//! `ExpectOpenBrace → { ExpectKeyOrClose → ExpectColon → ExpectValue →
//! ExpectCommaOrClose } → Done`. Keys are matched against the declared
//! properties exactly first and case-insensitively second; unknown keys are
//! skipped whatever their value. At `Done`, properties that never appeared
//! receive their default, are reported as required, or (for `Option`
//! fields) are reset to `None`.

use std::{
    any::{Any, TypeId, type_name},
    sync::Arc,
};

use log::{debug, trace};

use super::{SchemaType, destination_error, wrong_kind};
use crate::{
    Path,
    error::{Fatal, PrepareError, SyntaxError, ValidationErrors},
    messages,
    scanner::{Scanner, TokenKind},
    target::{Accessor, Kind, OptionAccess, ResolvedField, TypeInfo, resolve_fields},
    unescape,
};

/// A default value with its type erased.
trait DefaultValue: Send + Sync {
    fn value_type_id(&self) -> TypeId;
    fn value_type_name(&self) -> &'static str;
    fn assign(&self, dest: &mut dyn Any) -> bool;
}

struct DefaultOf<T>(T);

impl<T: Clone + Send + Sync + 'static> DefaultValue for DefaultOf<T> {
    fn value_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn assign(&self, dest: &mut dyn Any) -> bool {
        dest.downcast_mut::<T>()
            .map(|slot| *slot = self.0.clone())
            .is_some()
    }
}

struct Binding {
    access: Accessor,
    /// Set when the field is an `Option<T>`; the schema then decodes into
    /// the `T` inside.
    optional: Option<Arc<dyn OptionAccess>>,
}

/// A property of an [`ObjectSchema`]: the JSON key, the schema for its value
/// and an optional default.
pub struct Prop {
    name: String,
    schema: Box<dyn SchemaType>,
    default: Option<Box<dyn DefaultValue>>,
    binding: Option<Binding>,
}

/// Declares a property. It is required unless it has a default or its field
/// is an `Option`.
pub fn prop(name: impl Into<String>, schema: impl SchemaType + 'static) -> Prop {
    Prop {
        name: name.into(),
        schema: Box::new(schema),
        default: None,
        binding: None,
    }
}

impl Prop {
    /// Value assigned, without validation, when the key is absent. Its type
    /// must be the field's type (the `T` of an `Option<T>` field).
    #[must_use]
    pub fn with_default<D: Clone + Send + Sync + 'static>(mut self, default: D) -> Self {
        self.default = Some(Box::new(DefaultOf(default)));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn bind(&mut self, field: &ResolvedField) -> Result<(), PrepareError> {
        let (target, optional) = match field.ty.kind() {
            Kind::Optional(info) => {
                let inner = info.inner();
                if let Kind::Optional(_) = inner.kind() {
                    return Err(PrepareError::NestedOptional(field.ty.type_name()));
                }
                (inner, Some(info.access()))
            }
            _ => (field.ty.clone(), None),
        };
        if let Some(default) = &self.default {
            if default.value_type_id() != target.type_id() {
                return Err(PrepareError::DefaultTypeMismatch {
                    prop: self.name.clone(),
                    default: default.value_type_name(),
                    field: target.type_name(),
                });
            }
        }
        self.schema
            .prepare(&target)
            .map_err(|e| PrepareError::InProperty {
                prop: self.name.clone(),
                source: Box::new(e),
            })?;
        self.binding = Some(Binding {
            access: Arc::clone(&field.access),
            optional,
        });
        Ok(())
    }

    fn binding(&self, path: &Path<'_>) -> Result<&Binding, Fatal> {
        self.binding
            .as_ref()
            .ok_or_else(|| destination_error("a prepared property", path))
    }

    fn parse_value(
        &self,
        path: &Path<'_>,
        scanner: &mut Scanner<'_>,
        dest: &mut dyn Any,
        errors: &mut ValidationErrors,
    ) -> Result<(), Fatal> {
        let binding = self.binding(path)?;
        let field = (binding.access)(dest).ok_or_else(|| destination_error("a struct", path))?;
        let is_null = scanner.peek_token()? == TokenKind::Null;
        match &binding.optional {
            Some(optional) if is_null => {
                scanner.read_token()?;
                optional.clear(field);
                Ok(())
            }
            Some(optional) => {
                let inner = optional
                    .get_or_insert(field)
                    .ok_or_else(|| destination_error("an optional field", path))?;
                self.schema.parse(path, scanner, inner, errors)
            }
            None if is_null => {
                scanner.read_token()?;
                errors.add(path, messages::NOT_NULL);
                Ok(())
            }
            None => self.schema.parse(path, scanner, field, errors),
        }
    }

    /// Handles a property whose key never appeared.
    fn finish_absent(
        &self,
        path: &Path<'_>,
        dest: &mut dyn Any,
        errors: &mut ValidationErrors,
    ) -> Result<(), Fatal> {
        let binding = self.binding(path)?;
        match (&self.default, &binding.optional) {
            (Some(default), optional) => {
                let field =
                    (binding.access)(dest).ok_or_else(|| destination_error("a struct", path))?;
                let slot = match optional {
                    Some(optional) => optional
                        .get_or_insert(field)
                        .ok_or_else(|| destination_error("an optional field", path))?,
                    None => field,
                };
                if !default.assign(slot) {
                    return Err(destination_error("a default value", path));
                }
            }
            (None, Some(optional)) => {
                let field =
                    (binding.access)(dest).ok_or_else(|| destination_error("a struct", path))?;
                optional.clear(field);
            }
            (None, None) => errors.add(path.key(&self.name), messages::REQUIRED),
        }
        Ok(())
    }
}

fn fold_eq(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        a.eq_ignore_ascii_case(b)
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

/// Decodes a JSON object into a struct, property by property.
pub struct ObjectSchema {
    props: Vec<Prop>,
    target: Option<TypeId>,
}

pub fn object(props: impl IntoIterator<Item = Prop>) -> ObjectSchema {
    ObjectSchema {
        props: props.into_iter().collect(),
        target: None,
    }
}

impl ObjectSchema {
    fn lookup(&self, key: &str) -> Option<usize> {
        self.props
            .iter()
            .position(|p| p.name == key)
            .or_else(|| self.props.iter().position(|p| fold_eq(&p.name, key)))
    }
}

fn expect(scanner: &mut Scanner<'_>, kind: TokenKind, expected: &'static str) -> Result<(), Fatal> {
    match scanner.read_token()?.kind {
        found if found == kind => Ok(()),
        found => Err(SyntaxError::UnexpectedToken { found, expected }.into()),
    }
}

impl SchemaType for ObjectSchema {
    fn prepare(&mut self, ty: &TypeInfo) -> Result<(), PrepareError> {
        let Kind::Struct(info) = ty.kind() else {
            return Err(wrong_kind("a struct", ty));
        };
        let fields = resolve_fields(ty.type_id(), info);
        let mut missing = Vec::new();
        for prop in &mut self.props {
            let field = fields
                .iter()
                .find(|f| f.name == prop.name)
                .or_else(|| fields.iter().find(|f| fold_eq(f.name, &prop.name)));
            match field {
                Some(field) => prop.bind(field)?,
                None => missing.push(prop.name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(PrepareError::MissingFields {
                props: missing,
                ty: ty.type_name(),
            });
        }
        self.target = Some(ty.type_id());
        debug!(
            "bound {} properties to {} ({} fields)",
            self.props.len(),
            ty.type_name(),
            fields.len()
        );
        Ok(())
    }

    fn parse(
        &self,
        path: &Path<'_>,
        scanner: &mut Scanner<'_>,
        dest: &mut dyn Any,
        errors: &mut ValidationErrors,
    ) -> Result<(), Fatal> {
        match self.target {
            Some(type_id) if (*dest).type_id() == type_id => {}
            _ => return Err(destination_error("a struct", path)),
        }
        expect(scanner, TokenKind::ObjectBegin, "'{'")?;

        let mut seen = vec![false; self.props.len()];
        loop {
            let key = {
                let token = scanner.read_token()?;
                match token.kind {
                    // Also accepts a trailing comma before `}`.
                    TokenKind::ObjectEnd => break,
                    TokenKind::String => unescape::unquote(token.bytes)
                        .ok_or(SyntaxError::InvalidKey)?
                        .into_owned(),
                    found => {
                        return Err(SyntaxError::UnexpectedToken {
                            found,
                            expected: "object key or '}'",
                        }
                        .into());
                    }
                }
            };
            expect(scanner, TokenKind::PropSep, "':'")?;

            if let Some(index) = self.lookup(&key) {
                self.props[index].parse_value(&path.key(&key), scanner, dest, errors)?;
                seen[index] = true;
            } else {
                trace!("skipping unknown property {key:?} at {path}");
                scanner.skip_value()?;
            }

            match scanner.read_token()?.kind {
                TokenKind::ItemSep => {}
                TokenKind::ObjectEnd => break,
                found => {
                    return Err(SyntaxError::UnexpectedToken {
                        found,
                        expected: "',' or '}'",
                    }
                    .into());
                }
            }
        }

        for (prop, seen) in self.props.iter().zip(seen) {
            if !seen {
                prop.finish_absent(path, dest, errors)?;
            }
        }
        Ok(())
    }
}
