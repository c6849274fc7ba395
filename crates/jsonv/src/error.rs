use std::{fmt, io};

use thiserror::Error;

use crate::scanner::TokenKind;

/// Malformed JSON.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid character '{found}', expected {expected}")]
    InvalidCharacter { found: char, expected: &'static str },
    #[error("invalid literal, expected '{0}'")]
    InvalidLiteral(&'static str),
    #[error("invalid number: {0}")]
    InvalidNumber(&'static str),
    #[error("invalid object key")]
    InvalidKey,
    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken {
        found: TokenKind,
        expected: &'static str,
    },
    #[error("value nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("unexpected data after the root value")]
    TrailingData,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// Failure of a single scanner operation.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The input ended cleanly before the requested token.
    #[error("end of input")]
    EndOfInput,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

/// The destination handed to a node does not have the shape the node was
/// prepared for.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot assign {expected} to the destination at {path}")]
pub struct DestinationError {
    pub expected: &'static str,
    pub path: String,
}

/// An error that aborts a parse. Schema nodes return it from
/// [`SchemaType::parse`](crate::types::SchemaType::parse).
#[derive(Debug, Error)]
pub enum Fatal {
    #[error("end of input")]
    EndOfInput,
    #[error(transparent)]
    Io(io::Error),
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Destination(#[from] DestinationError),
}

impl From<ScanError> for Fatal {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::EndOfInput => Fatal::EndOfInput,
            ScanError::Io(e) => Fatal::Io(e),
            ScanError::Syntax(e) => Fatal::Syntax(e),
        }
    }
}

/// The schema cannot be bound to the destination type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error("want {expected} not {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },
    #[error("no field for props {props:?} on {ty}")]
    MissingFields { props: Vec<String>, ty: &'static str },
    #[error("default of type {default} for property `{prop}` does not match field type {field}")]
    DefaultTypeMismatch {
        prop: String,
        default: &'static str,
        field: &'static str,
    },
    #[error("allowed value of type {value} does not match destination type {field}")]
    EnumTypeMismatch {
        value: &'static str,
        field: &'static str,
    },
    #[error("{0} nests optional values more than one level deep")]
    NestedOptional(&'static str),
    #[error("{0} does not implement UnmarshalJson")]
    NotUnmarshaler(&'static str),
    #[error("property `{prop}`: {source}")]
    InProperty {
        prop: String,
        #[source]
        source: Box<PrepareError>,
    },
    #[error("slice element: {0}")]
    InElement(#[source] Box<PrepareError>),
}

/// One validation problem: where it happened and what is wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvalidData {
    pub path: String,
    pub message: String,
}

impl fmt::Display for InvalidData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered collection of validation records for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ValidationErrors(Vec<InvalidData>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record. The path is rendered only here, so callers can pass
    /// a lazily built [`Path`](crate::Path).
    pub fn add(&mut self, path: impl fmt::Display, message: impl Into<String>) {
        self.0.push(InvalidData {
            path: path.to_string(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InvalidData> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[InvalidData] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<InvalidData> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = InvalidData;
    type IntoIter = std::vec::IntoIter<InvalidData>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a InvalidData;
    type IntoIter = std::slice::Iter<'a, InvalidData>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of [`ValidatingParser::parse`](crate::ValidatingParser::parse)
/// when the document was not accepted.
#[derive(Debug, Error)]
pub enum Error {
    /// The document is well-formed JSON but breaks the schema.
    #[error("{0}")]
    Invalid(ValidationErrors),
    #[error("syntax error: {0}")]
    Syntax(SyntaxError),
    #[error(transparent)]
    Io(io::Error),
    #[error(transparent)]
    Destination(DestinationError),
}

impl Error {
    /// The validation records, if this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<Fatal> for Error {
    fn from(err: Fatal) -> Self {
        match err {
            Fatal::EndOfInput => Error::Syntax(SyntaxError::UnexpectedEndOfInput),
            Fatal::Io(e) => Error::Io(e),
            Fatal::Syntax(e) => Error::Syntax(e),
            Fatal::Destination(e) => Error::Destination(e),
        }
    }
}
