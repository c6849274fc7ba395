//! Streaming JSON decoding with schema validation.
//!
//! A schema is a tree of nodes ([`object`], [`slice`], [`string`],
//! [`integer`], ...) built once and bound to a destination type by a
//! [`ValidatingParser`]. Parsing pulls tokens from any [`std::io::Read`]
//! source, writes decoded values straight into the destination and collects
//! every validation problem with its path instead of stopping at the first
//! one.
//!
//! Destination types describe themselves through [`Target`]; structs usually
//! do so with [`target_struct!`].

#![allow(missing_docs)]

mod buffer;
pub mod error;
pub mod messages;
mod options;
mod parser;
pub mod path;
pub mod scanner;
pub mod target;
pub mod types;
pub mod unescape;
pub mod validators;

#[cfg(test)]
mod tests;

pub use error::{Error, InvalidData, PrepareError, ValidationErrors};
pub use options::ParserOptions;
pub use parser::ValidatingParser;
pub use path::{Path, PathItem};
pub use target::{StructInfo, Target, TypeInfo, UnmarshalJson};
pub use types::{
    SchemaType, boolean, bytes, date, datetime, enumeration, float, integer, object, prop,
    raw_bytes, slice, string, unmarshaler,
};
