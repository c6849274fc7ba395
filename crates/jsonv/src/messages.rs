//! User-facing validation messages.
//!
//! Every message that ends up in an [`InvalidData`](crate::error::InvalidData)
//! record is produced here so the wording stays consistent across nodes and
//! validators.

use std::fmt::Display;

/// Recorded at `/` when the input ends before the first token.
pub const UNEXPECTED_END_OF_INPUT: &str = "Unexpected end of input";
/// Recorded for a required property that is absent from the object.
pub const REQUIRED: &str = "Is required";
/// Recorded for an explicit `null` on a non-optional destination.
pub const NOT_NULL: &str = "Must not be null";
/// Recorded for a string literal whose contents cannot be decoded.
pub const MALFORMED_STRING: &str = "Must be a valid string";

pub(crate) fn invalid_int(found: &str) -> String {
    format!("Must be an integer, got value {found}")
}

pub(crate) fn parse_int(err: impl Display) -> String {
    format!("Error parsing integer, {err}")
}

pub(crate) fn invalid_float(found: &str) -> String {
    format!("Must be a number, got value {found}")
}

pub(crate) fn out_of_range(value: impl Display, ty: &str) -> String {
    format!("Value {value} does not fit in {ty}")
}

pub(crate) fn invalid_bool(found: &str) -> String {
    format!("Must be a boolean, got value {found}")
}

pub(crate) fn invalid_string(found: &str) -> String {
    format!("Must be a string, got value {found}")
}

pub(crate) fn invalid_date(found: &str) -> String {
    format!("Must be a date in the format yyyy-mm-dd, got value {found}")
}

pub(crate) fn invalid_datetime(found: &str) -> String {
    format!("Must be a date-time in the format yyyy-mm-ddThh:mm:ss.fffZ, got value {found}")
}

pub(crate) fn one_of(allowed: &str) -> String {
    format!("Must be one of: {allowed}")
}

pub(crate) fn min_len_str(n: usize) -> String {
    format!("Must be at least {n} characters long")
}

pub(crate) fn max_len_str(n: usize) -> String {
    format!("Must be no more than {n} characters long")
}

pub(crate) fn min_len_bytes(n: usize) -> String {
    format!("Must be at least {n} bytes long")
}

pub(crate) fn max_len_bytes(n: usize) -> String {
    format!("Must be no more than {n} bytes long")
}

pub(crate) fn min_len_arr(n: usize) -> String {
    format!("Must contain at least {n} items")
}

pub(crate) fn max_len_arr(n: usize) -> String {
    format!("Must contain no more than {n} items")
}

pub(crate) fn pattern_match(pattern: &str) -> String {
    format!("Must match regex pattern {pattern}")
}

pub(crate) fn max_exclusive(limit: impl Display) -> String {
    format!("Must be less than {limit}")
}

pub(crate) fn max(limit: impl Display) -> String {
    format!("Must be less than or equal to {limit}")
}

pub(crate) fn min_exclusive(limit: impl Display) -> String {
    format!("Must be greater than {limit}")
}

pub(crate) fn min(limit: impl Display) -> String {
    format!("Must be greater than or equal to {limit}")
}

pub(crate) fn multiple_of(factor: impl Display) -> String {
    format!("Must be a multiple of {factor}")
}

pub(crate) fn not_before(limit: impl Display) -> String {
    format!("Must not be before {limit}")
}

pub(crate) fn not_after(limit: impl Display) -> String {
    format!("Must not be after {limit}")
}
