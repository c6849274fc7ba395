//! Validator capabilities and the built-in validators.
//!
//! Each kind of decoded value has its own capability trait. Schema nodes hold
//! boxed capabilities and call them after a value decodes; a returned `Err`
//! is the message of a validation record at the value's path.
//!
//! Closures are validators too:
//!
//! ```
//! use jsonv::validators::StringValidator;
//!
//! let no_spaces = |s: &str| {
//!     if s.contains(' ') {
//!         Err("Must not contain spaces".to_string())
//!     } else {
//!         Ok(())
//!     }
//! };
//! assert!(no_spaces.validate_string("a b").is_err());
//! ```

mod date;
mod length;
mod number;
mod pattern;

use chrono::{DateTime, NaiveDate, Utc};

pub use self::{
    date::{NotAfter, NotBefore, not_after, not_before},
    length::{MaxLen, MinLen, max_len, min_len},
    number::{
        ExclusiveMax, ExclusiveMin, Max, Min, MultipleOf, exclusive_max, exclusive_min, max, min,
        multiple_of,
    },
    pattern::{Pattern, pattern, try_pattern},
};

pub trait StringValidator: Send + Sync {
    fn validate_string(&self, value: &str) -> Result<(), String>;
}

pub trait BytesValidator: Send + Sync {
    fn validate_bytes(&self, value: &[u8]) -> Result<(), String>;
}

pub trait IntegerValidator: Send + Sync {
    fn validate_integer(&self, value: i64) -> Result<(), String>;
}

pub trait FloatValidator: Send + Sync {
    fn validate_float(&self, value: f64) -> Result<(), String>;
}

/// Validates a decoded array by its number of items.
pub trait SliceValidator: Send + Sync {
    fn validate_len(&self, len: usize) -> Result<(), String>;
}

pub trait DateValidator: Send + Sync {
    fn validate_date(&self, value: &NaiveDate) -> Result<(), String>;
}

pub trait DateTimeValidator: Send + Sync {
    fn validate_datetime(&self, value: &DateTime<Utc>) -> Result<(), String>;
}

impl<F> StringValidator for F
where
    F: Fn(&str) -> Result<(), String> + Send + Sync,
{
    fn validate_string(&self, value: &str) -> Result<(), String> {
        self(value)
    }
}

impl<F> BytesValidator for F
where
    F: Fn(&[u8]) -> Result<(), String> + Send + Sync,
{
    fn validate_bytes(&self, value: &[u8]) -> Result<(), String> {
        self(value)
    }
}

impl<F> IntegerValidator for F
where
    F: Fn(i64) -> Result<(), String> + Send + Sync,
{
    fn validate_integer(&self, value: i64) -> Result<(), String> {
        self(value)
    }
}

impl<F> FloatValidator for F
where
    F: Fn(f64) -> Result<(), String> + Send + Sync,
{
    fn validate_float(&self, value: f64) -> Result<(), String> {
        self(value)
    }
}

impl<F> SliceValidator for F
where
    F: Fn(usize) -> Result<(), String> + Send + Sync,
{
    fn validate_len(&self, len: usize) -> Result<(), String> {
        self(len)
    }
}

impl<F> DateValidator for F
where
    F: Fn(&NaiveDate) -> Result<(), String> + Send + Sync,
{
    fn validate_date(&self, value: &NaiveDate) -> Result<(), String> {
        self(value)
    }
}

impl<F> DateTimeValidator for F
where
    F: Fn(&DateTime<Utc>) -> Result<(), String> + Send + Sync,
{
    fn validate_datetime(&self, value: &DateTime<Utc>) -> Result<(), String> {
        self(value)
    }
}
