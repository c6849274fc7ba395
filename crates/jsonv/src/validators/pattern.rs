use regex::Regex;

use super::StringValidator;
use crate::messages;

/// Requires a match of a regular expression somewhere in the string.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    message: Option<String>,
}

impl Pattern {
    /// Replaces the default `Must match regex pattern ...` message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Compiles `re` into a [`Pattern`] validator.
///
/// # Errors
///
/// Returns the regex compilation error.
pub fn try_pattern(re: &str) -> Result<Pattern, regex::Error> {
    Ok(Pattern {
        regex: Regex::new(re)?,
        message: None,
    })
}

/// Compiles `re` into a [`Pattern`] validator, for patterns fixed at build
/// time.
///
/// # Panics
///
/// Panics if `re` is not a valid regular expression.
#[must_use]
pub fn pattern(re: &str) -> Pattern {
    match try_pattern(re) {
        Ok(p) => p,
        Err(e) => panic!("invalid pattern {re:?}: {e}"),
    }
}

impl StringValidator for Pattern {
    fn validate_string(&self, value: &str) -> Result<(), String> {
        if self.regex.is_match(value) {
            return Ok(());
        }
        Err(self
            .message
            .clone()
            .unwrap_or_else(|| messages::pattern_match(self.regex.as_str())))
    }
}
