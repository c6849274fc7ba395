use super::{BytesValidator, SliceValidator, StringValidator};
use crate::messages;

/// Lower bound on length: characters for strings, bytes for byte sequences,
/// items for arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLen(pub usize);

/// Upper bound on length, counted like [`MinLen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLen(pub usize);

#[must_use]
pub fn min_len(len: usize) -> MinLen {
    MinLen(len)
}

#[must_use]
pub fn max_len(len: usize) -> MaxLen {
    MaxLen(len)
}

impl StringValidator for MinLen {
    fn validate_string(&self, value: &str) -> Result<(), String> {
        if value.chars().count() < self.0 {
            return Err(messages::min_len_str(self.0));
        }
        Ok(())
    }
}

impl StringValidator for MaxLen {
    fn validate_string(&self, value: &str) -> Result<(), String> {
        if value.chars().count() > self.0 {
            return Err(messages::max_len_str(self.0));
        }
        Ok(())
    }
}

impl BytesValidator for MinLen {
    fn validate_bytes(&self, value: &[u8]) -> Result<(), String> {
        if value.len() < self.0 {
            return Err(messages::min_len_bytes(self.0));
        }
        Ok(())
    }
}

impl BytesValidator for MaxLen {
    fn validate_bytes(&self, value: &[u8]) -> Result<(), String> {
        if value.len() > self.0 {
            return Err(messages::max_len_bytes(self.0));
        }
        Ok(())
    }
}

impl SliceValidator for MinLen {
    fn validate_len(&self, len: usize) -> Result<(), String> {
        if len < self.0 {
            return Err(messages::min_len_arr(self.0));
        }
        Ok(())
    }
}

impl SliceValidator for MaxLen {
    fn validate_len(&self, len: usize) -> Result<(), String> {
        if len > self.0 {
            return Err(messages::max_len_arr(self.0));
        }
        Ok(())
    }
}
