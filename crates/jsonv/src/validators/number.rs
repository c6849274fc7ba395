//! Bounds and divisibility for numbers. Each validator is generic over its
//! limit so the same constructor serves integers (`max(10)`) and floats
//! (`max(0.5)`).

use super::{FloatValidator, IntegerValidator};
use crate::messages;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Max<N>(pub N);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusiveMax<N>(pub N);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Min<N>(pub N);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusiveMin<N>(pub N);

/// The value must divide evenly by the factor. A zero factor only accepts
/// zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultipleOf<N>(pub N);

/// Value must be `<= limit`.
pub fn max<N>(limit: N) -> Max<N> {
    Max(limit)
}

/// Value must be `< limit`.
pub fn exclusive_max<N>(limit: N) -> ExclusiveMax<N> {
    ExclusiveMax(limit)
}

/// Value must be `>= limit`.
pub fn min<N>(limit: N) -> Min<N> {
    Min(limit)
}

/// Value must be `> limit`.
pub fn exclusive_min<N>(limit: N) -> ExclusiveMin<N> {
    ExclusiveMin(limit)
}

pub fn multiple_of<N>(factor: N) -> MultipleOf<N> {
    MultipleOf(factor)
}

macro_rules! impl_bounds {
    ($validator:ident, $method:ident, $num:ty) => {
        impl $validator for Max<$num> {
            fn $method(&self, value: $num) -> Result<(), String> {
                if value > self.0 {
                    return Err(messages::max(self.0));
                }
                Ok(())
            }
        }

        impl $validator for ExclusiveMax<$num> {
            fn $method(&self, value: $num) -> Result<(), String> {
                if value >= self.0 {
                    return Err(messages::max_exclusive(self.0));
                }
                Ok(())
            }
        }

        impl $validator for Min<$num> {
            fn $method(&self, value: $num) -> Result<(), String> {
                if value < self.0 {
                    return Err(messages::min(self.0));
                }
                Ok(())
            }
        }

        impl $validator for ExclusiveMin<$num> {
            fn $method(&self, value: $num) -> Result<(), String> {
                if value <= self.0 {
                    return Err(messages::min_exclusive(self.0));
                }
                Ok(())
            }
        }
    };
}

impl_bounds!(IntegerValidator, validate_integer, i64);
impl_bounds!(FloatValidator, validate_float, f64);

impl IntegerValidator for MultipleOf<i64> {
    fn validate_integer(&self, value: i64) -> Result<(), String> {
        let divides = match self.0 {
            0 => value == 0,
            factor => value.checked_rem(factor).is_none_or(|r| r == 0),
        };
        if divides {
            Ok(())
        } else {
            Err(messages::multiple_of(self.0))
        }
    }
}

impl FloatValidator for MultipleOf<f64> {
    fn validate_float(&self, value: f64) -> Result<(), String> {
        let divides = if self.0 == 0.0 {
            value == 0.0
        } else {
            (value / self.0).fract() == 0.0
        };
        if divides {
            Ok(())
        } else {
            Err(messages::multiple_of(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(5, true)]
    #[case(6, false)]
    #[case(i64::MIN, true)]
    fn integer_max(#[case] value: i64, #[case] ok: bool) {
        assert_eq!(max(5).validate_integer(value).is_ok(), ok);
    }

    #[test]
    fn exclusive_bounds() {
        assert_eq!(
            exclusive_max(5).validate_integer(5),
            Err("Must be less than 5".to_string())
        );
        assert_eq!(
            exclusive_min(5).validate_integer(5),
            Err("Must be greater than 5".to_string())
        );
        assert!(min(5).validate_integer(5).is_ok());
        assert_eq!(
            min(5).validate_integer(4),
            Err("Must be greater than or equal to 5".to_string())
        );
    }

    #[test]
    fn float_bounds() {
        assert!(max(1.5).validate_float(1.5).is_ok());
        assert_eq!(
            max(1.5).validate_float(1.75),
            Err("Must be less than or equal to 1.5".to_string())
        );
        assert!(exclusive_min(0.0).validate_float(f64::MIN_POSITIVE).is_ok());
    }

    #[rstest]
    #[case(237_550_682, 2, true)]
    #[case(7, 2, false)]
    #[case(-9, 3, true)]
    #[case(i64::MIN, -1, true)]
    #[case(0, 0, true)]
    #[case(1, 0, false)]
    fn integer_multiple_of(#[case] value: i64, #[case] factor: i64, #[case] ok: bool) {
        assert_eq!(multiple_of(factor).validate_integer(value).is_ok(), ok);
    }

    #[test]
    fn float_multiple_of() {
        assert!(multiple_of(0.5).validate_float(2.5).is_ok());
        assert_eq!(
            multiple_of(2.0).validate_float(3.0),
            Err("Must be a multiple of 2".to_string())
        );
    }
}
