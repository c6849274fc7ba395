//! Number recognition.
//!
//! The scanner drives [`NumberState`] one byte at a time. A byte that cannot
//! extend the literal either ends it (`Ok(None)`) or is an error, depending on
//! whether the state is accepting. At end of input the scanner feeds a space
//! so a dangling `-`, `.`, `e` or sign is still reported.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberState {
    Minus,
    Zero,
    Integer,
    Point,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

impl NumberState {
    pub fn start(first: u8) -> Option<Self> {
        match first {
            b'-' => Some(Self::Minus),
            b'0' => Some(Self::Zero),
            b'1'..=b'9' => Some(Self::Integer),
            _ => None,
        }
    }

    pub fn step(self, b: u8) -> Result<Option<Self>, &'static str> {
        use NumberState::{
            Exponent, ExponentDigits, ExponentSign, Fraction, Integer, Minus, Point, Zero,
        };
        match (self, b) {
            (Minus, b'0') => Ok(Some(Zero)),
            (Minus, b'1'..=b'9') => Ok(Some(Integer)),
            (Minus, _) => Err("expected digit after '-'"),
            (Zero, b'0'..=b'9') => Err("leading zeros are not allowed"),
            (Zero | Integer, b'.') => Ok(Some(Point)),
            (Zero | Integer | Fraction, b'e' | b'E') => Ok(Some(Exponent)),
            (Integer, b'0'..=b'9') => Ok(Some(Integer)),
            (Point | Fraction, b'0'..=b'9') => Ok(Some(Fraction)),
            (Point, _) => Err("expected digit after decimal point"),
            (Exponent, b'+' | b'-') => Ok(Some(ExponentSign)),
            (Exponent | ExponentSign | ExponentDigits, b'0'..=b'9') => Ok(Some(ExponentDigits)),
            (Exponent, _) => Err("expected digit or sign after exponent"),
            (ExponentSign, _) => Err("expected digit after exponent sign"),
            (Zero | Integer | Fraction | ExponentDigits, _) => Ok(None),
        }
    }

    /// Resolves the literal at end of input.
    pub fn finish(self) -> Result<(), &'static str> {
        self.step(b' ').map(|_| ())
    }
}

/// Lexical hint so nodes can tell integers from floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberLexeme<'a> {
    Integer(&'a str), // no '.' and no exponent
    Float(&'a str),   // has '.' or exponent
}

impl<'a> NumberLexeme<'a> {
    #[must_use]
    pub fn classify(text: &'a str) -> Self {
        if text.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
            Self::Float(text)
        } else {
            Self::Integer(text)
        }
    }
}
