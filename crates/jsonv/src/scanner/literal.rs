use super::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExpectedLiteral {
    Null,
    True,
    False,
}

/// Outcome of comparing buffered input against a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Match {
    /// The whole literal is present.
    Done,
    /// The input so far is a proper prefix of the literal.
    NeedMore,
    /// The input diverges from the literal.
    Reject,
}

impl ExpectedLiteral {
    /// Picks the literal that starts with `first` (`n`, `t` or `f`).
    pub fn from_first(first: u8) -> Option<Self> {
        match first {
            b'n' => Some(Self::Null),
            b't' => Some(Self::True),
            b'f' => Some(Self::False),
            _ => None,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::True => "true",
            Self::False => "false",
        }
    }

    pub fn token(self) -> TokenKind {
        match self {
            Self::Null => TokenKind::Null,
            Self::True => TokenKind::True,
            Self::False => TokenKind::False,
        }
    }

    pub fn check(self, input: &[u8]) -> Match {
        let text = self.text().as_bytes();
        if input.len() >= text.len() {
            if &input[..text.len()] == text {
                Match::Done
            } else {
                Match::Reject
            }
        } else if text.starts_with(input) {
            Match::NeedMore
        } else {
            Match::Reject
        }
    }
}
