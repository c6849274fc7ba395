//! Pull-based JSON tokenizer over any [`Read`] source.
//!
//! The scanner hands out one [`Token`] at a time. Token bytes borrow the
//! scanner's buffer, so a token is only usable until the next call on the
//! scanner; schema nodes copy what they keep.
//!
//! Input is read in chunks of [`ParserOptions::read_size`] bytes into a
//! compacting buffer. A token that straddles a chunk boundary simply causes
//! another read; nothing is re-scanned except the number state machine's
//! current position.

mod literal;
mod number;

use std::{fmt, io, io::Read};

use log::trace;

use self::literal::{ExpectedLiteral, Match};
use self::number::NumberState;
pub use self::number::NumberLexeme;
use crate::{
    buffer::ByteBuffer,
    error::{ScanError, SyntaxError},
    options::ParserOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    /// `,`
    ItemSep,
    /// `:`
    PropSep,
    String,
    Number,
    True,
    False,
    Null,
}

impl TokenKind {
    /// Classifies a token by its first byte.
    #[must_use]
    pub fn from_first_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'{' => Self::ObjectBegin,
            b'}' => Self::ObjectEnd,
            b'[' => Self::ArrayBegin,
            b']' => Self::ArrayEnd,
            b',' => Self::ItemSep,
            b':' => Self::PropSep,
            b'"' => Self::String,
            b'-' | b'0'..=b'9' => Self::Number,
            b't' => Self::True,
            b'f' => Self::False,
            b'n' => Self::Null,
            _ => return None,
        })
    }

    /// Whether the token is a complete value on its own.
    #[must_use]
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::String | Self::Number | Self::True | Self::False | Self::Null
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ObjectBegin => "{",
            Self::ObjectEnd => "}",
            Self::ArrayBegin => "[",
            Self::ArrayEnd => "]",
            Self::ItemSep => ",",
            Self::PropSep => ":",
            Self::String => "string",
            Self::Number => "number",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
        })
    }
}

/// One lexical unit. `bytes` is the exact source span; for strings it
/// includes the quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub bytes: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Open,
    Exhausted,
    Failed(io::ErrorKind),
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

pub struct Scanner<'r> {
    reader: Box<dyn Read + 'r>,
    buf: ByteBuffer,
    read_size: usize,
    max_depth: usize,
    consumed: usize,
    tokens: usize,
    source: Source,
}

impl fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("buffered", &self.buf.len())
            .field("consumed", &self.consumed)
            .field("tokens", &self.tokens)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<'r> Scanner<'r> {
    pub fn new<R: Read + 'r>(reader: R) -> Self {
        Self::with_options(reader, &ParserOptions::default())
    }

    pub fn with_options<R: Read + 'r>(reader: R, options: &ParserOptions) -> Self {
        let read_size = options.read_size.max(1);
        Self {
            reader: Box::new(reader),
            buf: ByteBuffer::with_capacity(read_size),
            read_size,
            max_depth: options.max_depth,
            consumed: 0,
            tokens: 0,
            source: Source::Open,
        }
    }

    /// Total bytes consumed, whitespace included.
    #[must_use]
    pub fn bytes_consumed(&self) -> usize {
        self.consumed
    }

    /// Number of tokens returned by [`read_token`](Self::read_token) so far.
    #[must_use]
    pub fn tokens_read(&self) -> usize {
        self.tokens
    }

    /// Pulls one more chunk. `Ok(false)` at end of input. An I/O failure is
    /// reported again on every later call.
    fn fill(&mut self) -> Result<bool, ScanError> {
        match self.source {
            Source::Exhausted => return Ok(false),
            Source::Failed(kind) => {
                return Err(io::Error::new(kind, "input stream failed earlier").into());
            }
            Source::Open => {}
        }
        match self.buf.fill_from(&mut *self.reader, self.read_size) {
            Ok(0) => {
                trace!("input exhausted after {} bytes", self.consumed + self.buf.len());
                self.source = Source::Exhausted;
                Ok(false)
            }
            Ok(n) => {
                trace!("read {n} bytes, {} buffered", self.buf.len());
                Ok(true)
            }
            Err(e) => {
                self.source = Source::Failed(e.kind());
                Err(e.into())
            }
        }
    }

    /// Makes at least `n` bytes available unless the input ends first.
    fn ensure(&mut self, n: usize) -> Result<bool, ScanError> {
        while self.buf.len() < n {
            if !self.fill()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn advance(&mut self, n: usize) {
        self.buf.consume(n);
        self.consumed += n;
    }

    /// Skips whitespace. `Ok(false)` if the input ends first.
    fn skip_whitespace(&mut self) -> Result<bool, ScanError> {
        loop {
            let unread = self.buf.unread();
            if let Some(n) = unread.iter().position(|&b| !is_space(b)) {
                self.advance(n);
                return Ok(true);
            }
            let n = unread.len();
            self.advance(n);
            if !self.fill()? {
                return Ok(false);
            }
        }
    }

    fn invalid_character(&self, expected: &'static str) -> ScanError {
        let (found, _) = bstr::decode_utf8(self.buf.unread());
        SyntaxError::InvalidCharacter {
            found: found.unwrap_or(char::REPLACEMENT_CHARACTER),
            expected,
        }
        .into()
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<TokenKind, ScanError> {
        if !self.skip_whitespace()? {
            return Err(ScanError::EndOfInput);
        }
        TokenKind::from_first_byte(self.buf.unread()[0])
            .ok_or_else(|| self.invalid_character("a JSON token"))
    }

    pub fn read_token(&mut self) -> Result<Token<'_>, ScanError> {
        let (kind, len) = self.scan_token()?;
        self.tokens += 1;
        self.consumed += len;
        let bytes = self.buf.take(len);
        trace!("token {kind} ({len} bytes)");
        Ok(Token { kind, bytes })
    }

    /// Locates the next token in the buffer: its kind and length.
    fn scan_token(&mut self) -> Result<(TokenKind, usize), ScanError> {
        let kind = self.peek_token()?;
        match kind {
            TokenKind::String => self.scan_string(),
            TokenKind::Number => self.scan_number(),
            TokenKind::True | TokenKind::False | TokenKind::Null => {
                match ExpectedLiteral::from_first(self.buf.unread()[0]) {
                    Some(literal) => self.scan_literal(literal),
                    None => Err(self.invalid_character("a literal")),
                }
            }
            _ => Ok((kind, 1)),
        }
    }

    fn scan_literal(&mut self, literal: ExpectedLiteral) -> Result<(TokenKind, usize), ScanError> {
        let len = literal.text().len();
        let complete = self.ensure(len)?;
        match literal.check(self.buf.unread()) {
            Match::Done => Ok((literal.token(), len)),
            Match::NeedMore if !complete => Err(ScanError::EndOfInput),
            _ => Err(SyntaxError::InvalidLiteral(literal.text()).into()),
        }
    }

    fn scan_string(&mut self) -> Result<(TokenKind, usize), ScanError> {
        // Resume position; may run one past the buffered end after a
        // trailing backslash.
        let mut offset = 1;
        loop {
            let unread = self.buf.unread();
            let mut i = offset;
            while i < unread.len() {
                match unread[i] {
                    b'"' => return Ok((TokenKind::String, i + 1)),
                    b'\\' => i += 2,
                    _ => i += 1,
                }
            }
            offset = i;
            if !self.fill()? {
                return Err(ScanError::EndOfInput);
            }
        }
    }

    fn scan_number(&mut self) -> Result<(TokenKind, usize), ScanError> {
        let Some(mut state) = NumberState::start(self.buf.unread()[0]) else {
            return Err(self.invalid_character("a number"));
        };
        let mut offset = 1;
        loop {
            if !self.ensure(offset + 1)? {
                state.finish().map_err(SyntaxError::InvalidNumber)?;
                return Ok((TokenKind::Number, offset));
            }
            match state.step(self.buf.unread()[offset]) {
                Ok(Some(next)) => {
                    state = next;
                    offset += 1;
                }
                Ok(None) => return Ok((TokenKind::Number, offset)),
                Err(msg) => return Err(SyntaxError::InvalidNumber(msg).into()),
            }
        }
    }

    /// Consumes one complete value and discards it.
    pub fn skip_value(&mut self) -> Result<(), ScanError> {
        self.walk_value(None, 0)
    }

    /// Consumes the rest of a value whose first token (`first`) was already
    /// read.
    pub fn skip_rest(&mut self, first: TokenKind) -> Result<(), ScanError> {
        self.walk_rest(first, None, 0)
    }

    /// Consumes one complete value and returns its tokens concatenated, with
    /// insignificant whitespace dropped.
    pub fn read_raw_value(&mut self) -> Result<Vec<u8>, ScanError> {
        let mut raw = Vec::new();
        self.walk_value(Some(&mut raw), 0)?;
        Ok(raw)
    }

    /// Checks that only whitespace remains.
    pub fn finish(&mut self) -> Result<(), ScanError> {
        if self.skip_whitespace()? {
            Err(SyntaxError::TrailingData.into())
        } else {
            Ok(())
        }
    }

    fn next_into(&mut self, sink: &mut Option<&mut Vec<u8>>) -> Result<TokenKind, ScanError> {
        let token = self.read_token()?;
        if let Some(out) = sink.as_deref_mut() {
            out.extend_from_slice(token.bytes);
        }
        Ok(token.kind)
    }

    fn walk_value(&mut self, mut sink: Option<&mut Vec<u8>>, depth: usize) -> Result<(), ScanError> {
        let first = self.next_into(&mut sink)?;
        self.walk_rest(first, sink, depth)
    }

    fn walk_rest(
        &mut self,
        first: TokenKind,
        mut sink: Option<&mut Vec<u8>>,
        depth: usize,
    ) -> Result<(), ScanError> {
        match first {
            kind if kind.is_scalar() => Ok(()),
            TokenKind::ObjectBegin => {
                if depth >= self.max_depth {
                    return Err(SyntaxError::TooDeep(self.max_depth).into());
                }
                loop {
                    match self.next_into(&mut sink)? {
                        TokenKind::ObjectEnd => return Ok(()),
                        TokenKind::String => {}
                        found => {
                            return Err(SyntaxError::UnexpectedToken {
                                found,
                                expected: "object key or '}'",
                            }
                            .into());
                        }
                    }
                    match self.next_into(&mut sink)? {
                        TokenKind::PropSep => {}
                        found => {
                            return Err(SyntaxError::UnexpectedToken { found, expected: "':'" }.into());
                        }
                    }
                    self.walk_value(sink.as_deref_mut(), depth + 1)?;
                    match self.next_into(&mut sink)? {
                        TokenKind::ItemSep => {}
                        TokenKind::ObjectEnd => return Ok(()),
                        found => {
                            return Err(SyntaxError::UnexpectedToken {
                                found,
                                expected: "',' or '}'",
                            }
                            .into());
                        }
                    }
                }
            }
            TokenKind::ArrayBegin => {
                if depth >= self.max_depth {
                    return Err(SyntaxError::TooDeep(self.max_depth).into());
                }
                if self.peek_token()? == TokenKind::ArrayEnd {
                    self.next_into(&mut sink)?;
                    return Ok(());
                }
                loop {
                    self.walk_value(sink.as_deref_mut(), depth + 1)?;
                    match self.next_into(&mut sink)? {
                        TokenKind::ItemSep => {}
                        TokenKind::ArrayEnd => return Ok(()),
                        found => {
                            return Err(SyntaxError::UnexpectedToken {
                                found,
                                expected: "',' or ']'",
                            }
                            .into());
                        }
                    }
                }
            }
            found => Err(SyntaxError::UnexpectedToken {
                found,
                expected: "a JSON value",
            }
            .into()),
        }
    }
}
