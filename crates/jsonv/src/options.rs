/// Configuration options for the scanner and the validating parser.
///
/// Options are fixed when a [`ValidatingParser`](crate::ValidatingParser) is
/// built and apply to every document it parses.
///
/// # Default
///
/// See each field.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Number of bytes requested from the reader per refill.
    ///
    /// The scanner buffer starts at this size and grows to
    /// `2 * capacity + read_size` when a token does not fit.
    ///
    /// # Default
    ///
    /// `512`
    pub read_size: usize,

    /// Maximum nesting depth of values that are skipped or captured raw
    /// (unknown properties and unmarshaler input).
    ///
    /// Deeper input is rejected with a syntax error instead of recursing
    /// without bound.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,

    /// Whether non-whitespace input after the root value is tolerated.
    ///
    /// When `false`, anything but whitespace after the root value is a
    /// syntax error. When `true`, parsing stops after the root value and the
    /// remaining input is left unread.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_data: bool,
}

impl ParserOptions {
    pub(crate) const DEFAULT_READ_SIZE: usize = 512;
    pub(crate) const DEFAULT_MAX_DEPTH: usize = 128;
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            read_size: Self::DEFAULT_READ_SIZE,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            allow_trailing_data: false,
        }
    }
}
