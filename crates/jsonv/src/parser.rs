use std::{any::type_name, fmt, io::Read, marker::PhantomData};

use log::debug;

use crate::{
    Path,
    error::{Error, Fatal, PrepareError, ValidationErrors},
    messages,
    options::ParserOptions,
    scanner::Scanner,
    target::Target,
    types::SchemaType,
};

/// A schema bound to the destination type `T`, ready to parse documents.
///
/// Building the parser prepares the schema once; afterwards the parser is
/// immutable and can be shared between threads, each call to
/// [`parse`](Self::parse) using its own scanner and error accumulator.
///
/// ```
/// use jsonv::{ValidatingParser, integer, object, prop, slice, string, validators::max};
///
/// #[derive(Default)]
/// struct Basic {
///     name: String,
///     age: i64,
///     friends: Vec<String>,
/// }
/// jsonv::target_struct!(Basic { name, age, friends });
///
/// let parser = ValidatingParser::<Basic>::new(object([
///     prop("name", string()),
///     prop("age", integer().validate(max(150))),
///     prop("friends", slice(string())),
/// ]));
///
/// let mut basic = Basic::default();
/// parser
///     .parse(r#"{"name": "Ada", "age": 36, "friends": ["Charles"]}"#.as_bytes(), &mut basic)
///     .unwrap();
/// assert_eq!(basic.friends, ["Charles"]);
///
/// let err = parser.parse(r#"{"name": "Ada", "age": 200}"#.as_bytes(), &mut basic).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "/age: Must be less than or equal to 150\n/friends: Is required"
/// );
/// ```
pub struct ValidatingParser<T> {
    schema: Box<dyn SchemaType>,
    options: ParserOptions,
    _target: PhantomData<fn(&mut T)>,
}

impl<T> fmt::Debug for ValidatingParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatingParser")
            .field("target", &type_name::<T>())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Target> ValidatingParser<T> {
    /// Prepares `schema` for `T`.
    ///
    /// # Panics
    ///
    /// Panics if the schema does not fit `T`. Use [`try_new`](Self::try_new)
    /// when the schema is not fixed at build time.
    #[must_use]
    pub fn new(schema: impl SchemaType + 'static) -> Self {
        match Self::try_new(schema) {
            Ok(parser) => parser,
            Err(e) => panic!("schema does not fit {}: {e}", type_name::<T>()),
        }
    }

    /// Prepares `schema` for `T`.
    ///
    /// # Errors
    ///
    /// Returns the first preparation failure.
    pub fn try_new(schema: impl SchemaType + 'static) -> Result<Self, PrepareError> {
        let mut schema: Box<dyn SchemaType> = Box::new(schema);
        let info = T::type_info();
        schema.prepare(&info)?;
        debug!("prepared schema for {}", info.type_name());
        Ok(Self {
            schema,
            options: ParserOptions::default(),
            _target: PhantomData,
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Decodes one JSON document from `reader` into `dest`, validating it on
    /// the way.
    ///
    /// On success `dest` is fully populated. On validation failure every
    /// problem found is reported and `dest` may be partially written.
    ///
    /// # Errors
    ///
    /// [`Error::Invalid`] with all validation records, or the fatal error
    /// that stopped the parse. Input that ends before any value is reported
    /// as a validation record at `/`.
    pub fn parse<R: Read>(&self, reader: R, dest: &mut T) -> Result<(), Error> {
        let mut scanner = Scanner::with_options(reader, &self.options);
        let mut errors = ValidationErrors::new();
        let outcome = self
            .schema
            .parse(&Path::Root, &mut scanner, dest, &mut errors)
            .and_then(|()| {
                if self.options.allow_trailing_data {
                    Ok(())
                } else {
                    scanner.finish().map_err(Fatal::from)
                }
            });
        debug!(
            "parsed {} bytes into {}: {} validation errors, fatal: {}",
            scanner.bytes_consumed(),
            type_name::<T>(),
            errors.len(),
            outcome.is_err()
        );
        match outcome {
            Ok(()) if errors.is_empty() => Ok(()),
            Ok(()) => Err(Error::Invalid(errors)),
            Err(Fatal::EndOfInput) if scanner.tokens_read() == 0 => {
                let mut errors = ValidationErrors::new();
                errors.add(Path::Root, messages::UNEXPECTED_END_OF_INPUT);
                Err(Error::Invalid(errors))
            }
            Err(fatal) => Err(fatal.into()),
        }
    }

    /// [`parse`](Self::parse) over an in-memory document.
    ///
    /// # Errors
    ///
    /// As for [`parse`](Self::parse).
    pub fn parse_slice(&self, input: &[u8], dest: &mut T) -> Result<(), Error> {
        self.parse(input, dest)
    }
}
