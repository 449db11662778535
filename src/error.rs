//! Error types for CyBuf serialization and deserialization.
//!
//! Errors are layered the same way the pipeline is:
//!
//! - [`LexError`]: a byte sequence the lexer cannot turn into a token
//! - [`ParseError`]: a token sequence that is not a single well-formed value
//!   (wraps [`LexError`])
//! - [`Error`]: everything a caller of the crate can see, including decode-time
//!   [`Error::TypeMismatch`] / [`Error::Range`] and encode-time
//!   [`Error::UnsupportedType`] / [`Error::CyclicValue`]
//!
//! Positional errors carry a byte offset into the input; decode errors carry the
//! path of the offending field.
//!
//! ## Examples
//!
//! ```rust
//! use serde_cybuf::{from_str, Error, Value};
//!
//! let result: Result<Value, Error> = from_str("{Name: \"a\"");
//! assert!(matches!(result, Err(Error::Parse(_))));
//! ```

use crate::value::ValueKind;
use std::fmt;
use thiserror::Error;

/// What went wrong while scanning a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),

    #[error("invalid unicode escape (expected 4 hex digits naming a scalar value)")]
    InvalidUnicodeEscape,

    #[error("malformed number literal")]
    MalformedNumber,

    #[error("number literal is out of range")]
    NumberOutOfRange,

    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

/// A lexing failure at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
}

impl LexError {
    pub(crate) fn new(kind: LexErrorKind, offset: usize) -> Self {
        LexError { kind, offset }
    }
}

/// A failure to turn the token stream into exactly one value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {got} at byte {offset}")]
    UnexpectedToken {
        expected: &'static str,
        got: String,
        offset: usize,
    },

    #[error("object opened at byte {offset} is never closed")]
    UnterminatedObject { offset: usize },

    #[error("array opened at byte {offset} is never closed")]
    UnterminatedArray { offset: usize },

    #[error("unexpected trailing data at byte {offset}")]
    TrailingData { offset: usize },

    #[error("nesting deeper than {limit} levels at byte {offset}")]
    DepthLimitExceeded { limit: usize, offset: usize },
}

impl ParseError {
    /// Byte offset the error points at.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.offset,
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::UnterminatedObject { offset }
            | ParseError::UnterminatedArray { offset }
            | ParseError::TrailingData { offset }
            | ParseError::DepthLimitExceeded { offset, .. } => *offset,
        }
    }
}

/// Represents all possible errors that can occur during CyBuf serialization/deserialization.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The input text is not a well-formed CyBuf document.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The decoded value's kind does not fit the target type.
    #[error("type mismatch at `{field}`: expected {want}, found {got}")]
    TypeMismatch {
        field: String,
        want: &'static str,
        got: ValueKind,
    },

    /// A number does not fit the target type (fractional part or overflow).
    #[error("number out of range at `{field}`: {msg}")]
    Range { field: String, msg: String },

    /// The encoder was handed something with no CyBuf representation.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The value being encoded nests beyond the recursion limit, which is how
    /// self-referential structures show up.
    #[error("value nests deeper than {limit} levels (cyclic structure?)")]
    CyclicValue { limit: usize },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Raised through serde's `custom` hook (missing fields, unknown variants, ...).
    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub(crate) fn type_mismatch(field: impl fmt::Display, want: &'static str, got: ValueKind) -> Self {
        Error::TypeMismatch {
            field: field.to_string(),
            want,
            got,
        }
    }

    pub(crate) fn range(field: impl fmt::Display, msg: impl Into<String>) -> Self {
        Error::Range {
            field: field.to_string(),
            msg: msg.into(),
        }
    }

    /// Creates an unsupported type error for values that have no CyBuf form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_cybuf::Error;
    ///
    /// let err = Error::unsupported_type("non-finite float NaN");
    /// assert!(err.to_string().contains("NaN"));
    /// ```
    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        Error::UnsupportedType(msg.into())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the parse error if the input text itself was malformed.
    #[must_use]
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Parse(ParseError::Lex(err))
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display() {
        let err = LexError::new(LexErrorKind::UnexpectedChar(','), 7);
        assert_eq!(err.to_string(), "unexpected character ',' at byte 7");
    }

    #[test]
    fn test_parse_error_offset() {
        let err = ParseError::UnterminatedArray { offset: 3 };
        assert_eq!(err.offset(), 3);

        let err = ParseError::from(LexError::new(LexErrorKind::MalformedNumber, 11));
        assert_eq!(err.offset(), 11);
    }

    #[test]
    fn test_lex_error_surfaces_as_parse_error() {
        let err = Error::from(LexError::new(LexErrorKind::UnterminatedString, 0));
        assert!(matches!(
            err.as_parse_error(),
            Some(ParseError::Lex(LexError {
                kind: LexErrorKind::UnterminatedString,
                offset: 0
            }))
        ));
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = Error::type_mismatch("School.Age", "integer", ValueKind::String);
        assert_eq!(
            err.to_string(),
            "type mismatch at `School.Age`: expected integer, found string"
        );
    }
}
