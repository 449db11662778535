//! # serde_cybuf
//!
//! A Serde-compatible serialization library for the CyBuf text format.
//!
//! ## What is CyBuf?
//!
//! CyBuf is a JSON-like text format with less punctuation: object keys are
//! unquoted barewords and entries are separated by whitespace instead of
//! commas.
//!
//! ```text
//! {
//!     Name: "Wuhan University"
//!     Age: 120
//!     Tags: ["old" "large"]
//!     Motto: nil
//! }
//! ```
//!
//! ## Grammar
//!
//! ```text
//! value   := object | array | string | number | "true" | "false" | "nil"
//! object  := "{" (key ":" value)* "}"
//! array   := "[" value* "]"
//! key     := [A-Za-z_][A-Za-z0-9_]* | [0-9]+
//! string  := '"' (char | escape)* '"'
//! escape  := \" \\ \/ \n \r \t \b \f \0 \uXXXX
//! number  := "-"? digits ("." digits)? ([eE] [+-]? digits)?
//! ```
//!
//! Spaces, tabs, carriage returns and newlines between tokens are all
//! equivalent. A document holds exactly one value.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_cybuf::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct School {
//!     Name: String,
//!     Age: u32,
//! }
//!
//! let school = School { Name: "Wuhan University".to_string(), Age: 120 };
//!
//! let text = to_string(&school).unwrap();
//! assert_eq!(text, "{Name: \"Wuhan University\" Age: 120}");
//!
//! let back: School = from_str(&text).unwrap();
//! assert_eq!(school, back);
//! ```
//!
//! ### Dynamic Values
//!
//! ```rust
//! use serde_cybuf::{cybuf, from_str, Value};
//!
//! let value: Value = from_str("{Name: \"cybuf\" Age: 1}").unwrap();
//! assert_eq!(value.as_object().and_then(|o| o.get("Age")).and_then(Value::as_i64), Some(1));
//!
//! let built = cybuf!({ Name: "cybuf", Age: 1 });
//! assert_eq!(value, built);
//! ```
//!
//! ## Pipeline
//!
//! Text goes through [`Lexer`] → [`Parser`] → [`Tree`]; a tree is rendered
//! back to text by [`Tree::render`]. Typed values reach a tree through the
//! [`ser::Serializer`] and leave one through the [`Deserializer`]. Every
//! stage reports failures as a distinct error variant, see [`Error`].
//!
//! ## Determinism
//!
//! Struct fields are written in declaration order. Map keys are sorted, so
//! a `HashMap` encodes to the same bytes on every run.
//!
//! ## Demos
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - encode and decode a nested struct
//! - **`dynamic_values.rs`** - working with [`Value`] and the `cybuf!` macro
//! - **`custom_options.rs`** - separators and indentation
//! - **`size_comparison.rs`** - CyBuf vs JSON output size
//!
//! Run any of them with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
pub mod ser;
pub mod tree;
pub mod value;
mod writer;

pub use de::Deserializer;
pub use error::{Error, LexError, LexErrorKind, ParseError, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use map::CybufMap;
pub use options::{CybufOptions, Indent, Separator};
pub use parser::{parse, Parser};
pub use ser::to_tree;
pub use tree::{Node, NodeId, Tree};
pub use value::{Number, Value, ValueKind};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io;

/// Serialize any `T: Serialize` to a compact CyBuf string.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: 2 }).unwrap(), "{x: 1 y: 2}");
/// ```
///
/// # Errors
///
/// Returns an error if the value has no CyBuf form (e.g. a NaN float or a map
/// keyed by something that is not a bareword) or nests too deeply.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &CybufOptions::default())
}

/// Serialize to compact CyBuf bytes.
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_string(value).map(String::into_bytes)
}

/// Serialize any `T: Serialize` to indented CyBuf text, one entry per line
/// with a tab per nesting level.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::to_string_indented;
///
/// assert_eq!(to_string_indented(&vec![1, 2]).unwrap(), "[\n\t1\n\t2\n]");
/// ```
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_indented<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &CybufOptions::indented())
}

/// Serialize to indented CyBuf bytes.
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_indented<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_string_indented(value).map(String::into_bytes)
}

/// Serialize any `T: Serialize` with explicit formatting options.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::{to_string_with_options, CybufOptions, Separator};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let options = CybufOptions::new().with_separator(Separator::Newline);
/// let text = to_string_with_options(&Point { x: 1, y: 2 }, &options).unwrap();
/// assert_eq!(text, "{x: 1\ny: 2}");
/// ```
///
/// # Errors
///
/// Same as [`to_string`]; the nesting limit comes from
/// [`CybufOptions::with_recursion_limit`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &CybufOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let tree = ser::build_tree(value, options.recursion_limit)?;
    let text = tree.render(options);
    tracing::trace!(nodes = tree.len(), bytes = text.len(), "encoded cybuf value");
    Ok(text)
}

/// Serialize to bytes with explicit formatting options.
///
/// # Errors
///
/// Same as [`to_string_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(value: &T, options: &CybufOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, options).map(String::into_bytes)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    let tree = to_tree(value)?;
    Ok(tree.to_value(tree.root()))
}

/// Serialize any `T: Serialize` to a writer as compact CyBuf.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![true, false]).unwrap();
/// assert_eq!(buffer, b"[true false]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &CybufOptions::default())
}

/// Serialize any `T: Serialize` to a writer with explicit formatting options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &CybufOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from CyBuf text.
///
/// The whole input is parsed before any decoding starts, so malformed text
/// always surfaces as [`Error::Parse`].
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{x: 1 y: 2}").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not a single well-formed CyBuf value or
/// cannot be decoded into `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let tree = parse(s)?;
    tracing::trace!(bytes = s.len(), nodes = tree.len(), "parsed cybuf input");
    from_tree(&tree)
}

/// Deserialize an instance of type `T` from an I/O stream of CyBuf text.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::from_reader;
/// use std::io::Cursor;
///
/// let numbers: Vec<u8> = from_reader(Cursor::new(b"[1 2 3]")).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid CyBuf, or the
/// data cannot be decoded into `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

/// Deserialize an instance of type `T` from bytes of CyBuf text.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::{from_slice, Error, LexErrorKind, ParseError};
///
/// let flag: bool = from_slice(b"true").unwrap();
/// assert!(flag);
///
/// let err = from_slice::<String>(b"\"ab\xff\"").unwrap_err();
/// assert!(matches!(
///     err.as_parse_error(),
///     Some(ParseError::Lex(e)) if e.kind == LexErrorKind::InvalidUtf8 && e.offset == 3
/// ));
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid CyBuf, or
/// cannot be decoded into `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v)
        .map_err(|e| LexError::new(LexErrorKind::InvalidUtf8, e.valid_up_to()))?;
    from_str(s)
}

/// Deserialize an instance of type `T` from an already parsed [`Tree`].
///
/// Unlike [`from_str`], the result may borrow strings from the tree.
///
/// # Errors
///
/// Returns an error if the tree cannot be decoded into `T`.
pub fn from_tree<'de, T>(tree: &'de Tree) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(Deserializer::new(tree))
}

/// Interpret a [`Value`] as an instance of type `T`.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::{cybuf, from_value};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_value(cybuf!({ x: 1, y: 2 })).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be decoded into `T`. Keys need not
/// be barewords here, since no text is produced.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    let tree = Tree::from_value(&value);
    from_tree(&tree)
}
