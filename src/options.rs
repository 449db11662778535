//! Configuration options for CyBuf serialization.
//!
//! - [`CybufOptions`]: the formatting configuration handed to every encode call
//! - [`Separator`]: the character placed between entries in compact output
//! - [`Indent`]: the per-level prefix of indented output
//!
//! There is no global formatting state; two threads encoding with different
//! options never affect each other.
//!
//! ## Examples
//!
//! ```rust
//! use serde_cybuf::{to_string_with_options, CybufOptions, Separator};
//!
//! let options = CybufOptions::new().with_separator(Separator::Tab);
//! let text = to_string_with_options(&vec![1, 2, 3], &options).unwrap();
//! assert_eq!(text, "[1\t2\t3]");
//! ```

use std::fmt;

/// Default nesting limit for both encoding and decoding.
pub const DEFAULT_RECURSION_LIMIT: usize = 128;

/// Separator between consecutive object entries or array elements in compact output.
///
/// Only whitespace is offered: the grammar has no comma token, so any other
/// separator would produce text the decoder cannot read back.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::Separator;
///
/// assert_eq!(Separator::Space.as_str(), " ");
/// assert_eq!(Separator::Tab.as_char(), '\t');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Space,
    Tab,
    Newline,
}

impl Separator {
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Separator::Space => ' ',
            Separator::Tab => '\t',
            Separator::Newline => '\n',
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Separator::Space => " ",
            Separator::Tab => "\t",
            Separator::Newline => "\n",
        }
    }
}

/// Per-level prefix for indented output.
///
/// Like [`Separator`], only whitespace can be expressed, so indented output
/// always parses back.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::Indent;
///
/// assert_eq!(Indent::Tabs(1).to_string(), "\t");
/// assert_eq!(Indent::Spaces(4).to_string(), "    ");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indent {
    Tabs(usize),
    Spaces(usize),
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Tabs(1)
    }
}

impl Indent {
    /// Appends `levels` copies of this indent to `out`.
    pub(crate) fn write_levels(&self, out: &mut String, levels: usize) {
        let (ch, width) = match *self {
            Indent::Tabs(n) => ('\t', n),
            Indent::Spaces(n) => (' ', n),
        };
        out.extend(std::iter::repeat(ch).take(width * levels));
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_levels(&mut out, 1);
        f.write_str(&out)
    }
}

/// Formatting configuration for CyBuf output.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::{CybufOptions, Indent, Separator};
///
/// // Compact, space separated
/// let options = CybufOptions::new();
/// assert!(!options.is_indented());
///
/// // One entry per line, tab indented
/// let options = CybufOptions::indented();
/// assert_eq!(options.indent, Some(Indent::Tabs(1)));
///
/// let options = CybufOptions::new()
///     .with_separator(Separator::Newline)
///     .with_recursion_limit(32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CybufOptions {
    pub separator: Separator,
    /// `None` renders compact output; `Some(indent)` puts every entry on its
    /// own line, prefixed by `indent` once per nesting level.
    pub indent: Option<Indent>,
    pub recursion_limit: usize,
}

impl Default for CybufOptions {
    fn default() -> Self {
        CybufOptions {
            separator: Separator::default(),
            indent: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl CybufOptions {
    /// Creates default options (compact, space separator).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for one-entry-per-line output indented with tabs.
    #[must_use]
    pub fn indented() -> Self {
        CybufOptions {
            indent: Some(Indent::default()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Switches to indented output using `indent` as the per-level prefix.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_cybuf::{to_string_with_options, CybufOptions, Indent};
    ///
    /// let options = CybufOptions::new().with_indent(Indent::Spaces(2));
    /// let text = to_string_with_options(&vec![1, 2], &options).unwrap();
    /// assert_eq!(text, "[\n  1\n  2\n]");
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = Some(indent);
        self
    }

    /// Sets how deep values may nest before encoding gives up with
    /// [`Error::CyclicValue`](crate::Error::CyclicValue).
    #[must_use]
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_indented(&self) -> bool {
        self.indent.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_str, parse, to_string, to_string_with_options, Value};

    #[test]
    fn test_indent_levels() {
        let mut out = String::new();
        Indent::Spaces(2).write_levels(&mut out, 3);
        assert_eq!(out, "      ");
        assert_eq!(Indent::Tabs(0).to_string(), "");
    }

    #[test]
    fn test_every_indent_parses_back() {
        let value: Value = from_str("{A: [1 {B: nil}] C: {} D: \"x\"}").unwrap();
        let compact = parse(&to_string(&value).unwrap()).unwrap();
        for indent in [
            Indent::Tabs(0),
            Indent::Tabs(1),
            Indent::Tabs(3),
            Indent::Spaces(1),
            Indent::Spaces(4),
        ] {
            let options = CybufOptions::new().with_indent(indent);
            let text = to_string_with_options(&value, &options).unwrap();
            assert_eq!(parse(&text).unwrap(), compact, "indent {:?}", indent);
        }
    }
}
