//! Tokenizer for CyBuf text.
//!
//! The lexer walks the input once and hands out [`Token`]s on demand. Whitespace
//! (space, tab, `\r`, `\n`) only separates tokens; there is no comma token.
//! Every failure carries the byte offset where it was detected.
//!
//! ```rust
//! use serde_cybuf::lexer::{Lexer, TokenKind};
//!
//! let kinds: Vec<_> = Lexer::new("{Age: 1}")
//!     .map(|t| t.unwrap().kind)
//!     .collect();
//! // `{`, `Age`, `:`, `1`, `}`, then end of input
//! assert_eq!(kinds.len(), 6);
//! assert!(matches!(kinds[1], TokenKind::Key("Age")));
//! assert!(matches!(kinds[5], TokenKind::Eof));
//! ```

use crate::error::{LexError, LexErrorKind};
use crate::Number;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind<'a> {
    /// A bareword that is not `true`, `false` or `nil`, or a run of digits
    /// too long for any number type. The parser accepts the latter only in
    /// key position.
    Key(&'a str),
    /// A quoted string with escapes already resolved.
    String(String),
    Number(Number),
    Bool(bool),
    Nil,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Eof,
}

impl fmt::Display for TokenKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Key(k) => write!(f, "key `{}`", k),
            TokenKind::String(_) => f.write_str("string"),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Bool(b) => write!(f, "`{}`", b),
            TokenKind::Nil => f.write_str("`nil`"),
            TokenKind::LeftBrace => f.write_str("`{`"),
            TokenKind::RightBrace => f.write_str("`}`"),
            TokenKind::LeftBracket => f.write_str("`[`"),
            TokenKind::RightBracket => f.write_str("`]`"),
            TokenKind::Colon => f.write_str("`:`"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// A token, its starting byte offset and the raw text it was scanned from.
#[derive(Clone, Debug, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub offset: usize,
    pub text: &'a str,
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    finished: bool,
}

#[inline]
fn is_bareword_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
fn is_bareword_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Returns `true` if `s` can be written as an object key without quotes.
pub(crate) fn is_bareword(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(&b) if is_bareword_start(b) => bytes.iter().all(|&b| is_bareword_byte(b)),
        Some(_) => is_digit_run(s),
        None => false,
    }
}

pub(crate) fn is_digit_run(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            finished: false,
        }
    }

    /// Current byte offset into the input.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek_byte() {
            self.position += 1;
        }
    }

    fn error(&self, kind: LexErrorKind, offset: usize) -> LexError {
        LexError::new(kind, offset)
    }

    /// Scans the next token. After the input is exhausted this keeps
    /// returning [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        self.skip_whitespace();
        let start = self.position;

        let Some(byte) = self.peek_byte() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                offset: start,
                text: "",
            });
        };

        let kind = match byte {
            b'{' => self.punct(TokenKind::LeftBrace),
            b'}' => self.punct(TokenKind::RightBrace),
            b'[' => self.punct(TokenKind::LeftBracket),
            b']' => self.punct(TokenKind::RightBracket),
            b':' => self.punct(TokenKind::Colon),
            b'"' => TokenKind::String(self.scan_string()?),
            b'-' | b'0'..=b'9' => self.scan_number()?,
            b if is_bareword_start(b) => self.scan_bareword(),
            _ => {
                // Report the whole character, not a stray UTF-8 byte.
                let ch = self.input[start..].chars().next().unwrap_or('\u{FFFD}');
                return Err(self.error(LexErrorKind::UnexpectedChar(ch), start));
            }
        };

        let input = self.input;
        Ok(Token {
            kind,
            offset: start,
            text: &input[start..self.position],
        })
    }

    fn punct(&mut self, kind: TokenKind<'a>) -> TokenKind<'a> {
        self.position += 1;
        kind
    }

    fn scan_bareword(&mut self) -> TokenKind<'a> {
        let input = self.input;
        let start = self.position;
        while self.peek_byte().is_some_and(is_bareword_byte) {
            self.position += 1;
        }
        match &input[start..self.position] {
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            "nil" => TokenKind::Nil,
            word => TokenKind::Key(word),
        }
    }

    fn scan_digits(&mut self) -> usize {
        let start = self.position;
        while self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
            self.position += 1;
        }
        self.position - start
    }

    fn scan_number(&mut self) -> Result<TokenKind<'a>, LexError> {
        let start = self.position;
        let malformed = |lexer: &Self| lexer.error(LexErrorKind::MalformedNumber, start);

        if self.peek_byte() == Some(b'-') {
            self.position += 1;
        }
        if self.scan_digits() == 0 {
            return Err(malformed(self));
        }

        let mut is_float = false;
        if self.peek_byte() == Some(b'.') {
            self.position += 1;
            if self.scan_digits() == 0 {
                return Err(malformed(self));
            }
            is_float = true;
        }
        if let Some(b'e' | b'E') = self.peek_byte() {
            self.position += 1;
            if let Some(b'+' | b'-') = self.peek_byte() {
                self.position += 1;
            }
            if self.scan_digits() == 0 {
                return Err(malformed(self));
            }
            is_float = true;
        }

        // `12abc`, `1.2.3` and friends are one malformed token, not two.
        if self
            .peek_byte()
            .is_some_and(|b| is_bareword_byte(b) || b == b'.' || b == b'-')
        {
            return Err(malformed(self));
        }

        let input = self.input;
        let literal = &input[start..self.position];
        if !is_float {
            if let Ok(i) = literal.parse::<i64>() {
                return Ok(TokenKind::Number(Number::Integer(i)));
            }
            if let Ok(u) = literal.parse::<u64>() {
                return Ok(TokenKind::Number(Number::Unsigned(u)));
            }
        }
        match literal.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(TokenKind::Number(Number::Float(f))),
            // Still a legal key; the range error is raised if it is used as a value.
            Ok(_) if is_digit_run(literal) => Ok(TokenKind::Key(literal)),
            Ok(_) => Err(self.error(LexErrorKind::NumberOutOfRange, start)),
            Err(_) => Err(malformed(self)),
        }
    }

    fn scan_string(&mut self) -> Result<String, LexError> {
        let open = self.position;
        self.position += 1;
        let mut result = String::new();

        loop {
            let rest = &self.input[self.position..];
            // Copy the plain run up to the next quote or backslash in one go.
            let run = rest
                .find(|c| c == '"' || c == '\\')
                .ok_or_else(|| self.error(LexErrorKind::UnterminatedString, open))?;
            result.push_str(&rest[..run]);
            self.position += run;

            if self.peek_byte() == Some(b'"') {
                self.position += 1;
                return Ok(result);
            }

            let escape_at = self.position;
            self.position += 1;
            let Some(ch) = self.input[self.position..].chars().next() else {
                return Err(self.error(LexErrorKind::UnterminatedString, open));
            };
            self.position += ch.len_utf8();
            match ch {
                '"' => result.push('"'),
                '\\' => result.push('\\'),
                '/' => result.push('/'),
                'n' => result.push('\n'),
                'r' => result.push('\r'),
                't' => result.push('\t'),
                'b' => result.push('\u{0008}'),
                'f' => result.push('\u{000C}'),
                '0' => result.push('\0'),
                'u' => result.push(self.scan_unicode_escape(escape_at)?),
                other => return Err(self.error(LexErrorKind::InvalidEscape(other), escape_at)),
            }
        }
    }

    fn scan_unicode_escape(&mut self, escape_at: usize) -> Result<char, LexError> {
        let invalid = || LexError::new(LexErrorKind::InvalidUnicodeEscape, escape_at);
        let hex = self.input.get(self.position..self.position + 4).ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let code = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        let ch = char::from_u32(code).ok_or_else(invalid)?;
        self.position += 4;
        Ok(ch)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    /// Yields tokens up to and including the first `Eof`, or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if matches!(token, Err(_) | Ok(Token { kind: TokenKind::Eof, .. })) {
            self.finished = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        Lexer::new(input).map(|t| t.unwrap().kind).collect()
    }

    fn lex_error(input: &str) -> LexError {
        Lexer::new(input)
            .find_map(|t| t.err())
            .expect("expected a lex error")
    }

    #[test]
    fn test_punctuation_and_keywords() {
        assert_eq!(
            kinds("{ a: [true false nil] }"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::Key("a"),
                TokenKind::Colon,
                TokenKind::LeftBracket,
                TokenKind::Bool(true),
                TokenKind::Bool(false),
                TokenKind::Nil,
                TokenKind::RightBracket,
                TokenKind::RightBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_a_key() {
        assert_eq!(
            kinds("nil_value truthy"),
            vec![
                TokenKind::Key("nil_value"),
                TokenKind::Key("truthy"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("0 -12 3.25 1e3 -2.5E-2 18446744073709551615"),
            vec![
                TokenKind::Number(Number::Integer(0)),
                TokenKind::Number(Number::Integer(-12)),
                TokenKind::Number(Number::Float(3.25)),
                TokenKind::Number(Number::Float(1000.0)),
                TokenKind::Number(Number::Float(-0.025)),
                TokenKind::Number(Number::Unsigned(u64::MAX)),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_huge_integer_degrades_to_float() {
        assert_eq!(
            kinds("100000000000000000000"),
            vec![TokenKind::Number(Number::Float(1e20)), TokenKind::Eof]
        );
    }

    #[test]
    fn test_digit_run_beyond_float_range_is_a_key() {
        let digits = "9".repeat(400);
        assert_eq!(kinds(&digits), vec![TokenKind::Key(digits.as_str()), TokenKind::Eof]);

        let negative = format!("-{}", digits);
        assert_eq!(lex_error(&negative).kind, LexErrorKind::NumberOutOfRange);
    }

    #[test]
    fn test_malformed_numbers() {
        for input in ["-", "1.", "1e", "1e+", "12abc", "1.2.3", "--1", "3-4"] {
            let err = lex_error(input);
            assert_eq!(err.kind, LexErrorKind::MalformedNumber, "input {:?}", input);
            assert_eq!(err.offset, 0);
        }
        assert_eq!(lex_error("1e999").kind, LexErrorKind::NumberOutOfRange);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\\c\n\té\/""#),
            vec![TokenKind::String("a\"b\\c\n\té/".to_string()), TokenKind::Eof]
        );
        assert_eq!(
            kinds("\"line one\nline two\""),
            vec![TokenKind::String("line one\nline two".to_string()), TokenKind::Eof]
        );
        assert_eq!(
            kinds("\"Wuhan 大学\""),
            vec![TokenKind::String("Wuhan 大学".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_errors() {
        let err = lex_error("  \"open");
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.offset, 2);

        assert_eq!(lex_error("\"trailing\\").kind, LexErrorKind::UnterminatedString);

        let err = lex_error(r#""bad \q escape""#);
        assert_eq!(err.kind, LexErrorKind::InvalidEscape('q'));
        assert_eq!(err.offset, 5);

        assert_eq!(lex_error(r#""\u12""#).kind, LexErrorKind::InvalidUnicodeEscape);
        assert_eq!(lex_error(r#""\ud800""#).kind, LexErrorKind::InvalidUnicodeEscape);
    }

    #[test]
    fn test_unexpected_characters() {
        let err = lex_error("{a: 1, b: 2}");
        assert_eq!(err.kind, LexErrorKind::UnexpectedChar(','));
        assert_eq!(err.offset, 5);

        assert_eq!(lex_error("é").kind, LexErrorKind::UnexpectedChar('é'));
    }

    #[test]
    fn test_token_text_and_offsets() {
        let tokens: Vec<_> = Lexer::new("{ Age:\t120 }").map(|t| t.unwrap()).collect();
        let age = &tokens[3];
        assert_eq!(age.offset, 7);
        assert_eq!(age.text, "120");
        assert_eq!(tokens.last().map(|t| t.offset), Some(12));
    }

    #[test]
    fn test_is_bareword() {
        assert!(is_bareword("Name"));
        assert!(is_bareword("_private9"));
        assert!(is_bareword("42"));
        assert!(!is_bareword(""));
        assert!(!is_bareword("first name"));
        assert!(!is_bareword("9lives"));
        assert!(!is_bareword("-1"));
    }
}
