//! Builds a [`Tree`] from CyBuf text.
//!
//! The parser is a small state machine driven by the token stream:
//!
//! | state                        | accepts                         |
//! |------------------------------|---------------------------------|
//! | `ExpectValue`                | `{`, `[`, or a scalar           |
//! | `InObjectExpectKeyOrClose`   | `key :` (then a value) or `}`   |
//! | `InArrayExpectValueOrClose`  | a value or `]`                  |
//! | `Closed`                     | end of input only               |
//!
//! Open containers sit on an explicit frame stack instead of the call stack,
//! so deeply nested input fails with [`ParseError::DepthLimitExceeded`]
//! rather than overflowing.

use crate::error::{LexError, LexErrorKind, ParseError};
use crate::lexer::{is_digit_run, Lexer, Token, TokenKind};
use crate::options::DEFAULT_RECURSION_LIMIT;
use crate::tree::{Arena, Node, NodeId, Tree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    ExpectValue,
    InObjectExpectKeyOrClose,
    InArrayExpectValueOrClose,
    Closed,
}

enum Frame {
    Object {
        open: usize,
        entries: Vec<(String, NodeId)>,
        pending_key: Option<String>,
    },
    Array {
        open: usize,
        items: Vec<NodeId>,
    },
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
    arena: Arena,
    stack: Vec<Frame>,
    state: State,
    root: Option<NodeId>,
    depth_limit: usize,
}

/// Parses exactly one value from `input`.
///
/// # Examples
///
/// ```rust
/// use serde_cybuf::{parse, Node};
///
/// let tree = parse("[1 2 3]").unwrap();
/// assert!(matches!(tree.node(tree.root()), Node::Array(items) if items.len() == 3));
///
/// assert!(parse("[1 2").is_err());
/// assert!(parse("1 2").is_err());
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] for any lexical or structural problem, including
/// trailing data after the top-level value.
pub fn parse(input: &str) -> Result<Tree, ParseError> {
    Parser::new(input).parse().map_err(|err| {
        tracing::debug!(%err, "cybuf parse failed");
        err
    })
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            peeked: None,
            arena: Arena::new(),
            stack: Vec::new(),
            state: State::ExpectValue,
            root: None,
            depth_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Caps how many containers may be open at once.
    #[must_use]
    pub fn with_depth_limit(mut self, limit: usize) -> Self {
        self.depth_limit = limit;
        self
    }

    fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => Ok(self.lexer.next_token()?),
        }
    }

    fn peek_token(&mut self) -> Result<&Token<'a>, ParseError> {
        let token = self.next_token()?;
        Ok(self.peeked.insert(token))
    }

    /// Runs the state machine to completion.
    pub fn parse(mut self) -> Result<Tree, ParseError> {
        loop {
            match self.state {
                State::ExpectValue => self.expect_value()?,
                State::InObjectExpectKeyOrClose => self.in_object()?,
                State::InArrayExpectValueOrClose => self.in_array()?,
                State::Closed => break,
            }
        }

        let trailing = self.next_token()?;
        if trailing.kind != TokenKind::Eof {
            return Err(ParseError::TrailingData {
                offset: trailing.offset,
            });
        }

        match self.root {
            Some(root) => Ok(self.arena.finish(root)),
            None => Err(ParseError::UnexpectedToken {
                expected: "a value",
                got: TokenKind::Eof.to_string(),
                offset: trailing.offset,
            }),
        }
    }

    fn expect_value(&mut self) -> Result<(), ParseError> {
        let token = self.next_token()?;
        let node = match token.kind {
            TokenKind::LeftBrace => {
                self.open(
                    Frame::Object {
                        open: token.offset,
                        entries: Vec::new(),
                        pending_key: None,
                    },
                    token.offset,
                )?;
                self.state = State::InObjectExpectKeyOrClose;
                return Ok(());
            }
            TokenKind::LeftBracket => {
                self.open(
                    Frame::Array {
                        open: token.offset,
                        items: Vec::new(),
                    },
                    token.offset,
                )?;
                self.state = State::InArrayExpectValueOrClose;
                return Ok(());
            }
            TokenKind::String(s) => Node::String(s),
            TokenKind::Number(n) => Node::Number(n),
            TokenKind::Bool(b) => Node::Bool(b),
            TokenKind::Nil => Node::Nil,
            TokenKind::Key(k) if is_digit_run(k) => {
                return Err(LexError::new(LexErrorKind::NumberOutOfRange, token.offset).into())
            }
            TokenKind::Eof => return Err(self.unterminated(token.offset)),
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a value",
                    got: other.to_string(),
                    offset: token.offset,
                })
            }
        };
        let id = self.arena.push(node);
        self.complete(id);
        Ok(())
    }

    fn in_object(&mut self) -> Result<(), ParseError> {
        let token = self.next_token()?;
        let key = match token.kind {
            TokenKind::RightBrace => {
                let Some(Frame::Object { entries, .. }) = self.stack.pop() else {
                    unreachable!("object state without an object frame");
                };
                let id = self.arena.push(Node::Object(entries));
                self.complete(id);
                return Ok(());
            }
            TokenKind::Key(k) => k.to_string(),
            // Keywords and plain digit runs are still valid key spellings.
            TokenKind::Bool(_) | TokenKind::Nil => token.text.to_string(),
            TokenKind::Number(_) if is_digit_run(token.text) => {
                token.text.to_string()
            }
            TokenKind::Eof => return Err(self.unterminated(token.offset)),
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a key or `}`",
                    got: other.to_string(),
                    offset: token.offset,
                })
            }
        };

        let colon = self.next_token()?;
        match colon.kind {
            TokenKind::Colon => {}
            TokenKind::Eof => return Err(self.unterminated(colon.offset)),
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "`:`",
                    got: other.to_string(),
                    offset: colon.offset,
                })
            }
        }

        if let Some(Frame::Object { pending_key, .. }) = self.stack.last_mut() {
            *pending_key = Some(key);
        }
        self.state = State::ExpectValue;
        Ok(())
    }

    fn in_array(&mut self) -> Result<(), ParseError> {
        let token = self.peek_token()?;
        let offset = token.offset;
        match token.kind {
            TokenKind::RightBracket => {
                self.peeked = None;
                let Some(Frame::Array { items, .. }) = self.stack.pop() else {
                    unreachable!("array state without an array frame");
                };
                let id = self.arena.push(Node::Array(items));
                self.complete(id);
            }
            TokenKind::Eof => return Err(self.unterminated(offset)),
            _ => self.state = State::ExpectValue,
        }
        Ok(())
    }

    fn open(&mut self, frame: Frame, offset: usize) -> Result<(), ParseError> {
        if self.stack.len() >= self.depth_limit {
            return Err(ParseError::DepthLimitExceeded {
                limit: self.depth_limit,
                offset,
            });
        }
        self.stack.push(frame);
        Ok(())
    }

    /// Attaches a finished node to the innermost open container, or makes it
    /// the root when nothing is open.
    fn complete(&mut self, id: NodeId) {
        self.state = match self.stack.last_mut() {
            None => {
                self.root = Some(id);
                State::Closed
            }
            Some(Frame::Object {
                entries,
                pending_key,
                ..
            }) => {
                if let Some(key) = pending_key.take() {
                    entries.push((key, id));
                }
                State::InObjectExpectKeyOrClose
            }
            Some(Frame::Array { items, .. }) => {
                items.push(id);
                State::InArrayExpectValueOrClose
            }
        };
    }

    /// The error for running out of input, naming the innermost open container.
    fn unterminated(&self, offset: usize) -> ParseError {
        match self.stack.last() {
            Some(Frame::Object { open, .. }) => ParseError::UnterminatedObject { offset: *open },
            Some(Frame::Array { open, .. }) => ParseError::UnterminatedArray { offset: *open },
            None => ParseError::UnexpectedToken {
                expected: "a value",
                got: TokenKind::Eof.to_string(),
                offset,
            },
        }
    }
}
