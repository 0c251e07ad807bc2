pub(crate) mod grammar;

use crate::ast::Node;
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::limit::LimitTracker;

/// Deep enough for any query a person writes, shallow enough that a
/// pathological paren chain errors out long before the stack does.
const DEFAULT_RECURSION_LIMIT: usize = 500;

/// Parse a query string into a [`Node`] tree.
///
/// Whitespace-only input yields [`Node::Empty`]; malformed input yields a
/// [`ParseError`] with a byte offset.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    Parser::new(input).parse()
}

/// Recursive-descent parser over the combined modern/legacy query grammar.
///
/// ## Example
/// ```rust
/// use bibql_parser::{Node, Parser};
///
/// let tree = Parser::new("foo:bar").parse().unwrap();
/// assert_eq!(
///     tree,
///     Node::keyword_query(Node::keyword("foo"), Node::value("bar")),
/// );
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    recursion: LimitTracker,
}

impl<'a> Parser<'a> {
    /// Create a new instance of a parser given an input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: Vec::new(),
            pos: 0,
            recursion: LimitTracker::new(DEFAULT_RECURSION_LIMIT),
        }
    }

    /// Configure the recursion limit to use while parsing.
    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion = LimitTracker::new(limit);
        self
    }

    /// Lex and parse the input.
    pub fn parse(mut self) -> Result<Node, ParseError> {
        for token in Lexer::new(self.input) {
            self.tokens.push(token?);
        }
        grammar::main(&mut self)
    }

    fn token(&self, at: usize) -> &Token<'a> {
        let last = self.tokens.len() - 1;
        &self.tokens[at.min(last)]
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Kind of the token `n` positions ahead; sticks at `Eof`.
    pub(crate) fn nth_kind(&self, n: usize) -> TokenKind {
        self.token(self.pos + n).kind()
    }

    /// Data of the token `n` positions ahead.
    pub(crate) fn nth_data(&self, n: usize) -> &'a str {
        self.token(self.pos + n).data()
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.nth_kind(0)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consume and return the current token. Never advances past `Eof`.
    pub(crate) fn bump(&mut self) -> Token<'a> {
        let token = *self.token(self.pos);
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn skip_ws(&mut self) {
        while self.at(TokenKind::Whitespace) {
            self.bump();
        }
    }

    /// Consume the next token if it is `kind`, or produce a syntax error.
    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        message: &str,
    ) -> Result<Token<'a>, ParseError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.syntax_err(message))
        }
    }

    /// A syntax error at the current token.
    pub(crate) fn syntax_err(&self, message: impl Into<String>) -> ParseError {
        let token = self.token(self.pos);
        if token.kind() == TokenKind::Eof {
            ParseError::Eof {
                message: message.into(),
                index: token.index(),
            }
        } else {
            ParseError::Syntax {
                message: message.into(),
                data: token.data().to_string(),
                index: token.index(),
            }
        }
    }

    /// Run `f` one recursion level deeper, erroring out past the limit.
    pub(crate) fn descend<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.recursion.consume();
        if self.recursion.limited() {
            return Err(ParseError::RecursionLimit {
                index: self.token(self.pos).index(),
            });
        }
        let result = f(self);
        self.recursion.release();
        result
    }
}
