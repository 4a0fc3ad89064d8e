pub mod ast;
pub mod command;
pub mod error;
pub mod expr;
pub mod primary;

use ast::Expr;
use crate::functions::FunctionTable;
use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;
use texcmp_error::{Error, ErrorKind};

/// Parses the given LaTeX source into an expression tree, recognizing the default set of
/// function commands.
pub fn parse(source: &str) -> Result<Expr, Error> {
    parse_with(source, &FunctionTable::default())
}

/// Parses the given LaTeX source into an expression tree, recognizing the function commands in
/// the given table.
pub fn parse_with(source: &str, functions: &FunctionTable) -> Result<Expr, Error> {
    Parser::new(source, functions).parse_full()
}

/// A recursive-descent parser over the tokens of a LaTeX math expression.
///
/// The grammar methods are split across the submodules of this module: [`expr`] handles
/// equations, sums, products and powers, [`primary`] handles atoms and groups, and [`command`]
/// handles control sequences such as `\frac` and `\int`.
#[derive(Debug, Clone)]
pub struct Parser<'source, 'f> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The length of the source code, used for end-of-input spans.
    source_len: usize,

    /// The function commands to parse as calls.
    functions: &'f FunctionTable,

    /// Whether the parser is inside the integrand of an integral. In that case, a `d` followed
    /// by a letter ends the current product instead of multiplying into it.
    in_integrand: bool,
}

impl<'source, 'f> Parser<'source, 'f> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str, functions: &'f FunctionTable) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            source_len: source.len(),
            functions,
            in_integrand: false,
        }
    }

    /// Parses the entire source as an expression or equation. All tokens must be consumed.
    pub fn parse_full(&mut self) -> Result<Expr, Error> {
        if self.peek().is_none() {
            return Err(self.error(error::UnexpectedEof));
        }

        let expr = self.relation()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) if token.kind == TokenKind::Eq => {
                Err(Error::new(vec![token.span.clone()], error::NestedEquation))
            },
            Some(token) => {
                Err(Error::new(vec![token.span.start..self.source_len], error::ExpectedEof))
            },
        }
    }

    /// Returns the function table this parser recognizes.
    pub fn functions(&self) -> &FunctionTable {
        self.functions
    }

    /// Creates an error that points at the next non-whitespace token, or the end of the source
    /// code if there is none.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Creates an error describing the next token as unexpected. If the stream is exhausted,
    /// returns an end-of-input error instead.
    pub fn unexpected(&self, expected: &'static str) -> Error {
        match self.peek() {
            Some(token) => Error::new(vec![token.span.clone()], error::UnexpectedToken {
                expected,
                found: token.lexeme.to_string(),
            }),
            None => self.error(error::UnexpectedEof),
        }
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.source_len..self.source_len
    }

    /// Returns the span of the next non-whitespace token, or the end of the source code if there
    /// is none.
    pub fn span(&self) -> Range<usize> {
        self.peek().map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the end of the span of the most recently consumed token.
    pub fn prev_end(&self) -> usize {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |token| token.span.end)
    }

    /// Returns the next non-whitespace token without moving the cursor.
    pub fn peek(&self) -> Option<&Token<'source>> {
        self.peek_nth(0)
    }

    /// Returns the `n`th upcoming non-whitespace token (zero-based) without moving the cursor.
    pub fn peek_nth(&self, n: usize) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .filter(|token| !token.is_whitespace())
            .nth(n)
    }

    /// Returns the token directly at the cursor, whitespace included.
    pub fn peek_raw(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns true if the next non-whitespace token has the given kind.
    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |token| token.kind == kind)
    }

    /// Returns true if the next non-whitespace token is the given command.
    pub fn at_command(&self, name: &str) -> bool {
        self.peek().map_or(false, |token| token.is_command(name))
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if !token.is_whitespace() {
                return Ok(token.clone());
            }
        }

        Err(self.error(error::UnexpectedEof))
    }

    /// Consumes the next token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'source>> {
        if self.at(kind) {
            self.next_token().ok()
        } else {
            None
        }
    }

    /// Consumes the next token if it is the given command.
    pub fn eat_command(&mut self, name: &str) -> Option<Token<'source>> {
        if self.at_command(name) {
            self.next_token().ok()
        } else {
            None
        }
    }

    /// Consumes the next token, which must have the given kind. `expected` describes the token
    /// in the resulting error.
    pub fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'source>, Error> {
        self.eat(kind).ok_or_else(|| self.unexpected(expected))
    }

    /// Speculatively parses a value using the given function. If parsing fails, the cursor is
    /// restored to where it was before the call and the error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Self) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Runs the given function with the integrand flag set to `value`, restoring the previous
    /// value afterwards.
    pub fn with_integrand<T>(&mut self, value: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let prev = std::mem::replace(&mut self.in_integrand, value);
        let result = f(self);
        self.in_integrand = prev;
        result
    }
}
