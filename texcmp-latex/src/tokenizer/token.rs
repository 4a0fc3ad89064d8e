use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    /// Explicit spacing commands, such as `\,` or `\quad`.
    #[regex(r"\\[,;:! ]")]
    #[token("\\quad")]
    #[token("\\qquad")]
    Space,

    /// A control sequence such as `\frac` or `\alpha`. The lexeme includes the backslash.
    #[regex(r"\\[a-zA-Z]+")]
    Command,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("^")]
    Caret,

    #[token("_")]
    Underscore,

    #[token("=")]
    Eq,

    #[token(",")]
    Comma,

    #[token("'")]
    Prime,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("[")]
    OpenBracket,

    #[token("]")]
    CloseBracket,

    #[token("{")]
    OpenBrace,

    #[token("}")]
    CloseBrace,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]*\.[0-9]+")]
    Decimal,

    /// A single letter. In math mode, `xy` is the product of `x` and `y`.
    #[regex(r"[a-zA-Z]")]
    Letter,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Space)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}

impl Token<'_> {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    /// Returns true if the token is the given command, e.g. `is_command("\\frac")`.
    pub fn is_command(&self, name: &str) -> bool {
        self.kind == TokenKind::Command && self.lexeme == name
    }

    /// Returns true if the token is the given letter.
    pub fn is_letter(&self, letter: &str) -> bool {
        self.kind == TokenKind::Letter && self.lexeme == letter
    }
}
