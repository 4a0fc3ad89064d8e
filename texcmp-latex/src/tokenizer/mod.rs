pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Input the tokenizer cannot classify becomes a [`TokenKind::Symbol`], which the parser rejects
/// with a proper error.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "2x + 1",
            [
                (TokenKind::Int, "2"),
                (TokenKind::Letter, "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "1"),
            ],
        );
    }

    #[test]
    fn commands_and_groups() {
        compare_tokens(
            r"\frac{a}{0.5}\cdot\alpha",
            [
                (TokenKind::Command, r"\frac"),
                (TokenKind::OpenBrace, "{"),
                (TokenKind::Letter, "a"),
                (TokenKind::CloseBrace, "}"),
                (TokenKind::OpenBrace, "{"),
                (TokenKind::Decimal, "0.5"),
                (TokenKind::CloseBrace, "}"),
                (TokenKind::Command, r"\cdot"),
                (TokenKind::Command, r"\alpha"),
            ],
        );
    }

    #[test]
    fn spacing_commands() {
        compare_tokens(
            r"x\,dx\quad",
            [
                (TokenKind::Letter, "x"),
                (TokenKind::Space, r"\,"),
                (TokenKind::Letter, "d"),
                (TokenKind::Letter, "x"),
                (TokenKind::Space, r"\quad"),
            ],
        );
    }

    #[test]
    fn unknown_characters_become_symbols() {
        let tokens = tokenize_complete("x $ y");
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[2].kind, TokenKind::Symbol);
        assert_eq!(tokens[2].lexeme, "$");
    }
}
