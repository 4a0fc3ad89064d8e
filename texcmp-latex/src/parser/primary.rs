//! Atoms: numbers, letters, and grouped expressions.

use super::{ast::{Call, Constant, Expr, LitConst, Number}, error, Parser};
use crate::tokenizer::{Token, TokenKind};
use std::ops::Range;
use texcmp_error::Error;

impl<'source> Parser<'source, '_> {
    /// Parses a single atom: a number, a letter, a group, or a command.
    pub fn primary(&mut self) -> Result<Expr, Error> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error(error::UnexpectedEof));
        };

        match token.kind {
            TokenKind::Int => {
                self.next_token()?;
                Ok(Expr::number(Number::Integer(token.lexeme.to_string()), token.span))
            },
            TokenKind::Decimal => {
                self.next_token()?;
                Ok(Expr::number(Number::Decimal(token.lexeme.to_string()), token.span))
            },
            TokenKind::Letter => {
                self.next_token()?;
                if token.lexeme == "e" && !self.at(TokenKind::Underscore) {
                    return Ok(self.letter_atom(&token));
                }
                self.named_symbol(token.lexeme.to_string(), token.span)
            },
            TokenKind::OpenParen => self.group(TokenKind::CloseParen),
            TokenKind::OpenBracket => self.group(TokenKind::CloseBracket),
            TokenKind::OpenBrace => self.brace_group(),
            TokenKind::Command => {
                self.next_token()?;
                self.command(token)
            },
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Interprets a single letter token without looking at what follows it. The letter `e` is
    /// Euler's number.
    pub fn letter_atom(&self, token: &Token) -> Expr {
        if token.lexeme == "e" {
            Expr::Constant(LitConst { constant: Constant::E, span: token.span.clone() })
        } else {
            Expr::symbol(token.lexeme, token.span.clone())
        }
    }

    /// Finishes parsing a variable whose name has been read: an optional subscript is appended to
    /// the name, and an opening parenthesis directly after the name makes it a function call.
    pub fn named_symbol(&mut self, mut name: String, span: Range<usize>) -> Result<Expr, Error> {
        if self.eat(TokenKind::Underscore).is_some() {
            name.push('_');
            name.push_str(&self.subscript_text()?);
        }
        let span = span.start..self.prev_end();

        if matches!(self.peek_raw(), Some(token) if token.kind == TokenKind::OpenParen) {
            let args = self.call_args()?;
            return Ok(Expr::Call(Call { name, args, span: span.start..self.prev_end() }));
        }

        Ok(Expr::symbol(name, span))
    }

    /// Reads the text of a subscript, either a single letter / integer token or a brace group of
    /// them.
    fn subscript_text(&mut self) -> Result<String, Error> {
        let Some(open) = self.eat(TokenKind::OpenBrace) else {
            let token = self.peek().cloned();
            return match token {
                Some(token) if matches!(token.kind, TokenKind::Letter | TokenKind::Int) => {
                    self.next_token()?;
                    Ok(token.lexeme.to_string())
                },
                _ => Err(self.unexpected("a subscript")),
            };
        };

        let mut text = String::new();
        loop {
            let Some(token) = self.peek().cloned() else {
                return Err(Error::new(
                    vec![open.span, self.eof_span()],
                    error::UnclosedParenthesis { close: "}" },
                ));
            };
            match token.kind {
                TokenKind::Letter | TokenKind::Int => text.push_str(token.lexeme),
                TokenKind::CloseBrace if text.is_empty() => {
                    return Err(Error::new(vec![open.span.start..token.span.end], error::EmptyGroup));
                },
                TokenKind::CloseBrace => {
                    self.next_token()?;
                    return Ok(text);
                },
                _ => return Err(self.unexpected("a subscript")),
            }
            self.next_token()?;
        }
    }

    /// Parses a parenthesized, comma-separated list of arguments. The list may be empty.
    pub fn call_args(&mut self) -> Result<Vec<Expr>, Error> {
        let open = self.expect(TokenKind::OpenParen, "`(`")?;
        if self.eat(TokenKind::CloseParen).is_some() {
            return Ok(Vec::new());
        }

        self.with_integrand(false, |p| {
            let mut args = vec![p.additive()?];
            while p.eat(TokenKind::Comma).is_some() {
                args.push(p.additive()?);
            }
            p.close_group(TokenKind::CloseParen, open.span)?;
            Ok(args)
        })
    }

    /// Parses a group delimited by the current token and the given closing token.
    pub fn group(&mut self, close: TokenKind) -> Result<Expr, Error> {
        let open = self.next_token()?;
        self.with_integrand(false, |p| {
            let inner = p.additive()?;
            p.close_group(close, open.span)?;
            Ok(inner)
        })
    }

    /// Parses a non-empty brace group, `{...}`.
    pub fn brace_group(&mut self) -> Result<Expr, Error> {
        let open = self.expect(TokenKind::OpenBrace, "`{`")?;
        if let Some(close) = self.eat(TokenKind::CloseBrace) {
            return Err(Error::new(vec![open.span.start..close.span.end], error::EmptyGroup));
        }
        if self.peek().is_none() {
            return Err(Error::new(
                vec![open.span, self.eof_span()],
                error::UnclosedParenthesis { close: "}" },
            ));
        }

        self.with_integrand(false, |p| {
            let inner = p.additive()?;
            p.close_group(TokenKind::CloseBrace, open.span)?;
            Ok(inner)
        })
    }

    /// Consumes the token closing a group that was opened at `open`.
    pub fn close_group(&mut self, close: TokenKind, open: Range<usize>) -> Result<Token<'source>, Error> {
        let (symbol, expected) = match close {
            TokenKind::CloseParen => (")", "`)`"),
            TokenKind::CloseBracket => ("]", "`]`"),
            _ => ("}", "`}`"),
        };

        match self.peek() {
            Some(token) if token.kind == close => self.next_token(),
            Some(token) if token.kind == TokenKind::Eq => {
                Err(Error::new(vec![token.span.clone()], error::NestedEquation))
            },
            Some(_) => Err(self.unexpected(expected)),
            None => Err(Error::new(
                vec![open, self.eof_span()],
                error::UnclosedParenthesis { close: symbol },
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::parser::{ast::*, parse};

    #[test]
    fn euler_constant() {
        assert_eq!(
            parse("e").unwrap(),
            Expr::Constant(LitConst { constant: Constant::E, span: 0..1 }),
        );
    }

    #[test]
    fn subscripted_variables() {
        assert_eq!(parse("x_1").unwrap(), Expr::symbol("x_1", 0..3));
        assert_eq!(parse("x_{ab}").unwrap(), Expr::symbol("x_ab", 0..6));
        assert_eq!(parse("e_2").unwrap(), Expr::symbol("e_2", 0..3));
    }

    #[test]
    fn letter_call() {
        assert_eq!(parse("f(x, 2)").unwrap(), Expr::Call(Call {
            name: "f".to_string(),
            args: vec![Expr::symbol("x", 2..3), Expr::integer(2, 5..6)],
            span: 0..7,
        }));
    }

    #[test]
    fn spaced_paren_multiplies() {
        let Expr::Mul(mul) = parse("x (y + 1)").unwrap() else { panic!("expected product") };
        assert_eq!(mul.factors.len(), 2);
        assert!(matches!(mul.factors[1], Expr::Add(_)));
    }

    #[test]
    fn number_times_group() {
        let Expr::Mul(mul) = parse("2(x+1)").unwrap() else { panic!("expected product") };
        assert_eq!(mul.factors[0], Expr::integer(2, 0..1));
    }

    #[test]
    fn brackets_group() {
        assert!(matches!(parse("[a + b]").unwrap(), Expr::Add(_)));
    }

    #[test]
    fn unclosed_paren() {
        let err = parse("(x + 1").unwrap_err();
        assert_eq!(err.spans, vec![0..1, 6..6]);
        assert_eq!(format!("{}", err), r#"UnclosedParenthesis { close: ")" }"#);
    }

    #[test]
    fn empty_braces() {
        let err = parse("x^{}").unwrap_err();
        assert_eq!(err.spans, vec![2..4]);
        assert_eq!(format!("{}", err), "EmptyGroup");
    }

    #[test]
    fn empty_subscript() {
        let err = parse("x_{}").unwrap_err();
        assert_eq!(format!("{}", err), "EmptyGroup");
    }
}
