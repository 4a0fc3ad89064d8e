//! Equations, sums, products, and powers.

use super::{ast::{Equation, Expr, Number}, error, Parser};
use crate::tokenizer::TokenKind;
use std::ops::Range;
use texcmp_error::Error;

/// How the next token continues a product.
enum Continuation {
    /// An explicit multiplication operator: `*`, `\cdot`, `\times`.
    Mul,

    /// An explicit division operator: `/`, `\div`.
    Div,

    /// Juxtaposition, as in `2x`.
    Implicit,

    /// The product ends here.
    Stop,
}

/// Returns true if the given digits spell zero.
fn is_zero(digits: &str) -> bool {
    digits.trim_start_matches('-').trim_start_matches('0').is_empty()
}

/// If both expressions are integer literals and the denominator is non-zero, returns the
/// rational literal `num / den`.
pub(crate) fn fold_ratio(num: &Expr, den: &Expr, span: Range<usize>) -> Option<Expr> {
    let (Some(Number::Integer(p)), Some(Number::Integer(q))) = (num.as_number(), den.as_number()) else {
        return None;
    };
    if is_zero(q) {
        return None;
    }

    let value = match q.strip_prefix('-') {
        Some(q) => Number::Rational(p.clone(), q.to_string()).negated(),
        None => Number::Rational(p.clone(), q.clone()),
    };
    Some(Expr::number(value, span))
}

/// Appends `1 / divisor` to the list of factors, folding integer ratios and dropping a leading
/// factor of `1`.
fn divide(factors: &mut Vec<Expr>, divisor: Expr, op_span: Range<usize>) {
    let last = factors.pop();
    match last {
        Some(last) => {
            let span = last.span().start..divisor.span().end;
            if let Some(ratio) = fold_ratio(&last, &divisor, span) {
                factors.push(ratio);
            } else if last.as_number().map_or(false, Number::is_one) {
                factors.push(Expr::recip(divisor, op_span));
            } else {
                factors.push(last);
                factors.push(Expr::recip(divisor, op_span));
            }
        },
        None => factors.push(Expr::recip(divisor, op_span)),
    }
}

impl Parser<'_, '_> {
    /// Parses an expression, or an equation of two expressions.
    pub fn relation(&mut self) -> Result<Expr, Error> {
        let lhs = self.additive()?;
        if self.eat(TokenKind::Eq).is_none() {
            return Ok(lhs);
        }

        let rhs = self.additive()?;
        let span = lhs.span().start..self.prev_end();
        Ok(Expr::Equation(Equation {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        }))
    }

    /// Parses a sum of terms separated by `+` and `-`.
    pub fn additive(&mut self) -> Result<Expr, Error> {
        let first = self.term()?;
        let start = first.span().start;
        let mut terms = vec![first];

        loop {
            if self.eat(TokenKind::Add).is_some() {
                terms.push(self.term()?);
            } else if let Some(op) = self.eat(TokenKind::Sub) {
                let term = self.term()?;
                terms.push(term.neg(op.span));
            } else {
                break;
            }
        }

        Ok(Expr::add(terms, start..self.prev_end()))
    }

    /// Parses a product of factors, joined by explicit operators or by juxtaposition.
    pub fn term(&mut self) -> Result<Expr, Error> {
        let first = self.unary()?;
        let start = first.span().start;
        let mut factors = vec![first];

        loop {
            match self.continuation() {
                Continuation::Mul => {
                    self.next_token()?;
                    factors.push(self.unary()?);
                },
                Continuation::Div => {
                    let op = self.next_token()?;
                    let divisor = self.unary()?;
                    divide(&mut factors, divisor, op.span);
                },
                Continuation::Implicit => factors.push(self.power()?),
                Continuation::Stop => break,
            }
        }

        Ok(Expr::mul(factors, start..self.prev_end()))
    }

    /// Parses a factor with any number of leading signs.
    pub fn unary(&mut self) -> Result<Expr, Error> {
        if let Some(op) = self.eat(TokenKind::Sub) {
            let operand = self.unary()?;
            return Ok(operand.neg(op.span));
        }
        if self.eat(TokenKind::Add).is_some() {
            return self.unary();
        }
        self.power()
    }

    /// Parses an atom with an optional superscript.
    pub fn power(&mut self) -> Result<Expr, Error> {
        let base = self.primary()?;
        self.superscript(base)
    }

    /// If the next token is `^`, parses the exponent and raises `base` to it.
    pub fn superscript(&mut self, base: Expr) -> Result<Expr, Error> {
        if self.eat(TokenKind::Caret).is_none() {
            return Ok(base);
        }

        let exp = self.script()?;
        let span = base.span().start..self.prev_end();
        Ok(Expr::pow(base, exp, span))
    }

    /// Parses the argument of `^` or `_`: a brace group, a signed script, or a single token.
    /// `x^23` is `x^{23}`.
    pub fn script(&mut self) -> Result<Expr, Error> {
        let Some(kind) = self.peek().map(|token| token.kind) else {
            return Err(self.error(error::UnexpectedEof));
        };

        match kind {
            TokenKind::OpenBrace => self.brace_group(),
            TokenKind::Sub => {
                let op = self.next_token()?;
                let operand = self.script()?;
                Ok(operand.neg(op.span))
            },
            TokenKind::Int | TokenKind::Decimal => self.primary(),
            TokenKind::Letter => {
                let token = self.next_token()?;
                Ok(self.letter_atom(&token))
            },
            TokenKind::Command => self.primary(),
            _ => Err(self.unexpected("an exponent")),
        }
    }

    /// Returns true if the upcoming tokens are a differential, such as `dx` or `\mathrm{d}x`.
    pub fn differential_ahead(&self) -> bool {
        let kinds = |n: usize| self.peek_nth(n);
        match kinds(0) {
            Some(d) if d.is_letter("d") => kinds(1).map_or(false, |t| t.kind == TokenKind::Letter),
            Some(cmd) if cmd.is_command("\\mathrm") => {
                kinds(1).map_or(false, |t| t.kind == TokenKind::OpenBrace)
                    && kinds(2).map_or(false, |t| t.is_letter("d"))
                    && kinds(3).map_or(false, |t| t.kind == TokenKind::CloseBrace)
                    && kinds(4).map_or(false, |t| t.kind == TokenKind::Letter)
            },
            _ => false,
        }
    }

    /// Returns true if the parser is inside an integrand and a differential follows.
    pub fn at_differential(&self) -> bool {
        self.in_integrand && self.differential_ahead()
    }

    /// Returns true if the next token can begin a factor multiplied by juxtaposition.
    pub fn starts_implicit_factor(&self) -> bool {
        if self.at_differential() {
            return false;
        }

        self.peek().map_or(false, |token| match token.kind {
            TokenKind::Int
                | TokenKind::Decimal
                | TokenKind::Letter
                | TokenKind::OpenParen
                | TokenKind::OpenBracket
                | TokenKind::OpenBrace => true,
            TokenKind::Command => !matches!(token.lexeme, "\\right" | "\\cdot" | "\\times" | "\\div"),
            _ => false,
        })
    }

    fn continuation(&self) -> Continuation {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Mul || t.is_command("\\cdot") || t.is_command("\\times") => {
                Continuation::Mul
            },
            Some(t) if t.kind == TokenKind::Div || t.is_command("\\div") => Continuation::Div,
            Some(_) if self.starts_implicit_factor() => Continuation::Implicit,
            _ => Continuation::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::parser::{ast::*, parse};

    #[test]
    fn negative_denominator_moves_sign() {
        let num = Expr::integer(3, 0..1);
        let den = Expr::integer(-4, 2..4);
        assert_eq!(
            fold_ratio(&num, &den, 0..4),
            Some(Expr::number(Number::Rational("-3".to_string(), "4".to_string()), 0..4)),
        );
    }

    #[test]
    fn zero_denominator_does_not_fold() {
        assert_eq!(fold_ratio(&Expr::integer(1, 0..1), &Expr::integer(0, 2..3), 0..3), None);
    }

    #[test]
    fn one_over_symbol() {
        assert_eq!(
            parse("1/x").unwrap(),
            Expr::pow(Expr::symbol("x", 2..3), Expr::integer(-1, 1..2), 1..3),
        );
    }

    #[test]
    fn power_then_implicit_factor() {
        let Expr::Mul(mul) = parse("x^2y").unwrap() else { panic!("expected product") };
        assert_eq!(mul.factors.len(), 2);
        assert!(matches!(mul.factors[0], Expr::Pow(_)));
        assert_eq!(mul.factors[1], Expr::symbol("y", 3..4));
    }

    #[test]
    fn negative_exponent() {
        let Expr::Pow(pow) = parse("x^{-2}").unwrap() else { panic!("expected power") };
        assert_eq!(pow.exp.as_number(), Some(&Number::Integer("-2".to_string())));
    }

    #[test]
    fn explicit_times() {
        let Expr::Mul(mul) = parse(r"a \times b * c").unwrap() else { panic!("expected product") };
        assert_eq!(mul.factors.len(), 3);
    }

    #[test]
    fn product_of_negative_factor() {
        let Expr::Mul(mul) = parse(r"2 \cdot -3").unwrap() else { panic!("expected product") };
        assert_eq!(mul.factors[1].as_number(), Some(&Number::Integer("-3".to_string())));
    }
}
