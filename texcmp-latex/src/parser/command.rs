//! Control sequences: fractions, roots, integrals, logarithms, function calls, and formatting
//! wrappers.

use super::{
    ast::{Call, Constant, Expr, Integral, LitConst, LitSym, Log, Number},
    error,
    expr::fold_ratio,
    Parser,
};
use crate::{functions::is_greek_letter, tokenizer::{Token, TokenKind}};
use std::ops::Range;
use texcmp_error::Error;

/// Commands with their own syntax that also act as function names.
const BUILTIN_FUNCTIONS: &[&str] = &["exp", "int", "ln", "log", "operatorname"];

/// Raises `expr` to `power`, if there is one.
fn apply_power(expr: Expr, power: Option<Expr>) -> Expr {
    match power {
        Some(power) => {
            let span = expr.span().start..expr.span().end.max(power.span().end);
            Expr::pow(expr, power, span)
        },
        None => expr,
    }
}

impl<'source> Parser<'source, '_> {
    /// Parses the remainder of a command whose token has already been consumed.
    pub fn command(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        let lexeme = token.lexeme;
        let name = &lexeme[1..];
        match name {
            "frac" | "dfrac" | "tfrac" => self.frac(token),
            "sqrt" => self.sqrt(token),
            "int" => self.integral(token),
            "log" | "ln" => self.log(token),
            "exp" => self.exp(token),
            "operatorname" => self.operatorname(token),
            "mathrm" | "mathit" | "mathbf" | "boldsymbol" | "text" | "textrm" => self.wrapper(token),
            "bf" | "displaystyle" => self.power(),
            "left" => self.left_group(token),
            "pi" => Ok(Expr::Constant(LitConst { constant: Constant::Pi, span: token.span })),
            "infty" => Ok(Expr::Constant(LitConst { constant: Constant::Infinity, span: token.span })),
            _ if is_greek_letter(name) => self.named_symbol(name.to_string(), token.span),
            _ if self.functions.contains(name) => self.function(name.to_string(), token.span),
            _ => Err(Error::new(vec![token.span], error::UnknownCommand { name: lexeme.to_string() })),
        }
    }

    /// Returns true if the next token is a command that takes a function argument.
    fn at_function_command(&self) -> bool {
        self.peek().map_or(false, |token| {
            token.kind == TokenKind::Command && {
                let name = &token.lexeme[1..];
                BUILTIN_FUNCTIONS.contains(&name) || self.functions.contains(name)
            }
        })
    }

    /// If the next token is an integer of several digits, splits off its first digit into its
    /// own token. TeX reads `\frac12` as `\frac{1}{2}`.
    fn split_digits(&mut self) {
        let Some(index) = (self.cursor..self.tokens.len()).find(|&i| !self.tokens[i].is_whitespace()) else {
            return;
        };
        let token = &self.tokens[index];
        if token.kind != TokenKind::Int || token.lexeme.len() < 2 {
            return;
        }

        let lexeme: &'source str = token.lexeme;
        let (first, rest) = lexeme.split_at(1);
        let split = token.span.start + 1;
        let head = Token { span: token.span.start..split, kind: TokenKind::Int, lexeme: first };
        let tail = Token { span: split..token.span.end, kind: TokenKind::Int, lexeme: rest };

        let mut tokens = std::mem::take(&mut self.tokens).into_vec();
        tokens.splice(index..=index, [head, tail]);
        self.tokens = tokens.into_boxed_slice();
    }

    /// Parses a macro argument: a brace group or a single token.
    pub fn macro_argument(&mut self) -> Result<Expr, Error> {
        self.split_digits();
        match self.peek().map(|token| token.kind) {
            Some(TokenKind::OpenBrace) => self.brace_group(),
            Some(TokenKind::Letter) => {
                let token = self.next_token()?;
                Ok(self.letter_atom(&token))
            },
            Some(TokenKind::Int | TokenKind::Decimal | TokenKind::Command) => self.primary(),
            Some(_) => Err(self.unexpected("an argument")),
            None => Err(self.error(error::UnexpectedEof)),
        }
    }

    /// Parses the optional `^n` written between a function name and its argument, as in
    /// `\sin^2 x`.
    fn function_power(&mut self) -> Result<Option<Expr>, Error> {
        if self.eat(TokenKind::Caret).is_some() {
            Ok(Some(self.script()?))
        } else {
            Ok(None)
        }
    }

    /// Parses the single argument of a function: a parenthesized group, or a product of factors
    /// written without parentheses (`\sin 2x`). The product ends before the next function
    /// command, so `\sin x \cos x` is a product of two calls.
    fn function_argument(&mut self) -> Result<Expr, Error> {
        if self.at(TokenKind::OpenParen) || self.at_command("\\left") {
            return self.primary();
        }

        let first = self.unary()?;
        let start = first.span().start;
        let mut factors = vec![first];
        while self.starts_implicit_factor() && !self.at_function_command() {
            factors.push(self.power()?);
        }
        Ok(Expr::mul(factors, start..self.prev_end()))
    }

    /// Parses a call to a named function, after its name.
    fn function(&mut self, name: String, name_span: Range<usize>) -> Result<Expr, Error> {
        let power = self.function_power()?;
        let args = if self.at(TokenKind::OpenParen) {
            self.call_args()?
        } else {
            vec![self.function_argument()?]
        };

        let call = Expr::Call(Call { name, args, span: name_span.start..self.prev_end() });
        Ok(apply_power(call, power))
    }

    /// `\frac{num}{den}`
    fn frac(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        let num = self.macro_argument()?;
        let den = self.macro_argument()?;
        let span = token.span.start..self.prev_end();

        if let Some(ratio) = fold_ratio(&num, &den, span.clone()) {
            Ok(ratio)
        } else if num.as_number().map_or(false, Number::is_one) {
            Ok(Expr::recip(den, token.span))
        } else {
            Ok(Expr::mul(vec![num, Expr::recip(den, token.span)], span))
        }
    }

    /// `\sqrt{x}` or `\sqrt[n]{x}`
    fn sqrt(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        let index = match self.eat(TokenKind::OpenBracket) {
            Some(open) => Some(self.with_integrand(false, |p| {
                let index = p.additive()?;
                p.close_group(TokenKind::CloseBracket, open.span)?;
                Ok(index)
            })?),
            None => None,
        };
        let radicand = self.macro_argument()?;

        let exp = match index {
            Some(index) => {
                let span = index.span();
                fold_ratio(&Expr::integer(1, span.clone()), &index, span)
                    .unwrap_or_else(|| Expr::recip(index, token.span.clone()))
            },
            None => Expr::number(Number::Rational("1".to_string(), "2".to_string()), token.span.clone()),
        };
        Ok(Expr::pow(radicand, exp, token.span.start..self.prev_end()))
    }

    /// `\int_{a}^{b} f \,dx` or `\int f \,dx`
    fn integral(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        let mut lower = None;
        let mut upper = None;
        for _ in 0..2 {
            if lower.is_none() && self.eat(TokenKind::Underscore).is_some() {
                lower = Some(self.script()?);
            } else if upper.is_none() && self.eat(TokenKind::Caret).is_some() {
                upper = Some(self.script()?);
            }
        }

        let bounds = match (lower, upper) {
            (Some(lower), Some(upper)) => Some((Box::new(lower), Box::new(upper))),
            (None, None) => None,
            (Some(_), None) => {
                return Err(Error::new(vec![token.span], error::MissingBound { missing: "upper" }));
            },
            (None, Some(_)) => {
                return Err(Error::new(vec![token.span], error::MissingBound { missing: "lower" }));
            },
        };

        let integrand = self.with_integrand(true, |p| {
            if p.at_differential() {
                Ok(Expr::integer(1, token.span.clone()))
            } else {
                p.additive()
            }
        })?;
        let var = self.differential(&token)?;

        Ok(Expr::Integral(Integral {
            integrand: Box::new(integrand),
            var,
            bounds,
            span: token.span.start..self.prev_end(),
        }))
    }

    /// Consumes the differential at the end of an integral and returns its variable.
    fn differential(&mut self, integral: &Token) -> Result<LitSym, Error> {
        if !self.differential_ahead() {
            return Err(Error::new(
                vec![integral.span.clone(), self.span()],
                error::MissingDifferential,
            ));
        }

        if self.eat_command("\\mathrm").is_some() {
            // `{d}`
            for _ in 0..3 {
                self.next_token()?;
            }
        } else {
            self.next_token()?;
        }

        let var = self.next_token()?;
        Ok(LitSym { name: var.lexeme.to_string(), span: var.span })
    }

    /// `\log_{b} v`, `\log v`, or `\ln v`
    fn log(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        let base = if token.is_command("\\log") && self.eat(TokenKind::Underscore).is_some() {
            Some(Box::new(self.script()?))
        } else {
            None
        };
        let power = self.function_power()?;
        let value = self.function_argument()?;

        let log = Expr::Log(Log {
            value: Box::new(value),
            base,
            span: token.span.start..self.prev_end(),
        });
        Ok(apply_power(log, power))
    }

    /// `\exp(x)`, which is `e^{x}`
    fn exp(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        let value = self.function_argument()?;
        let base = Expr::Constant(LitConst { constant: Constant::E, span: token.span.clone() });
        Ok(Expr::pow(base, value, token.span.start..self.prev_end()))
    }

    /// `\operatorname{name}(args)`
    fn operatorname(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        let open = self.expect(TokenKind::OpenBrace, "`{`")?;
        let mut name = String::new();
        while let Some(letter) = self.eat(TokenKind::Letter) {
            name.push_str(letter.lexeme);
        }

        if name.is_empty() {
            return match self.eat(TokenKind::CloseBrace) {
                Some(close) => Err(Error::new(vec![open.span.start..close.span.end], error::EmptyGroup)),
                None => Err(self.unexpected("a function name")),
            };
        }
        self.close_group(TokenKind::CloseBrace, open.span)?;
        self.function(name, token.span)
    }

    /// Formatting wrappers such as `\mathrm{...}`. Letters-only content is a single variable
    /// name; anything else is parsed as a grouped expression.
    fn wrapper(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        let start = self.cursor;
        self.expect(TokenKind::OpenBrace, "`{`")?;

        let mut name = String::new();
        while let Some(letter) = self.eat(TokenKind::Letter) {
            name.push_str(letter.lexeme);
        }
        if name.is_empty() || !self.at(TokenKind::CloseBrace) {
            self.cursor = start;
            return self.brace_group();
        }

        self.next_token()?;
        let span = token.span.start..self.prev_end();
        if name == "e" && !self.at(TokenKind::Underscore) {
            return Ok(Expr::Constant(LitConst { constant: Constant::E, span }));
        }
        self.named_symbol(name, span)
    }

    /// `\left( ... \right)` or `\left[ ... \right]`
    fn left_group(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        let (close, symbol) = match self.peek().map(|open| open.kind) {
            Some(TokenKind::OpenParen) => (TokenKind::CloseParen, "\\right)"),
            Some(TokenKind::OpenBracket) => (TokenKind::CloseBracket, "\\right]"),
            Some(_) => return Err(self.unexpected("`(` or `[` after `\\left`")),
            None => return Err(self.error(error::UnexpectedEof)),
        };
        let open = self.next_token()?;
        let inner = self.with_integrand(false, |p| p.additive())?;

        match self.peek() {
            Some(right) if right.is_command("\\right") => {
                self.next_token()?;
            },
            Some(eq) if eq.kind == TokenKind::Eq => {
                return Err(Error::new(vec![eq.span.clone()], error::NestedEquation));
            },
            Some(_) => return Err(self.unexpected("`\\right`")),
            None => {
                return Err(Error::new(
                    vec![token.span.start..open.span.end, self.eof_span()],
                    error::UnclosedParenthesis { close: symbol },
                ));
            },
        }
        self.expect(close, "the matching delimiter")?;
        Ok(inner)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{functions::FunctionTable, parser::{ast::*, parse, parse_with}};

    fn rational(p: &str, q: &str, span: std::ops::Range<usize>) -> Expr {
        Expr::number(Number::Rational(p.to_string(), q.to_string()), span)
    }

    #[test]
    fn numeric_fraction() {
        assert_eq!(parse(r"\frac{1}{2}").unwrap(), rational("1", "2", 0..11));
    }

    #[test]
    fn digit_fraction() {
        assert_eq!(parse(r"\frac12").unwrap(), rational("1", "2", 0..7));
    }

    #[test]
    fn digit_fraction_leaves_remaining_digits() {
        let Expr::Mul(mul) = parse(r"\frac123").unwrap() else { panic!("expected product") };
        assert_eq!(mul.factors, vec![rational("1", "2", 0..7), Expr::integer(3, 7..8)]);
    }

    #[test]
    fn symbolic_fraction() {
        assert_eq!(parse(r"\frac{x}{y}").unwrap(), Expr::Mul(Mul {
            factors: vec![
                Expr::symbol("x", 6..7),
                Expr::pow(Expr::symbol("y", 9..10), Expr::integer(-1, 0..5), 0..10),
            ],
            span: 0..11,
        }));
    }

    #[test]
    fn unit_numerator() {
        let Expr::Pow(pow) = parse(r"\frac{1}{x}").unwrap() else { panic!("expected power") };
        assert_eq!(*pow.base, Expr::symbol("x", 9..10));
        assert_eq!(*pow.exp, Expr::integer(-1, 0..5));
    }

    #[test]
    fn empty_denominator() {
        let err = parse(r"\frac{1}{}").unwrap_err();
        assert_eq!(err.spans, vec![8..10]);
        assert_eq!(format!("{}", err), "EmptyGroup");
    }

    #[test]
    fn square_root() {
        let Expr::Pow(pow) = parse(r"\sqrt{x}").unwrap() else { panic!("expected power") };
        assert_eq!(pow.exp.as_number(), Some(&Number::Rational("1".to_string(), "2".to_string())));
    }

    #[test]
    fn cube_root() {
        let Expr::Pow(pow) = parse(r"\sqrt[3]{x}").unwrap() else { panic!("expected power") };
        assert_eq!(pow.exp.as_number(), Some(&Number::Rational("1".to_string(), "3".to_string())));
    }

    #[test]
    fn definite_integral() {
        let Expr::Integral(int) = parse(r"\int_0^1 x^2 \,dx").unwrap() else {
            panic!("expected integral");
        };
        assert_eq!(int.var.name, "x");
        assert!(matches!(*int.integrand, Expr::Pow(_)));
        let (lower, upper) = int.bounds.unwrap();
        assert_eq!(*lower, Expr::integer(0, 5..6));
        assert_eq!(*upper, Expr::integer(1, 7..8));
    }

    #[test]
    fn bounds_in_either_order() {
        let Expr::Integral(int) = parse(r"\int^{b}_{a} t \mathrm{d}t").unwrap() else {
            panic!("expected integral");
        };
        let (lower, upper) = int.bounds.unwrap();
        assert_eq!(*lower, Expr::symbol("a", 10..11));
        assert_eq!(*upper, Expr::symbol("b", 6..7));
        assert_eq!(int.var.name, "t");
    }

    #[test]
    fn indefinite_integral_of_product() {
        let Expr::Integral(int) = parse(r"\int 2xdx").unwrap() else { panic!("expected integral") };
        assert!(int.bounds.is_none());
        assert!(matches!(*int.integrand, Expr::Mul(_)));
    }

    #[test]
    fn integral_of_one() {
        let Expr::Integral(int) = parse(r"\int dx").unwrap() else { panic!("expected integral") };
        assert_eq!(int.integrand.as_number(), Some(&Number::Integer("1".to_string())));
    }

    #[test]
    fn integral_then_more_terms() {
        let Expr::Add(add) = parse(r"\int x \,dx + 1").unwrap() else { panic!("expected sum") };
        assert!(matches!(add.terms[0], Expr::Integral(_)));
    }

    #[test]
    fn missing_differential() {
        let err = parse(r"\int x").unwrap_err();
        assert_eq!(err.spans, vec![0..4, 6..6]);
        assert_eq!(format!("{}", err), "MissingDifferential");
    }

    #[test]
    fn missing_upper_bound() {
        let err = parse(r"\int_0 x dx").unwrap_err();
        assert_eq!(format!("{}", err), r#"MissingBound { missing: "upper" }"#);
    }

    #[test]
    fn logarithms() {
        let Expr::Log(log) = parse(r"\log_2 8").unwrap() else { panic!("expected log") };
        assert_eq!(log.base.map(|b| *b), Some(Expr::integer(2, 5..6)));
        assert_eq!(*log.value, Expr::integer(8, 7..8));

        let Expr::Log(log) = parse(r"\ln x").unwrap() else { panic!("expected log") };
        assert!(log.base.is_none());
    }

    #[test]
    fn exponential() {
        let Expr::Pow(pow) = parse(r"\exp(x)").unwrap() else { panic!("expected power") };
        assert!(matches!(*pow.base, Expr::Constant(LitConst { constant: Constant::E, .. })));
        assert_eq!(*pow.exp, Expr::symbol("x", 5..6));
    }

    #[test]
    fn squared_sine() {
        let Expr::Pow(pow) = parse(r"\sin^2 x").unwrap() else { panic!("expected power") };
        assert_eq!(*pow.base, Expr::Call(Call {
            name: "sin".to_string(),
            args: vec![Expr::symbol("x", 7..8)],
            span: 0..8,
        }));
        assert_eq!(*pow.exp, Expr::integer(2, 5..6));
    }

    #[test]
    fn function_argument_stops_at_next_function() {
        let Expr::Mul(mul) = parse(r"\sin x \cos x").unwrap() else { panic!("expected product") };
        assert!(mul.factors.iter().all(|f| matches!(f, Expr::Call(_))));
    }

    #[test]
    fn multi_argument_function() {
        let Expr::Call(call) = parse(r"\max(a, b)").unwrap() else { panic!("expected call") };
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn operatorname() {
        let Expr::Call(call) = parse(r"\operatorname{sgn}(x)").unwrap() else { panic!("expected call") };
        assert_eq!(call.name, "sgn");
    }

    #[test]
    fn configured_functions() {
        let table = FunctionTable::new(["foo"]);
        let Expr::Call(call) = parse_with(r"\foo x", &table).unwrap() else { panic!("expected call") };
        assert_eq!(call.name, "foo");

        let err = parse_with(r"\sin x", &table).unwrap_err();
        assert_eq!(format!("{}", err), r#"UnknownCommand { name: "\\sin" }"#);
    }

    #[test]
    fn formatting_is_stripped() {
        assert_eq!(parse(r"\mathrm{abc}").unwrap(), Expr::symbol("abc", 0..12));
        assert_eq!(parse(r"{\bf x}").unwrap(), Expr::symbol("x", 5..6));
        assert_eq!(parse(r"\bf y").unwrap(), Expr::symbol("y", 4..5));
        assert!(matches!(parse(r"\text{x+1}").unwrap(), Expr::Add(_)));
    }

    #[test]
    fn greek_and_constants() {
        assert_eq!(parse(r"\alpha_1").unwrap(), Expr::symbol("alpha_1", 0..8));
        assert!(matches!(parse(r"\pi").unwrap(), Expr::Constant(LitConst { constant: Constant::Pi, .. })));
    }

    #[test]
    fn left_right() {
        let Expr::Pow(pow) = parse(r"\left(a+b\right)^2").unwrap() else { panic!("expected power") };
        assert!(matches!(*pow.base, Expr::Add(_)));
    }

    #[test]
    fn unclosed_left() {
        let err = parse(r"\left( x").unwrap_err();
        assert_eq!(format!("{}", err), r#"UnclosedParenthesis { close: "\\right)" }"#);
    }

    #[test]
    fn unknown_command() {
        let err = parse(r"x + \foo").unwrap_err();
        assert_eq!(err.spans, vec![4..8]);
    }
}
