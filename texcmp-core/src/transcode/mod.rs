//! Conversion between the LaTeX expression tree produced by [`texcmp_latex`] and the canonical
//! grammar.
//!
//! [`to_grammar`] maps a parsed LaTeX tree to an [`Expr`]; [`to_latex`] prints an [`Expr`] as
//! LaTeX that [`texcmp_latex`] parses back into the same tree, for every tree the forward mapping
//! can produce. A few shapes are lossy:
//!
//! - An equation `a = b` becomes the difference `sub(a, b)`, which prints as `a - b`.
//! - An indefinite integral has no bounds in LaTeX; both of its bounds become `var(x)`.
//! - The variable of integration is not recorded; integrals always print with `\,dx`.

mod error;
mod latex;

pub use error::UnsupportedExpression;
pub use latex::{to_latex, to_latex_with};

use crate::{
    grammar::Expr,
    primitive::{int_from_str, rational_from_decimal, ratio},
};
use rug::Rational;
use texcmp_error::Error;
use texcmp_latex::parser::ast::{self, Constant, Expr as AstExpr, Literal, Number as AstNumber};

/// The placeholder used for both bounds of an indefinite integral.
pub const INDEFINITE_BOUND: &str = "x";

/// Creates an [`UnsupportedExpression`] error pointing at the given node.
fn unsupported(expr: &AstExpr, construct: &'static str) -> Error {
    Error::new(vec![expr.span()], UnsupportedExpression { construct })
}

/// Returns the exact value of a numeric literal.
fn literal_value(literal: &Literal) -> Option<Rational> {
    match &literal.value {
        AstNumber::Integer(digits) => int_from_str(digits).map(Rational::from),
        AstNumber::Decimal(digits) => rational_from_decimal(digits),
        AstNumber::Rational(num, den) => ratio(int_from_str(num)?, int_from_str(den)?),
    }
}

/// If the expression is a power with exponent exactly `-1`, returns its base.
fn reciprocal_base(expr: &AstExpr) -> Option<&AstExpr> {
    match expr {
        AstExpr::Pow(pow) => match &*pow.exp {
            AstExpr::Literal(exp) if literal_value(exp).map_or(false, |r| r == -1) => Some(&pow.base),
            _ => None,
        },
        _ => None,
    }
}

/// Converts a parsed LaTeX tree to the canonical grammar.
///
/// A top-level equation `lhs = rhs` becomes `sub(lhs, rhs)`. Constructs with no grammar
/// equivalent, such as `\pi`, produce an [`UnsupportedExpression`] error pointing at the
/// offending node.
pub fn to_grammar(expr: &AstExpr) -> Result<Expr, Error> {
    match expr {
        AstExpr::Equation(eq) => Ok(Expr::difference(convert(&eq.lhs)?, convert(&eq.rhs)?)),
        expr => convert(expr),
    }
}

fn convert(expr: &AstExpr) -> Result<Expr, Error> {
    match expr {
        AstExpr::Literal(literal) => literal_value(literal)
            .map(Expr::from)
            .ok_or_else(|| unsupported(expr, "a number that is not rational")),
        AstExpr::Symbol(sym) => Ok(Expr::var(&sym.name)),
        AstExpr::Constant(constant) => match constant.constant {
            Constant::E => Ok(Expr::e()),
            Constant::Pi => Err(unsupported(expr, "the constant `\\pi`")),
            Constant::Infinity => Err(unsupported(expr, "infinity")),
        },
        AstExpr::Add(add) => Ok(Expr::sum(convert_all(&add.terms)?)),
        AstExpr::Mul(mul) => {
            let mut numerator = Vec::new();
            let mut denominator = Vec::new();
            for factor in &mul.factors {
                match reciprocal_base(factor) {
                    Some(base) => denominator.push(convert(base)?),
                    None => numerator.push(convert(factor)?),
                }
            }

            if denominator.is_empty() {
                Ok(Expr::product(numerator))
            } else {
                Ok(Expr::fraction(Expr::product(numerator), Expr::product(denominator)))
            }
        },
        AstExpr::Pow(pow) => match reciprocal_base(expr) {
            Some(base) => Ok(Expr::fraction(Expr::int(1), convert(base)?)),
            None => Ok(Expr::power(convert(&pow.base)?, convert(&pow.exp)?)),
        },
        AstExpr::Call(call) => Ok(Expr::UserFunction(call.name.clone(), convert_all(&call.args)?)),
        AstExpr::Log(log) => {
            let base = match &log.base {
                Some(base) => convert(base)?,
                None => Expr::e(),
            };
            Ok(Expr::logarithm(convert(&log.value)?, base))
        },
        AstExpr::Integral(integral) => convert_integral(integral),
        AstExpr::Equation(_) => Err(unsupported(expr, "an equation inside an expression")),
    }
}

fn convert_all(exprs: &[AstExpr]) -> Result<Vec<Expr>, Error> {
    exprs.iter().map(convert).collect()
}

fn convert_integral(integral: &ast::Integral) -> Result<Expr, Error> {
    let bounds = match &integral.bounds {
        Some((lower, upper)) => (convert(lower)?, convert(upper)?),
        None => (Expr::var(INDEFINITE_BOUND), Expr::var(INDEFINITE_BOUND)),
    };
    Ok(Expr::integral(convert(&integral.integrand)?, Some(bounds)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use texcmp_latex::parse;

    /// Parses and transcodes the given LaTeX, returning the grammar string.
    fn grammar(latex: &str) -> String {
        to_grammar(&parse(latex).unwrap()).unwrap().to_string()
    }

    #[test]
    fn sums_and_products() {
        assert_eq!(grammar("x + y"), "sum(var(x), var(y))");
        assert_eq!(grammar(r"2x \cdot y"), "mul(num(2), var(x), var(y))");
        assert_eq!(grammar("x - y"), "sum(var(x), mul(num(-1), var(y)))");
    }

    #[test]
    fn fractions() {
        assert_eq!(grammar(r"\frac{x}{y}"), "fraq(var(x), var(y))");
        assert_eq!(grammar(r"\frac{1}{x}"), "fraq(num(1), var(x))");
        assert_eq!(grammar(r"\frac{a b}{c d}"), "fraq(mul(var(a), var(b)), mul(var(c), var(d)))");
        assert_eq!(grammar(r"\frac{3}{6}"), "num(1/2)");
        assert_eq!(grammar(r"x^{-1} y^{-1}"), "fraq(num(1), mul(var(x), var(y)))");
    }

    #[test]
    fn powers_and_roots() {
        assert_eq!(grammar("x^2"), "pow(var(x), num(2))");
        assert_eq!(grammar(r"\sqrt{x}"), "pow(var(x), num(1/2))");
        assert_eq!(grammar("e^{x}"), "pow(num(E), var(x))");
    }

    #[test]
    fn decimals_are_exact() {
        assert_eq!(grammar("0.25"), "num(1/4)");
        assert_eq!(grammar("-1.5"), "num(-3/2)");
    }

    #[test]
    fn equation_becomes_difference() {
        assert_eq!(grammar("y = 2x"), "sub(var(y), mul(num(2), var(x)))");
    }

    #[test]
    fn integrals() {
        assert_eq!(grammar(r"\int_0^1 t \,dt"), "integral(var(t), num(0), num(1))");
        assert_eq!(grammar(r"\int t \,dt"), "integral(var(t), var(x), var(x))");
    }

    #[test]
    fn logarithms_and_functions() {
        assert_eq!(grammar(r"\log_2 x"), "log(var(x), num(2))");
        assert_eq!(grammar(r"\ln x"), "log(var(x), num(E))");
        assert_eq!(grammar(r"\sin x"), "udf(sin, var(x))");
        assert_eq!(grammar("f(x, y)"), "udf(f, var(x), var(y))");
    }

    #[test]
    fn pi_is_unsupported() {
        let expr = parse(r"2\pi").unwrap();
        let err = to_grammar(&expr).unwrap_err();
        assert_eq!(err.spans, vec![1..4]);
        assert_eq!(
            format!("{}", err),
            r#"UnsupportedExpression { construct: "the constant `\\pi`" }"#,
        );
    }
}
