//! Printing grammar trees as LaTeX.

use crate::grammar::{Constant, Expr, Number};
use std::fmt::{self, Display, Formatter};
use texcmp_latex::{functions::is_greek_letter, FunctionTable};

/// Binding strength of an expression when printed, from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    /// Sums, differences, integrals, and negative numbers.
    Additive,

    /// Products, fractions, and positive non-integer rationals.
    Multiplicative,

    /// Powers.
    Power,

    /// Everything else.
    Atom,
}

fn precedence(expr: &Expr) -> Precedence {
    match expr {
        Expr::Number(Number::Rational(r)) if r.cmp0().is_lt() => Precedence::Additive,
        Expr::Number(Number::Rational(r)) if *r.denom() != 1 => Precedence::Multiplicative,
        Expr::Sum(_) | Expr::Difference(..) | Expr::Integral(..) => Precedence::Additive,
        Expr::Product(_) | Expr::Fraction(..) => Precedence::Multiplicative,
        Expr::Power(..) => Precedence::Power,
        _ => Precedence::Atom,
    }
}

/// Returns true if the expression can be the base of a power without parentheses.
fn is_bare_base(expr: &Expr) -> bool {
    match expr {
        Expr::Variable(_) | Expr::Number(Number::Constant(_)) => true,
        Expr::Number(Number::Rational(r)) => *r.denom() == 1 && r.cmp0().is_ge(),
        _ => false,
    }
}

/// Splits a variable name into its body and its subscript, if any.
fn split_subscript(name: &str) -> (&str, Option<&str>) {
    match name.split_once('_') {
        Some((body, sub)) => (body, Some(sub)),
        None => (name, None),
    }
}

/// A wrapper that implements [`Display`] by printing an [`Expr`] as LaTeX.
struct LatexFormatter<'a> {
    expr: &'a Expr,
    functions: &'a FunctionTable,
}

impl<'a> LatexFormatter<'a> {
    fn with(&self, expr: &'a Expr) -> Self {
        Self { expr, functions: self.functions }
    }

    /// Prints `child`, wrapping it in `\left( \right)` if `wrap` is true.
    fn child(&self, f: &mut Formatter, child: &'a Expr, wrap: bool) -> fmt::Result {
        if wrap {
            write!(f, "\\left({}\\right)", self.with(child))
        } else {
            write!(f, "{}", self.with(child))
        }
    }

    /// Prints the operands of a sum or product joined by `sep`, wrapping those that bind more
    /// loosely than `parent`.
    fn join(&self, f: &mut Formatter, operands: &'a [Expr], sep: &str, parent: Precedence) -> fmt::Result {
        for (i, operand) in operands.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", sep)?;
            }
            self.child(f, operand, precedence(operand) < parent)?;
        }
        Ok(())
    }

    fn number(&self, f: &mut Formatter, num: &Number) -> fmt::Result {
        match num {
            Number::Rational(r) if *r.denom() == 1 => write!(f, "{}", r.numer()),
            Number::Rational(r) => {
                let sign = if r.cmp0().is_lt() { "-" } else { "" };
                write!(f, "{}\\frac{{{}}}{{{}}}", sign, r.numer().clone().abs(), r.denom())
            },
            Number::Constant(Constant::E) => write!(f, "e"),
        }
    }

    fn variable(&self, f: &mut Formatter, name: &str) -> fmt::Result {
        let (body, sub) = split_subscript(name);
        if is_greek_letter(body) {
            write!(f, "\\{}", body)?;
        } else if body.chars().count() > 1 && body.chars().all(|c| c.is_ascii_alphabetic()) {
            write!(f, "\\mathrm{{{}}}", body)?;
        } else {
            write!(f, "{}", body)?;
        }

        match sub {
            Some(sub) => write!(f, "_{{{}}}", sub),
            None => Ok(()),
        }
    }

    fn user_function(&self, f: &mut Formatter, name: &str, args: &'a [Expr]) -> fmt::Result {
        if args.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return write!(f, "{}", self.expr);
        }

        if self.functions.contains(name) || is_greek_letter(name) {
            write!(f, "\\{}(", name)?;
        } else if name.len() == 1 {
            write!(f, "{}(", name)?;
        } else {
            write!(f, "\\operatorname{{{}}}(", name)?;
        }
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.with(arg))?;
        }
        write!(f, ")")
    }

    fn integral(&self, f: &mut Formatter, integrand: &'a Expr, bounds: Option<(&'a Expr, &'a Expr)>) -> fmt::Result {
        match bounds {
            Some((lower, upper)) => {
                write!(f, "\\int_{{{}}}^{{{}}} ", self.with(lower), self.with(upper))?;
            },
            None => write!(f, "\\int ")?,
        }
        write!(f, "{} \\,dx", self.with(integrand))
    }
}

impl Display for LatexFormatter<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.expr {
            Expr::Number(num) => self.number(f, num),
            Expr::Variable(name) => self.variable(f, name),
            Expr::Sum(terms) => self.join(f, terms, " + ", Precedence::Additive),
            Expr::Product(factors) => self.join(f, factors, " \\cdot ", Precedence::Multiplicative),
            Expr::Difference(lhs, rhs) => {
                write!(f, "{} - ", self.with(lhs))?;
                self.child(f, rhs, precedence(rhs) <= Precedence::Additive)
            },
            Expr::Fraction(num, den) => {
                write!(f, "\\frac{{{}}}{{{}}}", self.with(num), self.with(den))
            },
            Expr::Power(base, exp) => {
                self.child(f, base, !is_bare_base(base))?;
                write!(f, "^{{{}}}", self.with(exp))
            },
            Expr::Integral(integrand, bounds) => {
                let bounds = bounds.as_ref().map(|(lower, upper)| (lower.as_ref(), upper.as_ref()));
                self.integral(f, integrand, bounds)
            },
            Expr::Logarithm(value, base) => {
                write!(f, "\\log_{{{}}}({})", self.with(base), self.with(value))
            },
            Expr::UserFunction(name, args) => self.user_function(f, name, args),
        }
    }
}

/// Prints the expression as LaTeX, using the default [`FunctionTable`] to decide which function
/// names are written as commands.
pub fn to_latex(expr: &Expr) -> String {
    to_latex_with(expr, &FunctionTable::default())
}

/// Prints the expression as LaTeX. Functions named in `functions` are written as commands, such
/// as `\sin(x)`.
///
/// Parsing the output with [`texcmp_latex::parse_with`] and the same table, then transcoding it
/// with [`to_grammar`](super::to_grammar), gives back the original tree, except for the shapes
/// listed below:
///
/// - A difference prints as `a - b`, which parses as a sum.
/// - A power with exponent `-1`, a fraction of two integers, or a fraction inside a product or
/// numerator, is re-read as a single fraction or number.
/// - Nested sums and products are flattened.
/// - A variable named `e` is re-read as Euler's number.
/// - An integral without bounds is re-read with the placeholder bounds `var(x)`.
pub fn to_latex_with(expr: &Expr, functions: &FunctionTable) -> String {
    LatexFormatter { expr, functions }.to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{grammar::parse_grammar, transcode::to_grammar};
    use super::*;

    /// Prints the grammar string as LaTeX.
    fn latex(grammar: &str) -> String {
        to_latex(&parse_grammar(grammar).unwrap())
    }

    /// Asserts that the grammar string survives a trip through LaTeX.
    fn round_trip(grammar: &str) {
        let printed = latex(grammar);
        let parsed = texcmp_latex::parse(&printed).unwrap();
        assert_eq!(to_grammar(&parsed).unwrap().to_string(), grammar, "via {}", printed);
    }

    #[test]
    fn basic_shapes() {
        assert_eq!(latex("sum(var(x), num(1))"), "x + 1");
        assert_eq!(latex("mul(num(2), var(x))"), r"2 \cdot x");
        assert_eq!(latex("fraq(var(x), var(y))"), r"\frac{x}{y}");
        assert_eq!(latex("pow(var(x), num(2))"), "x^{2}");
        assert_eq!(latex("sub(var(x), var(y))"), "x - y");
        assert_eq!(latex("log(var(x), num(2))"), r"\log_{2}(x)");
        assert_eq!(latex("num(-3/4)"), r"-\frac{3}{4}");
    }

    #[test]
    fn parenthesization() {
        assert_eq!(latex("mul(sum(var(a), var(b)), var(c))"), r"\left(a + b\right) \cdot c");
        assert_eq!(latex("pow(sum(var(x), num(1)), num(2))"), r"\left(x + 1\right)^{2}");
        assert_eq!(latex("pow(num(-2), var(n))"), r"\left(-2\right)^{n}");
        assert_eq!(latex("sub(var(x), sum(var(y), var(z)))"), r"x - \left(y + z\right)");
        assert_eq!(latex("mul(num(-1), var(y))"), r"\left(-1\right) \cdot y");
    }

    #[test]
    fn names() {
        assert_eq!(latex("var(alpha)"), r"\alpha");
        assert_eq!(latex("var(x_1)"), "x_{1}");
        assert_eq!(latex("var(abc)"), r"\mathrm{abc}");
        assert_eq!(latex("udf(sin, var(x))"), r"\sin(x)");
        assert_eq!(latex("udf(f, var(x), var(y))"), "f(x, y)");
        assert_eq!(latex("udf(sgn, var(x))"), r"\operatorname{sgn}(x)");
        assert_eq!(latex("udf(f)"), "udf(f)");
    }

    #[test]
    fn integrals() {
        assert_eq!(latex("integral(var(t), num(0), num(1))"), r"\int_{0}^{1} t \,dx");
        assert_eq!(latex("integral(var(t), var(x), var(x))"), r"\int_{x}^{x} t \,dx");
        assert_eq!(latex("integral(var(t))"), r"\int t \,dx");
    }

    #[test]
    fn round_trips() {
        round_trip("sum(var(x), mul(num(-1), var(y)))");
        round_trip("sum(mul(num(3), pow(var(x), num(2))), num(-5))");
        round_trip("fraq(sum(var(x), num(1)), mul(var(y), var(z)))");
        round_trip("pow(num(E), mul(num(1/2), var(x)))");
        round_trip("pow(udf(sin, var(x)), num(2))");
        round_trip("log(sum(var(x), num(1)), num(10))");
        round_trip("integral(pow(var(x), num(2)), num(0), var(b))");
        round_trip("integral(sum(var(x), num(1)), var(x), var(x))");
        round_trip("mul(num(2), integral(var(t), num(0), num(1)))");
        round_trip("udf(max, var(a), var(b))");
        round_trip("pow(var(x_1), var(alpha))");
    }
}
