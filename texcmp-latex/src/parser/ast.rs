//! The expression tree produced by the parser.
//!
//! The tree mirrors how a computer algebra system would present a parsed formula: it is already
//! flattened and lightly evaluated (see the [crate documentation](crate)). Nodes synthesized by
//! the parser, such as the `-1` factor introduced by subtraction, take the span of the operator
//! that produced them.

use std::ops::Range;

/// The value of a numeric literal, stored as the digits from the source.
///
/// Negative literals keep a leading `-`. The digits are not validated beyond what the tokenizer
/// guarantees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Number {
    /// An integer, such as `12` or `-3`.
    Integer(String),

    /// A decimal number, such as `0.5` or `-.25`.
    Decimal(String),

    /// A ratio of two integers, such as `\frac{1}{2}`; numerator then denominator. Only the
    /// numerator carries a sign.
    Rational(String, String),
}

impl Number {
    /// Returns the number multiplied by -1.
    pub fn negated(self) -> Self {
        fn flip(s: String) -> String {
            match s.strip_prefix('-') {
                Some(rest) => rest.to_string(),
                None => format!("-{}", s),
            }
        }

        match self {
            Self::Integer(s) => Self::Integer(flip(s)),
            Self::Decimal(s) => Self::Decimal(flip(s)),
            Self::Rational(n, d) => Self::Rational(flip(n), d),
        }
    }

    /// Returns true if the number is the integer `1`.
    pub fn is_one(&self) -> bool {
        matches!(self, Self::Integer(s) if s.trim_start_matches('0') == "1")
    }
}

/// A numeric literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    /// The value of the literal.
    pub value: Number,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// A variable, such as `x`, `\alpha`, or `x_1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LitSym {
    /// The name of the variable. Greek letters are named without the backslash, and subscripts
    /// are appended after an underscore (`x_1`).
    pub name: String,

    /// The region of the source code that this symbol was parsed from.
    pub span: Range<usize>,
}

/// Named mathematical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    /// Euler's number, written `e` or `\mathrm{e}`.
    E,

    /// `\pi`.
    Pi,

    /// `\infty`.
    Infinity,
}

/// A named constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LitConst {
    /// Which constant.
    pub constant: Constant,

    /// The region of the source code that this constant was parsed from.
    pub span: Range<usize>,
}

/// A flattened sum of two or more terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Add {
    /// The terms, in source order.
    pub terms: Vec<Expr>,

    /// The region of the source code that this sum was parsed from.
    pub span: Range<usize>,
}

/// A flattened product of two or more factors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mul {
    /// The factors, in source order. Divisors appear as powers with exponent `-1`.
    pub factors: Vec<Expr>,

    /// The region of the source code that this product was parsed from.
    pub span: Range<usize>,
}

/// An exponentiation, `base^{exp}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pow {
    /// The base.
    pub base: Box<Expr>,

    /// The exponent.
    pub exp: Box<Expr>,

    /// The region of the source code that this power was parsed from.
    pub span: Range<usize>,
}

/// A function call, such as `\sin x`, `f(x, y)`, or `\operatorname{sgn}(x)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// The name of the function, without backslash.
    pub name: String,

    /// The arguments.
    pub args: Vec<Expr>,

    /// The region of the source code that this call was parsed from.
    pub span: Range<usize>,
}

/// A logarithm. `\ln x` and `\log x` have no explicit base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    /// The value whose logarithm is taken.
    pub value: Box<Expr>,

    /// The explicit base, if any.
    pub base: Option<Box<Expr>>,

    /// The region of the source code that this logarithm was parsed from.
    pub span: Range<usize>,
}

/// An integral, `\int_{a}^{b} f \,dx` or `\int f \,dx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integral {
    /// The integrand.
    pub integrand: Box<Expr>,

    /// The variable of integration, taken from the differential.
    pub var: LitSym,

    /// The lower and upper bounds of a definite integral.
    pub bounds: Option<(Box<Expr>, Box<Expr>)>,

    /// The region of the source code that this integral was parsed from.
    pub span: Range<usize>,
}

/// An equation `lhs = rhs`. Equations only appear at the root of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    /// The left-hand side.
    pub lhs: Box<Expr>,

    /// The right-hand side.
    pub rhs: Box<Expr>,

    /// The region of the source code that this equation was parsed from.
    pub span: Range<usize>,
}

/// Any expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Literal),
    Symbol(LitSym),
    Constant(LitConst),
    Add(Add),
    Mul(Mul),
    Pow(Pow),
    Call(Call),
    Log(Log),
    Integral(Integral),
    Equation(Equation),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Literal(lit) => lit.span.clone(),
            Self::Symbol(sym) => sym.span.clone(),
            Self::Constant(c) => c.span.clone(),
            Self::Add(add) => add.span.clone(),
            Self::Mul(mul) => mul.span.clone(),
            Self::Pow(pow) => pow.span.clone(),
            Self::Call(call) => call.span.clone(),
            Self::Log(log) => log.span.clone(),
            Self::Integral(int) => int.span.clone(),
            Self::Equation(eq) => eq.span.clone(),
        }
    }

    /// Creates a numeric literal.
    pub fn number(value: Number, span: Range<usize>) -> Self {
        Self::Literal(Literal { value, span })
    }

    /// Creates the integer literal with the given value.
    pub fn integer(value: i64, span: Range<usize>) -> Self {
        Self::number(Number::Integer(value.to_string()), span)
    }

    /// Creates a variable.
    pub fn symbol(name: impl Into<String>, span: Range<usize>) -> Self {
        Self::Symbol(LitSym { name: name.into(), span })
    }

    /// If the expression is a numeric literal, returns its value.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Literal(lit) => Some(&lit.value),
            _ => None,
        }
    }

    /// Sums the given terms, flattening nested sums. A single term is returned as-is.
    pub fn add(terms: Vec<Expr>, span: Range<usize>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Self::Add(add) => flat.extend(add.terms),
                other => flat.push(other),
            }
        }

        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Self::Add(Add { terms: flat, span })
        }
    }

    /// Multiplies the given factors, flattening nested products. A single factor is returned
    /// as-is.
    pub fn mul(factors: Vec<Expr>, span: Range<usize>) -> Self {
        let mut flat = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                Self::Mul(mul) => flat.extend(mul.factors),
                other => flat.push(other),
            }
        }

        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Self::Mul(Mul { factors: flat, span })
        }
    }

    /// Creates `base^{exp}`.
    pub fn pow(base: Expr, exp: Expr, span: Range<usize>) -> Self {
        Self::Pow(Pow { base: Box::new(base), exp: Box::new(exp), span })
    }

    /// Creates `expr^{-1}`, the representation of `1 / expr`. The `-1` takes the given
    /// operator span.
    pub fn recip(expr: Expr, op_span: Range<usize>) -> Self {
        let span = op_span.start.min(expr.span().start)..op_span.end.max(expr.span().end);
        Self::pow(expr, Self::integer(-1, op_span), span)
    }

    /// Negates the expression.
    ///
    /// Numeric literals are negated in place, a product whose first factor is a literal has
    /// that literal negated, and anything else is multiplied by a `-1` literal with the given
    /// operator span.
    pub fn neg(self, op_span: Range<usize>) -> Self {
        let span = op_span.start.min(self.span().start)..op_span.end.max(self.span().end);
        match self {
            Self::Literal(lit) => Self::number(lit.value.negated(), span),
            Self::Mul(mut mul) if matches!(mul.factors.first(), Some(Self::Literal(_))) => {
                if let Self::Literal(lit) = &mut mul.factors[0] {
                    lit.value = lit.value.clone().negated();
                }
                mul.span = span;
                Self::Mul(mul)
            },
            expr => Self::mul(vec![Self::integer(-1, op_span), expr], span),
        }
    }
}
