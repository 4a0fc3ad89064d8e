//! The rewrite rules of the search engine.
//!
//! Each rule is a function that takes one node of a tree and returns `Some(expr)` with the
//! rewritten node if the rule applies, or `None` if it does not. A rule that applies always
//! returns a node different from its input. Rules keep the value of the expression, except where
//! their documentation says otherwise.
//!
//! The [`Rule`] enum lists the rules in declaration order, which is the order the search engine
//! tries them in and uses to break ties.

pub mod commute;
pub mod difference;
pub mod distribute;
pub mod factor;
pub mod fold;
pub mod fraction;
pub mod integral;
pub mod power;

use crate::grammar::Expr;
use std::fmt;

/// If the expression is a sum, calls the given transformation function with the terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_sum(expr: &Expr, f: impl FnOnce(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Sum(terms) = expr {
        f(terms)
    } else {
        None
    }
}

/// If the expression is a product, calls the given transformation function with the factors.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_product(expr: &Expr, f: impl FnOnce(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Product(factors) = expr {
        f(factors)
    } else {
        None
    }
}

/// If the expression is a fraction, calls the given transformation function with the numerator
/// and denominator.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_fraction(expr: &Expr, f: impl FnOnce(&Expr, &Expr) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Fraction(num, den) = expr {
        f(num, den)
    } else {
        None
    }
}

/// If the expression is a power, calls the given transformation function with the base and the
/// exponent.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_power(expr: &Expr, f: impl FnOnce(&Expr, &Expr) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Power(base, exp) = expr {
        f(base, exp)
    } else {
        None
    }
}

/// Returns the factors of an expression: the children of a product, or the expression itself.
pub(crate) fn factors_of(expr: &Expr) -> &[Expr] {
    match expr {
        Expr::Product(factors) => factors,
        other => std::slice::from_ref(other),
    }
}

/// Multiplies the given factors, splicing in the factors of nested products.
pub(crate) fn flat_product(factors: impl IntoIterator<Item = Expr>) -> Expr {
    let mut flat = Vec::new();
    for factor in factors {
        match factor {
            Expr::Product(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    Expr::product(flat)
}

/// Adds the given terms, splicing in the terms of nested sums.
pub(crate) fn flat_sum(terms: impl IntoIterator<Item = Expr>) -> Expr {
    let mut flat = Vec::new();
    for term in terms {
        match term {
            Expr::Sum(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    Expr::sum(flat)
}

/// A rewrite rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Reorders the children of a sum or product to line up with the other tree.
    Commute,

    /// `a*(b+c) = a*b + a*c`
    Distribute,

    /// `a*b + a*c = a*(b+c)`
    Factor,

    /// Reduces a fraction: numeric fractions, `a/1 = a`, `a/a = 1`, and shared factors.
    ReduceFraction,

    /// Folds numeric subexpressions into a single number.
    FoldConstants,

    /// `a*a^n = a^(n+1)`
    CombineFactors,

    /// `a^n = a*a*...*a` for small `n`
    ExpandPower,

    /// `a + (-1)*b = a - b`, in both directions.
    DifferenceForm,

    /// Folds numeric integral bounds into single numbers.
    NormalizeBounds,
}

impl Rule {
    /// All rules, in declaration order.
    pub const ALL: [Rule; 9] = [
        Rule::Commute,
        Rule::Distribute,
        Rule::Factor,
        Rule::ReduceFraction,
        Rule::FoldConstants,
        Rule::CombineFactors,
        Rule::ExpandPower,
        Rule::DifferenceForm,
        Rule::NormalizeBounds,
    ];

    /// Returns the name of the rule, as written in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Commute => "commute",
            Self::Distribute => "distribute",
            Self::Factor => "factor",
            Self::ReduceFraction => "reduce-fraction",
            Self::FoldConstants => "fold-constants",
            Self::CombineFactors => "combine-factors",
            Self::ExpandPower => "expand-power",
            Self::DifferenceForm => "difference-form",
            Self::NormalizeBounds => "normalize-bounds",
        }
    }

    /// Applies the rule to `node`. `counterpart` is the node at the same position in the other
    /// tree, if there is one.
    pub fn apply(self, node: &Expr, counterpart: Option<&Expr>) -> Option<Expr> {
        match self {
            Self::Commute => commute::commute(node, counterpart?),
            Self::Distribute => distribute::distribute(node),
            Self::Factor => factor::factor(node),
            Self::ReduceFraction => fraction::all(node),
            Self::FoldConstants => fold::all(node),
            Self::CombineFactors => power::combine_factors(node),
            Self::ExpandPower => power::expand_power(node),
            Self::DifferenceForm => difference::all(node),
            Self::NormalizeBounds => integral::normalize_bounds(node),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
