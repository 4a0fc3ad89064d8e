//! Structural similarity between two grammar trees.
//!
//! Two trees are aligned from the root down. Nodes with the same tag and arity match, and their
//! children are aligned pairwise in stored order; nodes that differ contribute nothing, along
//! with everything below them. Leaves contribute a score between 0 and 1. The total is divided
//! by the node weight of the larger tree, so identical trees score exactly 1 and any mismatch
//! costs at least the weight of the mismatched subtrees.
//!
//! The metric never reorders children. Finding the best order for the children of a sum or
//! product is left to the search engine's commute rule.

use crate::{
    grammar::{Expr, Number},
    primitive::ln_abs,
};
use std::cmp::Ordering;

/// Scores how close two numbers are, between 0 and 1.
///
/// Equal numbers score 1. A rational never matches a named constant. Two rationals of different
/// signs, or where exactly one is zero, score 0. Otherwise the score decays with the distance
/// between the logarithms of their magnitudes: `1 / (1 + |ln|a| - ln|b||)`.
pub fn number_similarity(a: &Number, b: &Number) -> f64 {
    match (a, b) {
        _ if a == b => 1.0,
        (Number::Rational(a), Number::Rational(b)) => {
            if a.cmp0() != b.cmp0() || a.cmp0() == Ordering::Equal {
                return 0.0;
            }

            let distance = (ln_abs(a) - ln_abs(b)).abs();
            (1.0 / (1.0 + distance)).clamp(0.0, 1.0)
        },
        _ => 0.0,
    }
}

/// Returns the total score of the aligned nodes of two trees.
///
/// This is at most the node weight of the smaller tree.
pub fn matched(a: &Expr, b: &Expr) -> f64 {
    match (a, b) {
        (Expr::Number(a), Expr::Number(b)) => number_similarity(a, b),
        (Expr::Variable(a), Expr::Variable(b)) => if a == b { 1.0 } else { 0.0 },
        (Expr::UserFunction(f, _), Expr::UserFunction(g, _)) if f != g => 0.0,
        _ if a.tag() == b.tag() && a.arity() == b.arity() => {
            1.0 + a.children()
                .into_iter()
                .zip(b.children())
                .map(|(a, b)| matched(a, b))
                .sum::<f64>()
        },
        _ => 0.0,
    }
}

/// The largest score two distinct trees can have.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Returns the similarity of two trees, between 0 and 1.
///
/// The score is 1 exactly when the trees are structurally equal. Two numbers that differ by a
/// tiny fraction of their magnitude can score 1 after rounding, so distinct trees are capped just
/// below it.
pub fn similarity(a: &Expr, b: &Expr) -> f64 {
    let weight = a.node_weight().max(b.node_weight());
    let score = (matched(a, b) / weight as f64).clamp(0.0, 1.0);
    if score >= 1.0 && a != b {
        BELOW_ONE
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use crate::{grammar::parse_grammar, primitive::rational};
    use super::*;

    fn sim(a: &str, b: &str) -> f64 {
        similarity(&parse_grammar(a).unwrap(), &parse_grammar(b).unwrap())
    }

    #[test]
    fn identical_trees() {
        assert_eq!(sim("var(x)", "var(x)"), 1.0);
        assert_eq!(sim(
            "sum(mul(num(2), var(x)), pow(var(y), num(1/2)))",
            "sum(mul(num(2), var(x)), pow(var(y), num(1/2)))",
        ), 1.0);
    }

    #[test]
    fn reordered_sum() {
        // the sum node matches; neither child does
        assert_float_absolute_eq!(sim("sum(var(x), var(y))", "sum(var(y), var(x))"), 1.0 / 3.0);
    }

    #[test]
    fn different_tags() {
        assert_eq!(sim("sum(var(x), var(y))", "mul(var(x), var(y))"), 0.0);
        assert_eq!(sim("var(x)", "num(1)"), 0.0);
    }

    #[test]
    fn different_arity() {
        assert_eq!(sim("sum(var(x), var(y))", "sum(var(x), var(y), var(z))"), 0.0);
    }

    #[test]
    fn larger_tree_sets_the_scale() {
        // pow, x, and 2 match out of 5 nodes in the larger tree
        assert_float_absolute_eq!(
            sim("pow(var(x), num(2))", "pow(var(x), sum(num(2), num(0)))"),
            2.0 / 5.0
        );
    }

    #[test]
    fn user_function_names_must_agree() {
        assert_eq!(sim("udf(sin, var(x))", "udf(cos, var(x))"), 0.0);
        assert_float_absolute_eq!(sim("udf(sin, var(x))", "udf(sin, var(y))"), 0.5);
    }

    #[test]
    fn numbers() {
        let two = Number::Rational(rational(2));
        let four = Number::Rational(rational(4));
        let neg = Number::Rational(rational(-2));
        let zero = Number::Rational(rational(0));
        let e = Number::Constant(crate::grammar::Constant::E);

        assert_eq!(number_similarity(&two, &two), 1.0);
        assert_eq!(number_similarity(&two, &neg), 0.0);
        assert_eq!(number_similarity(&two, &zero), 0.0);
        assert_eq!(number_similarity(&two, &e), 0.0);
        assert_float_absolute_eq!(
            number_similarity(&two, &four),
            1.0 / (1.0 + 2f64.ln()),
            1e-12
        );
    }

    #[test]
    fn nearly_equal_numbers_stay_below_one() {
        let huge = "num(100000000000000000000000000000000000000000)";
        let next = "num(100000000000000000000000000000000000000001)";
        assert!(sim(huge, next) < 1.0);
    }

    #[test]
    fn numbers_are_symmetric() {
        let a = Number::Rational(rational((3, 7)));
        let b = Number::Rational(rational(11));
        assert_eq!(number_similarity(&a, &b), number_similarity(&b, &a));
    }
}
