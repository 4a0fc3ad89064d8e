//! Reordering the children of commutative nodes.

use crate::{grammar::Expr, similarity::matched};

/// Reorders `children` so that each child of `target`, in order, is paired with the remaining
/// child that matches it best. Earlier children win ties.
///
/// Returns [`None`] if the order would not change.
fn align(children: &[Expr], target: &[Expr]) -> Option<Vec<Expr>> {
    let mut remaining = children.iter().collect::<Vec<_>>();
    let mut ordered = Vec::with_capacity(children.len());

    for goal in target {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, child) in remaining.iter().enumerate() {
            let score = matched(child, goal);
            if score > best_score {
                best = i;
                best_score = score;
            }
        }
        ordered.push(remaining.remove(best).clone());
    }

    if ordered.as_slice() == children {
        None
    } else {
        Some(ordered)
    }
}

/// Reorders the terms of a sum or the factors of a product to line up with the children of
/// `counterpart`, which must have the same tag and arity.
///
/// `y + x` against `x + y` becomes `x + y`.
pub fn commute(node: &Expr, counterpart: &Expr) -> Option<Expr> {
    match (node, counterpart) {
        (Expr::Sum(terms), Expr::Sum(target)) if terms.len() == target.len() => {
            align(terms, target).map(Expr::Sum)
        },
        (Expr::Product(factors), Expr::Product(target)) if factors.len() == target.len() => {
            align(factors, target).map(Expr::Product)
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::grammar::parse_grammar;
    use super::*;

    fn commuted(node: &str, counterpart: &str) -> Option<String> {
        let node = parse_grammar(node).unwrap();
        let counterpart = parse_grammar(counterpart).unwrap();
        commute(&node, &counterpart).map(|expr| expr.to_string())
    }

    #[test]
    fn swap_terms() {
        assert_eq!(
            commuted("sum(var(y), var(x))", "sum(var(x), var(y))").as_deref(),
            Some("sum(var(x), var(y))"),
        );
    }

    #[test]
    fn partial_matches_guide_the_order() {
        assert_eq!(
            commuted(
                "mul(pow(var(x), num(2)), num(3))",
                "mul(num(5), pow(var(x), num(3)))",
            ).as_deref(),
            Some("mul(num(3), pow(var(x), num(2)))"),
        );
    }

    #[test]
    fn already_aligned() {
        assert_eq!(commuted("sum(var(x), var(y))", "sum(var(x), var(z))"), None);
    }

    #[test]
    fn mismatched_shapes() {
        assert_eq!(commuted("sum(var(y), var(x))", "mul(var(x), var(y))"), None);
        assert_eq!(commuted("sum(var(y), var(x))", "sum(var(x), var(y), var(z))"), None);
    }
}
