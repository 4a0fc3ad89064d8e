//! Normalizing integral bounds.

use crate::grammar::Expr;
use super::fold::evaluate;

/// Folds a bound into a single number, if it is numeric but not already a number.
fn fold_bound(bound: &Expr) -> Option<Expr> {
    if matches!(bound, Expr::Number(_)) {
        return None;
    }
    evaluate(bound).map(Expr::from)
}

/// `int_{1+1}^{2*3} f = int_{2}^{6} f`
///
/// Bounds are never swapped, and the sign of the integral is never changed.
pub fn normalize_bounds(expr: &Expr) -> Option<Expr> {
    let Expr::Integral(integrand, Some((lower, upper))) = expr else {
        return None;
    };

    let new_lower = fold_bound(lower);
    let new_upper = fold_bound(upper);
    if new_lower.is_none() && new_upper.is_none() {
        return None;
    }

    Some(Expr::integral(
        integrand.as_ref().clone(),
        Some((
            new_lower.unwrap_or_else(|| lower.as_ref().clone()),
            new_upper.unwrap_or_else(|| upper.as_ref().clone()),
        )),
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::grammar::parse_grammar;
    use super::*;

    fn normalized(text: &str) -> Option<String> {
        normalize_bounds(&parse_grammar(text).unwrap()).map(|expr| expr.to_string())
    }

    #[test]
    fn fold_numeric_bounds() {
        assert_eq!(
            normalized("integral(var(t), sum(num(1), num(1)), mul(num(2), num(3)))").as_deref(),
            Some("integral(var(t), num(2), num(6))"),
        );
        assert_eq!(
            normalized("integral(var(t), num(0), fraq(num(2), num(4)))").as_deref(),
            Some("integral(var(t), num(0), num(1/2))"),
        );
    }

    #[test]
    fn bounds_stay_in_order() {
        assert_eq!(
            normalized("integral(var(t), num(5), sub(num(3), num(2)))").as_deref(),
            Some("integral(var(t), num(5), num(1))"),
        );
    }

    #[test]
    fn nothing_to_fold() {
        assert_eq!(normalized("integral(var(t), num(0), var(b))"), None);
        assert_eq!(normalized("integral(var(t))"), None);
        assert_eq!(normalized("integral(var(t), var(x), var(x))"), None);
    }

    #[test]
    fn oversized_bounds_stay_unfolded() {
        let tower = "pow(pow(pow(pow(pow(num(10), num(64)), num(64)), num(64)), num(64)), num(64))";
        assert_eq!(normalized(&format!("integral(var(t), num(0), {})", tower)), None);
    }
}
