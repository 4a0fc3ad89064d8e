//! Converting between sums with a negated last term and differences.

use crate::grammar::Expr;
use rug::Rational;
use super::{do_sum, flat_product, flat_sum};

/// Returns `-expr`, folding the sign into a number or the leading coefficient of a product.
fn negate(expr: &Expr) -> Expr {
    if let Some(r) = expr.as_rational() {
        return Expr::from(Rational::from(-r));
    }

    match expr {
        Expr::Product(factors) => match factors.split_first() {
            Some((first, rest)) if first.as_rational().is_some() => {
                let negated = negate(first);
                if negated.is_int(1) {
                    Expr::product(rest.to_vec())
                } else {
                    flat_product(std::iter::once(negated).chain(rest.iter().cloned()))
                }
            },
            _ => flat_product([Expr::int(-1), expr.clone()]),
        },
        _ => flat_product([Expr::int(-1), expr.clone()]),
    }
}

/// Returns true if the expression carries a negative sign: a negative number or a product
/// whose leading factor is a negative number.
fn is_negated(expr: &Expr) -> bool {
    let leading = match expr {
        Expr::Product(factors) => factors.first(),
        other => Some(other),
    };
    leading
        .and_then(Expr::as_rational)
        .map_or(false, |r| r.cmp0().is_lt())
}

/// `a + (-1)*b = a - b`
/// `a + (-2)*b = a - 2*b`
/// `a + (-3) = a - 3`
///
/// Only the last term of the sum is considered.
pub fn sum_to_difference(expr: &Expr) -> Option<Expr> {
    do_sum(expr, |terms| {
        let (last, init) = terms.split_last()?;
        if !is_negated(last) {
            return None;
        }
        Some(Expr::difference(Expr::sum(init.to_vec()), negate(last)))
    })
}

/// `a - b = a + (-1)*b`
/// `a - 2*b = a + (-2)*b`
///
/// The inverse of [`sum_to_difference`].
pub fn difference_to_sum(expr: &Expr) -> Option<Expr> {
    if let Expr::Difference(lhs, rhs) = expr {
        Some(flat_sum([lhs.as_ref().clone(), negate(rhs)]))
    } else {
        None
    }
}

/// Applies all difference rules.
pub fn all(expr: &Expr) -> Option<Expr> {
    sum_to_difference(expr).or_else(|| difference_to_sum(expr))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::grammar::parse_grammar;
    use super::*;

    fn rewritten(text: &str) -> Option<String> {
        all(&parse_grammar(text).unwrap()).map(|expr| expr.to_string())
    }

    #[test]
    fn to_difference() {
        assert_eq!(
            rewritten("sum(var(x), mul(num(-1), var(y)))").as_deref(),
            Some("sub(var(x), var(y))"),
        );
        assert_eq!(
            rewritten("sum(var(a), var(b), mul(num(-2), var(c)))").as_deref(),
            Some("sub(sum(var(a), var(b)), mul(num(2), var(c)))"),
        );
        assert_eq!(rewritten("sum(var(x), num(-3))").as_deref(), Some("sub(var(x), num(3))"));
    }

    #[test]
    fn to_sum() {
        assert_eq!(
            rewritten("sub(var(x), var(y))").as_deref(),
            Some("sum(var(x), mul(num(-1), var(y)))"),
        );
        assert_eq!(
            rewritten("sub(sum(var(a), var(b)), mul(num(2), var(c)))").as_deref(),
            Some("sum(var(a), var(b), mul(num(-2), var(c)))"),
        );
        assert_eq!(
            rewritten("sub(var(x), mul(var(y), var(z)))").as_deref(),
            Some("sum(var(x), mul(num(-1), var(y), var(z)))"),
        );
    }

    #[test]
    fn positive_last_term() {
        assert_eq!(rewritten("sum(mul(num(-1), var(y)), var(x))"), None);
    }
}
