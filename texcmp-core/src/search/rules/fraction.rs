//! Reducing fractions.

use crate::grammar::Expr;
use rug::Rational;
use super::{do_fraction, factors_of, flat_product};

/// Builds `num / den`, dropping a denominator of `1`.
fn make_fraction(num: Expr, den: Expr) -> Expr {
    if den.is_int(1) {
        num
    } else {
        Expr::fraction(num, den)
    }
}

/// Splits an expression into its leading rational coefficient and the remaining factors.
fn split_coefficient(expr: &Expr) -> (Rational, Vec<Expr>) {
    let factors = factors_of(expr);
    match factors.split_first() {
        Some((first, rest)) => match first.as_rational() {
            Some(r) => (r.clone(), rest.to_vec()),
            None => (Rational::from(1), factors.to_vec()),
        },
        None => (Rational::from(1), Vec::new()),
    }
}

/// Puts a coefficient back in front of the given factors. A coefficient of `1` is dropped.
fn with_coefficient(coefficient: Rational, factors: Vec<Expr>) -> Expr {
    if coefficient == 1 {
        Expr::product(factors)
    } else {
        flat_product(std::iter::once(Expr::from(coefficient)).chain(factors))
    }
}

/// `6/4 = 3/2`
pub fn numeric_fraction(expr: &Expr) -> Option<Expr> {
    do_fraction(expr, |num, den| {
        let num = num.as_rational()?;
        let den = den.as_rational()?;
        if den.cmp0().is_eq() {
            return None;
        }
        Some(Expr::from(Rational::from(num / den)))
    })
}

/// `a/1 = a`
pub fn divide_one(expr: &Expr) -> Option<Expr> {
    do_fraction(expr, |num, den| den.is_int(1).then(|| num.clone()))
}

/// `a/a = 1`
pub fn divide_self(expr: &Expr) -> Option<Expr> {
    do_fraction(expr, |num, den| (num == den).then(|| Expr::int(1)))
}

/// `(6*x)/(4*y) = (3*x)/(2*y)`
pub fn reduce_coefficients(expr: &Expr) -> Option<Expr> {
    do_fraction(expr, |num, den| {
        let (num_coefficient, num_rest) = split_coefficient(num);
        let (den_coefficient, den_rest) = split_coefficient(den);
        if den_coefficient.cmp0().is_eq() || (num_coefficient == 1 && den_coefficient == 1) {
            return None;
        }

        let ratio = num_coefficient / den_coefficient;
        let (ratio_num, ratio_den) = ratio.into_numer_denom();
        let reduced = make_fraction(
            with_coefficient(Rational::from(ratio_num), num_rest),
            with_coefficient(Rational::from(ratio_den), den_rest),
        );
        (reduced != *expr).then_some(reduced)
    })
}

/// `(a*b)/(a*c) = b/c`
///
/// Only the first factor of the numerator that also appears in the denominator is cancelled.
pub fn cancel_factor(expr: &Expr) -> Option<Expr> {
    do_fraction(expr, |num, den| {
        let num_factors = factors_of(num);
        let den_factors = factors_of(den);
        let (i, j) = num_factors.iter()
            .enumerate()
            .find_map(|(i, f)| den_factors.iter().position(|g| f == g).map(|j| (i, j)))?;

        let mut num_rest = num_factors.to_vec();
        num_rest.remove(i);
        let mut den_rest = den_factors.to_vec();
        den_rest.remove(j);
        Some(make_fraction(Expr::product(num_rest), Expr::product(den_rest)))
    })
}

/// Applies all fraction rules.
pub fn all(expr: &Expr) -> Option<Expr> {
    numeric_fraction(expr)
        .or_else(|| divide_one(expr))
        .or_else(|| divide_self(expr))
        .or_else(|| reduce_coefficients(expr))
        .or_else(|| cancel_factor(expr))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::grammar::parse_grammar;
    use super::*;

    fn reduced(text: &str) -> Option<String> {
        all(&parse_grammar(text).unwrap()).map(|expr| expr.to_string())
    }

    #[test]
    fn numeric() {
        assert_eq!(reduced("fraq(num(6), num(4))").as_deref(), Some("num(3/2)"));
        assert_eq!(reduced("fraq(num(1), num(0))"), None);
    }

    #[test]
    fn trivial_denominators() {
        assert_eq!(reduced("fraq(var(x), num(1))").as_deref(), Some("var(x)"));
        assert_eq!(reduced("fraq(sum(var(x), num(1)), sum(var(x), num(1)))").as_deref(), Some("num(1)"));
    }

    #[test]
    fn coefficients() {
        assert_eq!(
            reduced("fraq(mul(num(6), var(x)), mul(num(4), var(y)))").as_deref(),
            Some("fraq(mul(num(3), var(x)), mul(num(2), var(y)))"),
        );
        assert_eq!(
            reduced("fraq(mul(num(2), var(x)), num(2))").as_deref(),
            Some("var(x)"),
        );
    }

    #[test]
    fn shared_factor() {
        assert_eq!(
            reduced("fraq(mul(var(a), var(b)), mul(var(c), var(a)))").as_deref(),
            Some("fraq(var(b), var(c))"),
        );
        assert_eq!(reduced("fraq(var(a), mul(var(a), var(c)))").as_deref(), Some("fraq(num(1), var(c))"));
    }

    #[test]
    fn irreducible() {
        assert_eq!(reduced("fraq(var(x), var(y))"), None);
        assert_eq!(reduced("fraq(mul(num(3), var(x)), mul(num(2), var(y)))"), None);
    }
}
