//! Folding numeric subexpressions.

use crate::{grammar::Expr, primitive::as_small_int};
use rug::{ops::Pow, Rational};
use super::{do_fraction, do_power, do_product, do_sum};

/// The largest exponent magnitude that [`power`] will fold.
pub const MAX_FOLDED_EXPONENT: u32 = 64;

/// The most bits the numerator or denominator of a folded power may need.
pub const MAX_FOLDED_BITS: u64 = 4096;

/// Computes `base ^ exp` for an integer exponent no larger than [`MAX_FOLDED_EXPONENT`] in
/// magnitude. Returns [`None`] for other exponents, for zero raised to a negative power, and when
/// the result could need more than [`MAX_FOLDED_BITS`] bits.
pub fn power(base: &Rational, exp: &Rational) -> Option<Rational> {
    let exp = as_small_int(exp)?;
    let magnitude = exp.unsigned_abs();
    if magnitude > MAX_FOLDED_EXPONENT || (base.cmp0().is_eq() && exp < 0) {
        return None;
    }

    let bits = base.numer().significant_bits().max(base.denom().significant_bits());
    if u64::from(bits) * u64::from(magnitude) > MAX_FOLDED_BITS {
        return None;
    }
    Some(base.clone().pow(exp))
}

/// Evaluates an expression built only from rationals, sums, products, differences, fractions,
/// and powers that [`power`] can fold.
pub fn evaluate(expr: &Expr) -> Option<Rational> {
    match expr {
        Expr::Number(_) => expr.as_rational().cloned(),
        Expr::Sum(terms) => terms.iter()
            .try_fold(Rational::new(), |acc, term| Some(acc + evaluate(term)?)),
        Expr::Product(factors) => factors.iter()
            .try_fold(Rational::from(1), |acc, factor| Some(acc * evaluate(factor)?)),
        Expr::Difference(lhs, rhs) => Some(evaluate(lhs)? - evaluate(rhs)?),
        Expr::Fraction(num, den) => {
            let den = evaluate(den)?;
            if den.cmp0().is_eq() {
                return None;
            }
            Some(evaluate(num)? / den)
        },
        Expr::Power(base, exp) => power(&evaluate(base)?, &evaluate(exp)?),
        _ => None,
    }
}

/// `2 + x + 3 = 5 + x`
///
/// The folded number takes the place of the first numeric term. A folded `0` is dropped unless
/// nothing else remains.
pub fn fold_sum(expr: &Expr) -> Option<Expr> {
    do_sum(expr, |terms| {
        let first = terms.iter().position(|term| term.as_rational().is_some())?;
        if terms.iter().filter(|term| term.as_rational().is_some()).count() < 2 {
            return None;
        }

        let total = terms.iter()
            .filter_map(Expr::as_rational)
            .fold(Rational::new(), |acc, r| acc + r);
        let mut new_terms = terms.iter()
            .enumerate()
            .filter(|(i, term)| *i == first || term.as_rational().is_none())
            .map(|(_, term)| term.clone())
            .collect::<Vec<_>>();
        if total.cmp0().is_eq() && new_terms.len() > 1 {
            new_terms.remove(first);
        } else {
            new_terms[first] = Expr::from(total);
        }
        Some(Expr::sum(new_terms))
    })
}

/// `2 * x * 3 = 6 * x`
///
/// The folded number takes the place of the first numeric factor. A folded `1` is dropped
/// unless nothing else remains, and a folded `0` absorbs the whole product.
pub fn fold_product(expr: &Expr) -> Option<Expr> {
    do_product(expr, |factors| {
        let first = factors.iter().position(|factor| factor.as_rational().is_some())?;
        if factors.iter().filter(|factor| factor.as_rational().is_some()).count() < 2 {
            return None;
        }

        let total = factors.iter()
            .filter_map(Expr::as_rational)
            .fold(Rational::from(1), |acc, r| acc * r);
        if total.cmp0().is_eq() {
            return Some(Expr::int(0));
        }

        let mut new_factors = factors.iter()
            .enumerate()
            .filter(|(i, factor)| *i == first || factor.as_rational().is_none())
            .map(|(_, factor)| factor.clone())
            .collect::<Vec<_>>();
        if total == 1 && new_factors.len() > 1 {
            new_factors.remove(first);
        } else {
            new_factors[first] = Expr::from(total);
        }
        Some(Expr::product(new_factors))
    })
}

/// `2^3 = 8`
pub fn fold_power(expr: &Expr) -> Option<Expr> {
    do_power(expr, |base, exp| {
        power(base.as_rational()?, exp.as_rational()?).map(Expr::from)
    })
}

/// `3/6 = 1/2`
pub fn fold_fraction(expr: &Expr) -> Option<Expr> {
    do_fraction(expr, |num, den| {
        let (num, den) = (num.as_rational()?, den.as_rational()?);
        if den.cmp0().is_eq() {
            return None;
        }
        Some(Expr::from(Rational::from(num / den)))
    })
}

/// `5 - 2 = 3`
pub fn fold_difference(expr: &Expr) -> Option<Expr> {
    if let Expr::Difference(lhs, rhs) = expr {
        let value = Rational::from(lhs.as_rational()? - rhs.as_rational()?);
        Some(Expr::from(value))
    } else {
        None
    }
}

/// Applies all folding rules.
pub fn all(expr: &Expr) -> Option<Expr> {
    fold_sum(expr)
        .or_else(|| fold_product(expr))
        .or_else(|| fold_power(expr))
        .or_else(|| fold_fraction(expr))
        .or_else(|| fold_difference(expr))
}
