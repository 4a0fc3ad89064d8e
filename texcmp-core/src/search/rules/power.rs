//! Rules for powers and repeated factors.

use crate::{grammar::Expr, primitive::as_small_int};
use rug::Rational;
use super::{do_power, do_product, flat_product};

/// The exponents [`expand_power`] will expand.
const EXPANDABLE: std::ops::RangeInclusive<i32> = 2..=4;

/// Splits a factor into its base and rational exponent. A factor that is not a power with a
/// rational exponent has exponent `1`.
fn base_and_exponent(factor: &Expr) -> (&Expr, Rational) {
    match factor {
        Expr::Power(base, exp) => match exp.as_rational() {
            Some(exp) => (base.as_ref(), exp.clone()),
            None => (factor, Rational::from(1)),
        },
        _ => (factor, Rational::from(1)),
    }
}

/// `a*a = a^2`
/// `a*a^n = a^(n+1)`
/// `a^m*a^n = a^(m+n)`
///
/// Only the first pair of factors with the same base is combined. The combined factor takes the
/// place of the first of the pair.
pub fn combine_factors(expr: &Expr) -> Option<Expr> {
    do_product(expr, |factors| {
        let split = factors.iter().map(base_and_exponent).collect::<Vec<_>>();
        let (i, j) = (0..split.len()).find_map(|i| {
            (i + 1..split.len())
                .find(|&j| split[i].0 == split[j].0)
                .map(|j| (i, j))
        })?;

        let base = split[i].0.clone();
        let exp = Rational::from(&split[i].1 + &split[j].1);
        let mut new_factors = factors.to_vec();
        new_factors.remove(j);
        if exp.cmp0().is_eq() {
            new_factors.remove(i);
        } else if exp == 1 {
            new_factors[i] = base;
        } else {
            new_factors[i] = Expr::power(base, Expr::from(exp));
        }
        Some(Expr::product(new_factors))
    })
}

/// `a^2 = a*a`, and likewise for exponents up to 4.
pub fn expand_power(expr: &Expr) -> Option<Expr> {
    do_power(expr, |base, exp| {
        let n = as_small_int(exp.as_rational()?)?;
        if !EXPANDABLE.contains(&n) {
            return None;
        }
        Some(flat_product(std::iter::repeat(base.clone()).take(n as usize)))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::grammar::parse_grammar;
    use super::*;

    fn combined(text: &str) -> Option<String> {
        combine_factors(&parse_grammar(text).unwrap()).map(|expr| expr.to_string())
    }

    fn expanded(text: &str) -> Option<String> {
        expand_power(&parse_grammar(text).unwrap()).map(|expr| expr.to_string())
    }

    #[test]
    fn square() {
        assert_eq!(combined("mul(var(x), var(x))").as_deref(), Some("pow(var(x), num(2))"));
    }

    #[test]
    fn add_exponents() {
        assert_eq!(
            combined("mul(num(3), pow(var(x), num(2)), var(y), var(x))").as_deref(),
            Some("mul(num(3), pow(var(x), num(3)), var(y))"),
        );
        assert_eq!(
            combined("mul(pow(var(x), num(1/2)), pow(var(x), num(1/2)))").as_deref(),
            Some("var(x)"),
        );
        assert_eq!(
            combined("mul(var(y), pow(var(x), num(-1)), var(x))").as_deref(),
            Some("var(y)"),
        );
    }

    #[test]
    fn nothing_to_combine() {
        assert_eq!(combined("mul(var(x), var(y))"), None);
        assert_eq!(combined("mul(pow(var(x), var(n)), var(x))"), None);
    }

    #[test]
    fn expand() {
        assert_eq!(expanded("pow(var(x), num(2))").as_deref(), Some("mul(var(x), var(x))"));
        assert_eq!(
            expanded("pow(mul(num(2), var(y)), num(2))").as_deref(),
            Some("mul(num(2), var(y), num(2), var(y))"),
        );
        assert_eq!(expanded("pow(var(x), num(5))"), None);
        assert_eq!(expanded("pow(var(x), num(1))"), None);
        assert_eq!(expanded("pow(var(x), var(n))"), None);
    }
}
