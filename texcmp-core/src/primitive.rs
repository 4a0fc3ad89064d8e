//! Functions to construct [`Integer`]s, [`Rational`]s, and [`Float`]s from various types.

use rug::{ops::Pow, Float, Integer, Rational};
use std::cmp::Ordering;

/// The number of bits of precision to use when computing logarithms of rationals.
pub const PRECISION: u32 = 1 << 8;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates the [`Rational`] `num / den` in lowest terms. Returns [`None`] if the denominator is
/// zero.
pub fn ratio(num: Integer, den: Integer) -> Option<Rational> {
    if den.cmp0() == Ordering::Equal {
        None
    } else {
        Some(Rational::from((num, den)))
    }
}

/// Parses a base-10 integer, such as `-12`.
pub fn int_from_str(s: &str) -> Option<Integer> {
    if s.is_empty() {
        return None;
    }
    Integer::from_str_radix(s, 10).ok()
}

/// Parses a rational of the form `p` or `p/q`. Returns [`None`] if either part is not an integer
/// or the denominator is zero.
pub fn rational_from_str(s: &str) -> Option<Rational> {
    match s.split_once('/') {
        Some((num, den)) => ratio(int_from_str(num.trim())?, int_from_str(den.trim())?),
        None => int_from_str(s).map(rational),
    }
}

/// Converts a decimal literal such as `-0.25` or `.5` to the exact [`Rational`] it denotes.
pub fn rational_from_decimal(s: &str) -> Option<Rational> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }

    let all_digits = format!("{}{}", whole, frac);
    let num = int_from_str(&all_digits)?;
    let den = int(10).pow(u32::try_from(frac.len()).ok()?);
    let value = ratio(num, den)?;
    Some(if negative { -value } else { value })
}

/// Returns the natural logarithm of the absolute value of a non-zero rational.
///
/// The logarithm is computed with arbitrary precision, so it stays finite for values that do not
/// fit in an [`f64`].
pub fn ln_abs(r: &Rational) -> f64 {
    Float::with_val(PRECISION, r).abs().ln().to_f64()
}

/// Returns the rational as an [`i32`] if it is an integer that fits.
pub fn as_small_int(r: &Rational) -> Option<i32> {
    if *r.denom() == 1 {
        r.numer().to_i32()
    } else {
        None
    }
}
