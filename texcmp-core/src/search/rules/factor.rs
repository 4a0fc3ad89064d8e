//! Factoring common factors out of sums.

use crate::grammar::Expr;
use super::{do_sum, factors_of};

/// Removes one occurrence of `factor` from the factors of `term`. Returns [`None`] if `term` does
/// not contain it.
fn remove_factor(term: &Expr, factor: &Expr) -> Option<Expr> {
    let factors = factors_of(term);
    let index = factors.iter().position(|f| f == factor)?;
    let mut rest = factors.to_vec();
    rest.remove(index);
    Some(Expr::product(rest))
}

/// `a*b + a*c = a*(b+c)`
///
/// The common factor is the first factor of the first term that every other term also contains.
/// A term that is exactly the common factor leaves `1` behind: `a + a*c = a*(1+c)`.
pub fn factor(expr: &Expr) -> Option<Expr> {
    do_sum(expr, |terms| {
        let (first, rest) = terms.split_first()?;
        factors_of(first).iter().find_map(|candidate| {
            let remaining = std::iter::once(first)
                .chain(rest)
                .map(|term| remove_factor(term, candidate))
                .collect::<Option<Vec<_>>>()?;
            Some(Expr::Product(vec![candidate.clone(), Expr::sum(remaining)]))
        })
    })
}
