//! Distributing products over sums.

use crate::grammar::Expr;
use super::{do_product, flat_product, flat_sum};

/// `a*(b+c) = a*b + a*c`
///
/// Only the first sum among the factors is distributed over, and only one level deep.
pub fn distribute(expr: &Expr) -> Option<Expr> {
    do_product(expr, |factors| {
        let index = factors.iter().position(|factor| matches!(factor, Expr::Sum(_)))?;
        let Expr::Sum(terms) = &factors[index] else {
            return None;
        };

        let distributed = terms.iter()
            .map(|term| {
                let mut new_factors = factors.to_vec();
                new_factors[index] = term.clone();
                flat_product(new_factors)
            })
            .collect::<Vec<_>>();
        Some(flat_sum(distributed))
    })
}
