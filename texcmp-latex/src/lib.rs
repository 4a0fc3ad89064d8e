//! A parser for the subset of LaTeX used to write down single mathematical expressions, such as
//! `\frac{x^2 + 1}{2} = \int_0^1 t \,dt`.
//!
//! The produced [`Expr`] tree is *evaluated* in a light sense: sums and products are flattened,
//! subtraction is addition of a term multiplied by `-1`, division is multiplication by a power
//! with exponent `-1`, and trivially numeric constructs like `\frac{1}{2}` or `-3` become single
//! numeric literals. Every node keeps the span of source it was parsed from, so later stages can
//! point errors back at the input.
//!
//! ```
//! use texcmp_latex::{parse, parser::ast::Expr};
//!
//! let expr = parse(r"x - \frac{y}{2}").unwrap();
//! assert!(matches!(expr, Expr::Add(_)));
//! ```

pub mod functions;
pub mod parser;
pub mod tokenizer;

pub use functions::FunctionTable;
pub use parser::{parse, parse_with, Parser};
