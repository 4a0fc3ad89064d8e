//! Structural comparison of mathematical expressions written in LaTeX.
//!
//! Both inputs are parsed with [`texcmp_latex`] and transcoded into the canonical [`grammar`], a
//! small tagged tree. The [`search`] engine then rewrites the two trees, one rule application at
//! a time, to make them as [`similar`](similarity) as it can within an iteration and time budget.
//! The final trees are printed back as LaTeX.
//!
//! ```
//! use texcmp_core::compare::{compare, ComparisonConfig};
//!
//! let result = compare(r"x^2", r"x \cdot x", &ComparisonConfig::default()).unwrap();
//! assert_eq!(result.similarity_percent(), "100.00%");
//! assert_eq!(result.latex2, "x^{2}");
//! ```

pub mod compare;
pub mod grammar;
pub mod primitive;
pub mod search;
pub mod similarity;
pub mod transcode;

pub use compare::{compare, CompareError, CompareResponse, Comparison, ComparisonConfig, ErrorResponse};
pub use grammar::{parse_grammar, Expr};
pub use search::{Search, Side, Snapshot, Status};
pub use similarity::similarity;
pub use transcode::{to_grammar, to_latex, to_latex_with};
