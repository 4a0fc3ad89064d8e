use texcmp_attrs::ErrorKind;
use texcmp_error::ErrorKind;

/// The expression contains a construct the canonical grammar cannot represent.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot compare {}", construct),
    labels = ["this part of the expression is not supported"],
    help = "only rational numbers, `e`, variables, and the usual operations can be compared",
)]
pub struct UnsupportedExpression {
    /// A description of the unsupported construct.
    pub construct: &'static str,
}
