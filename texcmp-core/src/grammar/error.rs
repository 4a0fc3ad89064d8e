//! Errors produced when parsing a grammar string.
//!
//! A grammar string that fails to parse is a defect of whatever produced it, since every string
//! this crate writes is valid by construction.

use texcmp_attrs::ErrorKind;
use texcmp_error::ErrorKind;

/// The parentheses of a grammar string do not balance.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unbalanced parentheses",
    labels = ["this parenthesis has no partner"],
)]
pub struct UnbalancedParentheses;

/// A node tag that is not part of the grammar.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown tag `{}`", tag),
    labels = ["this tag"],
    help = "valid tags are: num, var, sum, mul, fraq, pow, integral, log, sub, udf",
)]
pub struct UnknownTag {
    /// The tag that was found.
    pub tag: String,
}

/// A node has the wrong number of arguments for its tag.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` expects {} argument(s), found {}", tag, expected, found),
    labels = ["this node"],
)]
pub struct WrongArity {
    /// The tag of the node.
    pub tag: &'static str,

    /// A description of the accepted argument counts.
    pub expected: &'static str,

    /// The number of arguments that were found.
    pub found: usize,
}

/// The argument of a `num` node is not a rational number or `E`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", text),
    labels = ["this number"],
    help = "numbers are written as `p`, `p/q` with a non-zero `q`, or `E`",
)]
pub struct InvalidNumber {
    /// The text of the number.
    pub text: String,
}

/// The name of a variable or function contains characters that a name cannot hold.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid name `{}`", name),
    labels = ["this name"],
    note = "names cannot contain parentheses, commas, or whitespace",
)]
pub struct InvalidName {
    /// The offending name.
    pub name: String,
}

/// An argument of a node is empty, as in `sum(var(x), )`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty argument",
    labels = ["an argument is missing here"],
)]
pub struct EmptyArgument;

/// Text follows the closing parenthesis of a node.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected text after node",
    labels = ["this text is not part of any node"],
)]
pub struct TrailingCharacters;
