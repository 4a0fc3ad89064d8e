//! Errors that can occur while parsing LaTeX.

use ariadne::Fmt;
use texcmp_attrs::ErrorKind;
use texcmp_error::{ErrorKind, EXPR};

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected `{}`", found),
    labels = [format!("expected {}", expected)],
)]
pub struct UnexpectedToken {
    /// A description of what was expected, such as "an expression" or "`}`".
    pub expected: &'static str,

    /// The lexeme that was found.
    pub found: String,
}

/// A grouping symbol was opened but never closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed group",
    labels = ["this group is never closed", "the input ends here"],
    help = format!("add a closing `{}`", close),
)]
pub struct UnclosedParenthesis {
    /// The symbol that would close the group.
    pub close: &'static str,
}

/// A brace group that must contain an expression is empty, such as the denominator in
/// `\frac{1}{}`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty group",
    labels = [format!("I expected an {} inside these braces", "expression".fg(EXPR))],
)]
pub struct EmptyGroup;

/// A command the parser does not know how to interpret.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown command `{}`", name),
    labels = ["this command"],
    help = "functions that are not built in can be written as `\\operatorname{name}(...)`",
)]
pub struct UnknownCommand {
    /// The command, including the backslash.
    pub name: String,
}

/// An integral is missing its differential, such as the `dx` in `\int x \,dx`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing differential",
    labels = ["this integral", "the integrand ends here"],
    help = "write the variable of integration at the end, like `\\,dx`",
)]
pub struct MissingDifferential;

/// A definite integral has a lower bound or an upper bound, but not both.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("missing {} bound", missing),
    labels = ["this integral"],
    help = "write both bounds, like `\\int_{a}^{b}`, or neither",
)]
pub struct MissingBound {
    /// Which bound is missing, `lower` or `upper`.
    pub missing: &'static str,
}

/// An equals sign appeared inside an equation or a subexpression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "nested equation",
    labels = ["this `=` is not allowed here"],
    note = "only one `=` is allowed, at the top level of the input",
)]
pub struct NestedEquation;
