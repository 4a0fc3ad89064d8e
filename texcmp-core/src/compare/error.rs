use crate::search::Side;
use std::fmt;
use texcmp_attrs::ErrorKind;
use texcmp_error::{Error, ErrorKind};

/// A grammar string parsed back into a different tree than the one it was printed from.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "grammar string does not round-trip",
    labels = ["this string parses into a different tree"],
    note = "this is a bug in the canonical grammar",
)]
pub struct RoundTripMismatch;

/// An error that stops a comparison.
#[derive(Debug)]
pub enum CompareError {
    /// One of the inputs is empty.
    MissingInput(Side),

    /// One of the inputs is not valid LaTeX.
    Parse(Side, Error),

    /// One of the inputs contains a construct the canonical grammar cannot represent.
    Unsupported(Side, Error),

    /// A final tree did not survive the trip through its grammar string. The error's spans
    /// point into `grammar`.
    Internal {
        /// The grammar string that failed to round-trip.
        grammar: String,

        /// The error raised while recovering the tree.
        error: Error,
    },
}

impl CompareError {
    /// Returns the status code used for this error at a request boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingInput(_) => 400,
            Self::Parse(..) | Self::Unsupported(..) => 409,
            Self::Internal { .. } => 500,
        }
    }

    /// Returns the side of the input that caused the error, if the error came from an input.
    pub fn side(&self) -> Option<Side> {
        match self {
            Self::MissingInput(side) | Self::Parse(side, _) | Self::Unsupported(side, _) => Some(*side),
            Self::Internal { .. } => None,
        }
    }

    /// Report this error to stderr, highlighting whichever of the inputs caused it.
    pub fn report_to_stderr(&self, latex1: &str, latex2: &str) -> std::io::Result<()> {
        match self {
            Self::MissingInput(_) => {
                eprintln!("error: {}", self);
                Ok(())
            },
            Self::Parse(side, error) | Self::Unsupported(side, error) => {
                let input = match side {
                    Side::Left => latex1,
                    Side::Right => latex2,
                };
                error.report_to_stderr(side.input_name(), input)
            },
            Self::Internal { grammar, error } => error.report_to_stderr("grammar", grammar),
        }
    }

    /// Renders this error into a string, highlighting whichever of the inputs caused it.
    pub fn report_to_string(&self, latex1: &str, latex2: &str) -> String {
        match self {
            Self::MissingInput(_) => format!("error: {}\n", self),
            Self::Parse(side, error) | Self::Unsupported(side, error) => {
                let input = match side {
                    Side::Left => latex1,
                    Side::Right => latex2,
                };
                error.report_to_string(side.input_name(), input)
            },
            Self::Internal { grammar, error } => error.report_to_string("grammar", grammar),
        }
    }
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput(side) => write!(f, "missing LaTeX string: {}", side),
            Self::Parse(side, error) | Self::Unsupported(side, error) => {
                write!(f, "{}: {}", side, error.message())
            },
            Self::Internal { error, .. } => write!(f, "internal error: {}", error.message()),
        }
    }
}

impl std::error::Error for CompareError {}
