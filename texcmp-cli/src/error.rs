use rustyline::error::ReadlineError;
use std::{fmt, io, path::PathBuf};
use texcmp_core::CompareError;
use texcmp_error::Error as SourceError;

/// Utility enum to package errors that can occur while running a command.
#[derive(Debug)]
pub enum Error {
    /// The configuration file could not be read.
    ReadConfig {
        path: PathBuf,
        source: io::Error,
    },

    /// The configuration file is not valid YAML, or has unknown keys.
    InvalidConfig {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A comparison failed. The inputs are kept so the report can point into them.
    Compare {
        error: CompareError,
        latex1: String,
        latex2: String,
    },

    /// A single LaTeX or grammar string could not be converted.
    Convert {
        error: SourceError,
        src_id: &'static str,
        input: String,
    },

    /// Some of the comparisons read from standard input failed. Each was already reported.
    Failed {
        failed: usize,
        total: usize,
    },

    /// Line editing or reading standard input failed.
    Input(ReadlineError),

    /// JSON output could not be written.
    Json(serde_json::Error),
}

impl Error {
    /// Report this error to stderr. Errors that point into an input are rendered with `ariadne`.
    pub fn report_to_stderr(&self) {
        let result = match self {
            Self::Compare { error, latex1, latex2 } => error.report_to_stderr(latex1, latex2),
            Self::Convert { error, src_id, input } => error.report_to_stderr(src_id, input),
            other => {
                eprintln!("error: {}", other);
                Ok(())
            },
        };

        if let Err(err) = result {
            eprintln!("error: could not write report: {}", err);
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadConfig { path, source } => {
                write!(f, "could not read `{}`: {}", path.display(), source)
            },
            Self::InvalidConfig { path, source } => {
                write!(f, "invalid configuration in `{}`: {}", path.display(), source)
            },
            Self::Compare { error, .. } => write!(f, "{}", error),
            Self::Convert { error, src_id, .. } => write!(f, "{}: {}", src_id, error.message()),
            Self::Failed { failed, total } => {
                write!(f, "{} of {} comparisons failed", failed, total)
            },
            Self::Input(err) => write!(f, "{}", err),
            Self::Json(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<ReadlineError> for Error {
    fn from(err: ReadlineError) -> Self {
        Self::Input(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Input(ReadlineError::Io(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
