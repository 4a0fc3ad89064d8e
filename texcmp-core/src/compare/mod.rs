//! Comparing two LaTeX expressions end to end.
//!
//! [`compare`] parses both inputs, transcodes them to the canonical grammar, runs a [`Search`]
//! until it converges or the deadline passes, and prints the final trees back as LaTeX.

mod error;

pub use error::{CompareError, RoundTripMismatch};

use crate::{
    grammar::{parse_grammar, Expr},
    search::{Search, Side, Status},
    transcode::{to_grammar, to_latex_with},
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use texcmp_error::Error;
use texcmp_latex::{parse_with, FunctionTable};
use tracing::{debug, info, warn};

/// The default number of rewrite iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// The default time budget of a comparison.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonConfig {
    /// The most rewrite iterations the search may run.
    pub max_iterations: usize,

    /// The time budget of the whole comparison, measured from the call to [`compare`].
    pub timeout: Duration,

    /// The function commands recognized when parsing and printing LaTeX.
    pub operations: FunctionTable,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            timeout: DEFAULT_TIMEOUT,
            operations: FunctionTable::default(),
        }
    }
}

/// The result of a successful comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// The similarity of the final trees, between 0 and 1.
    pub similarity: f64,

    /// The status of the last snapshot that was consumed.
    pub status: Status,

    /// The number of search iterations that ran.
    pub iterations: usize,

    /// Time spent on the whole comparison.
    pub elapsed: Duration,

    /// The grammar string of the final first tree.
    pub grammar1: String,

    /// The grammar string of the final second tree.
    pub grammar2: String,

    /// The final first tree, printed as LaTeX.
    pub latex1: String,

    /// The final second tree, printed as LaTeX.
    pub latex2: String,
}

impl Comparison {
    /// Returns the similarity as a percentage with two decimals, such as `87.50%`.
    pub fn similarity_percent(&self) -> String {
        format!("{:.2}%", self.similarity * 100.0)
    }

    /// Returns the response body describing this result.
    pub fn to_response(&self) -> CompareResponse {
        CompareResponse {
            similarity: self.similarity_percent(),
            latex1: self.latex1.clone(),
            latex2: self.latex2.clone(),
        }
    }
}

/// The response body of a successful comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareResponse {
    /// The similarity as a percentage, such as `87.50%`.
    pub similarity: String,

    /// The final first expression.
    pub latex1: String,

    /// The final second expression.
    pub latex2: String,
}

/// The response body of a failed comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What went wrong.
    pub error: String,
}

impl From<&CompareError> for ErrorResponse {
    fn from(err: &CompareError) -> Self {
        Self { error: err.to_string() }
    }
}

/// Parses and transcodes one input.
fn transcode_input(side: Side, latex: &str, operations: &FunctionTable) -> Result<Expr, CompareError> {
    if latex.trim().is_empty() {
        warn!(input = %side, "input is empty");
        return Err(CompareError::MissingInput(side));
    }

    let ast = parse_with(latex, operations).map_err(|err| {
        warn!(input = %side, error = %err.message(), "could not parse input");
        CompareError::Parse(side, err)
    })?;
    to_grammar(&ast).map_err(|err| {
        warn!(input = %side, error = %err.message(), "input cannot be transcoded");
        CompareError::Unsupported(side, err)
    })
}

/// Recovers a tree from its grammar string, checking that it matches the tree it was printed
/// from.
fn recover(grammar: String, expected: &Expr) -> Result<Expr, CompareError> {
    let recovered = match parse_grammar(&grammar) {
        Ok(expr) => expr,
        Err(error) => return Err(CompareError::Internal { grammar, error }),
    };

    if recovered != *expected {
        let error = Error::new(vec![0..grammar.len()], RoundTripMismatch);
        return Err(CompareError::Internal { grammar, error });
    }
    Ok(recovered)
}

/// Compares two LaTeX expressions.
///
/// The search runs until it converges, until it has run `config.max_iterations` iterations, or
/// until `config.timeout` has elapsed since this call, whichever comes first. The deadline is
/// checked after every snapshot as well as inside the search, so a comparison never consumes
/// snapshots past it.
///
/// ```
/// use texcmp_core::compare::{compare, ComparisonConfig};
///
/// let result = compare("x + y", "y + x", &ComparisonConfig::default()).unwrap();
/// assert_eq!(result.similarity_percent(), "100.00%");
/// ```
pub fn compare(latex1: &str, latex2: &str, config: &ComparisonConfig) -> Result<Comparison, CompareError> {
    let start = Instant::now();
    info!(latex1, latex2, "comparison started");

    let left = transcode_input(Side::Left, latex1, &config.operations)?;
    let right = transcode_input(Side::Right, latex2, &config.operations)?;
    debug!(grammar1 = %left, grammar2 = %right, "inputs transcoded");

    let budget = config.timeout.saturating_sub(start.elapsed());
    let mut search = Search::new(left, right, config.max_iterations, budget);
    let mut status = Status::Continuing;
    let mut iterations = 0;

    for snapshot in search.by_ref() {
        debug!(
            iteration = snapshot.iteration,
            similarity = snapshot.similarity,
            status = ?snapshot.status,
            rule = snapshot.rewrite.as_ref().map(|r| r.rule.name()),
            side = snapshot.rewrite.as_ref().map(|r| r.side.input_name()),
            "snapshot"
        );
        status = snapshot.status;
        iterations = snapshot.iteration;

        if status.is_terminal() {
            break;
        }
        if start.elapsed() >= config.timeout {
            warn!(elapsed = ?start.elapsed(), iterations, "deadline passed before the search converged");
            status = Status::ConvergedPartial;
            break;
        }
    }

    let grammar1 = search.left().to_string();
    let grammar2 = search.right().to_string();
    debug!(grammar1 = %grammar1, grammar2 = %grammar2, "search finished");

    let left = recover(grammar1.clone(), search.left())?;
    let right = recover(grammar2.clone(), search.right())?;

    let comparison = Comparison {
        similarity: search.similarity(),
        status,
        iterations,
        elapsed: start.elapsed(),
        grammar1,
        grammar2,
        latex1: to_latex_with(&left, &config.operations),
        latex2: to_latex_with(&right, &config.operations),
    };
    info!(
        similarity = %comparison.similarity_percent(),
        status = ?comparison.status,
        iterations,
        elapsed = ?comparison.elapsed,
        "comparison finished"
    );
    Ok(comparison)
}
