mod config;
mod error;
mod repl;

use clap::{Parser, Subcommand};
use config::{FileConfig, Overrides};
use error::Error;
use std::{io::{self, IsTerminal}, path::PathBuf, process::ExitCode};
use texcmp_core::{
    compare,
    parse_grammar,
    to_grammar,
    to_latex_with,
    Comparison,
    ComparisonConfig,
    ErrorResponse,
    Status,
};
use texcmp_latex::parse_with;
use tracing_subscriber::EnvFilter;

/// Compare LaTeX expressions by how closely their structure can be made to match.
#[derive(Debug, Parser)]
#[command(name = "texcmp", version, about)]
struct Cli {
    /// YAML configuration file [default: texcmp.yml, if present]
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// The most rewrite iterations a comparison may run
    #[arg(long, global = true)]
    max_iterations: Option<usize>,

    /// The time budget of a comparison, in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log more; repeat for more detail (`-v` info, `-vv` debug, `-vvv` trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare two LaTeX expressions
    Compare {
        latex1: String,
        latex2: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical grammar string of a LaTeX expression
    Grammar {
        latex: String,
    },

    /// Print a grammar string as LaTeX
    Latex {
        grammar: String,
    },

    /// List the recognized function commands
    Operations,
}

/// Installs the stderr log subscriber. `RUST_LOG` is used unless `-v` was given.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Describes how a search ended.
fn describe(status: Status) -> &'static str {
    match status {
        Status::ConvergedExact => "exact match",
        Status::ConvergedPartial => "partial match",
        Status::Continuing => "stopped early",
    }
}

/// Prints a comparison result in the human-readable format.
fn print_comparison(comparison: &Comparison) {
    println!(
        "similarity: {} ({} after {} iterations, {:.3}s)",
        comparison.similarity_percent(),
        describe(comparison.status),
        comparison.iterations,
        comparison.elapsed.as_secs_f64(),
    );
    println!("latex1: {}", comparison.latex1);
    println!("latex2: {}", comparison.latex2);
}

/// Compares two expressions and prints the result, either as text or as a JSON response body.
///
/// In JSON mode, errors are also printed to stdout as an error body before being returned.
fn run_compare(latex1: &str, latex2: &str, config: &ComparisonConfig, json: bool) -> Result<(), Error> {
    match compare(latex1, latex2, config) {
        Ok(comparison) => {
            if json {
                println!("{}", serde_json::to_string(&comparison.to_response())?);
            } else {
                print_comparison(&comparison);
            }
            Ok(())
        },
        Err(error) => {
            if json {
                println!("{}", serde_json::to_string(&ErrorResponse::from(&error))?);
            }
            Err(Error::Compare {
                error,
                latex1: latex1.to_string(),
                latex2: latex2.to_string(),
            })
        },
    }
}

/// Prints the grammar string of a LaTeX expression.
fn run_grammar(latex: &str, config: &ComparisonConfig) -> Result<(), Error> {
    let convert = |error| Error::Convert { error, src_id: "latex", input: latex.to_string() };
    let ast = parse_with(latex, &config.operations).map_err(convert)?;
    let expr = to_grammar(&ast).map_err(convert)?;
    println!("{}", expr);
    Ok(())
}

/// Prints a grammar string as LaTeX.
fn run_latex(grammar: &str, config: &ComparisonConfig) -> Result<(), Error> {
    let expr = parse_grammar(grammar)
        .map_err(|error| Error::Convert { error, src_id: "grammar", input: grammar.to_string() })?;
    println!("{}", to_latex_with(&expr, &config.operations));
    Ok(())
}

fn run(cli: Cli) -> Result<(), Error> {
    let file = FileConfig::load(cli.config.as_deref())?;
    let config = config::resolve(file, Overrides {
        max_iterations: cli.max_iterations,
        timeout_ms: cli.timeout_ms,
    });

    match cli.command {
        Some(Command::Compare { latex1, latex2, json }) => run_compare(&latex1, &latex2, &config, json),
        Some(Command::Grammar { latex }) => run_grammar(&latex, &config),
        Some(Command::Latex { grammar }) => run_latex(&grammar, &config),
        Some(Command::Operations) => {
            config.operations.names().for_each(|name| println!("\\{}", name));
            Ok(())
        },
        None if io::stdin().is_terminal() => repl::run(&config),
        None => repl::compare_lines(io::stdin().lock(), &config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report_to_stderr();
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compare_with_global_flags() {
        let cli = Cli::try_parse_from([
            "texcmp", "compare", "x^2", "x \\cdot x", "--json", "--max-iterations", "5", "-vv",
        ]).unwrap();
        assert_eq!(cli.max_iterations, Some(5));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Compare { latex1, latex2, json }) => {
                assert_eq!(latex1, "x^2");
                assert_eq!(latex2, "x \\cdot x");
                assert!(json);
            },
            other => panic!("expected compare, got {:?}", other),
        }
    }

    #[test]
    fn no_subcommand() {
        let cli = Cli::try_parse_from(["texcmp", "--timeout-ms", "100"]).unwrap();
        assert_eq!(cli.timeout_ms, Some(100));
        assert!(cli.command.is_none());
    }

    #[test]
    fn compare_needs_two_inputs() {
        assert!(Cli::try_parse_from(["texcmp", "compare", "x"]).is_err());
    }

    #[test]
    fn grammar_of_unsupported_input() {
        let err = run_grammar("\\pi", &ComparisonConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "latex: cannot compare the constant `\\pi`");
    }

    #[test]
    fn latex_of_invalid_grammar() {
        let err = run_latex("sum(var(x)", &ComparisonConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Convert { src_id: "grammar", .. }));
    }

    #[test]
    fn compare_errors_keep_inputs() {
        let err = run_compare("", "x", &ComparisonConfig::default(), false).unwrap_err();
        match err {
            Error::Compare { error, latex2, .. } => {
                assert_eq!(error.to_string(), "missing LaTeX string: latex1");
                assert_eq!(latex2, "x");
            },
            other => panic!("expected a comparison error, got {:?}", other),
        }
    }
}
