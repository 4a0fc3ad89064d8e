//! Comparing expressions read interactively or from standard input.

use crate::{error::Error, run_compare};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::io::BufRead;
use texcmp_core::ComparisonConfig;
use tracing::info;

/// Reads one pair of expressions. Returns `None` if the first line was blank.
fn read_pair(rl: &mut DefaultEditor) -> Result<Option<(String, String)>, ReadlineError> {
    let latex1 = rl.readline("latex1> ")?;
    if latex1.trim().is_empty() {
        return Ok(None);
    }
    rl.add_history_entry(&latex1)?;

    let latex2 = rl.readline("latex2> ")?;
    rl.add_history_entry(&latex2)?;
    Ok(Some((latex1, latex2)))
}

/// Runs the interactive mode until end of input or an interrupt.
pub fn run(config: &ComparisonConfig) -> Result<(), Error> {
    let mut rl = DefaultEditor::new()?;
    loop {
        match read_pair(&mut rl) {
            Ok(Some((latex1, latex2))) => {
                if let Err(err) = run_compare(&latex1, &latex2, config, false) {
                    err.report_to_stderr();
                }
                println!();
            },
            Ok(None) => (),
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => return Ok(()),
            Err(err) => return Err(err.into()),
        }
    }
}

/// Splits the non-blank lines of the input into pairs. A trailing line without a partner is
/// paired with an empty string.
fn pairs(lines: Vec<String>) -> Vec<(String, String)> {
    let mut lines = lines.into_iter().filter(|line| !line.trim().is_empty());
    let mut pairs = Vec::new();
    while let Some(latex1) = lines.next() {
        let latex2 = lines.next().unwrap_or_default();
        pairs.push((latex1, latex2));
    }
    pairs
}

/// Compares each pair of non-blank lines of the reader, reporting every failure as it happens.
pub fn compare_lines(reader: impl BufRead, config: &ComparisonConfig) -> Result<(), Error> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    let pairs = pairs(lines);
    info!(pairs = pairs.len(), "comparing lines from standard input");

    let mut failed = 0;
    for (latex1, latex2) in &pairs {
        if let Err(err) = run_compare(latex1, latex2, config, false) {
            err.report_to_stderr();
            failed += 1;
        }
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(Error::Failed { failed, total: pairs.len() })
    }
}
