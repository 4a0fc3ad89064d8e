//! The table of function commands the parser recognizes, such as `\sin` or `\max`.

use std::collections::BTreeSet;

/// Function commands recognized when no other table is configured.
pub const DEFAULT_FUNCTIONS: &[&str] = &[
    "arccos", "arccot", "arcsin", "arctan", "cos", "cosh", "cot", "coth", "csc", "deg", "det",
    "gcd", "max", "min", "sec", "sin", "sinh", "tan", "tanh",
];

/// Lowercase and uppercase Greek letter commands. These parse to variables named after the
/// letter, so `\alpha` becomes the variable `alpha`.
pub const GREEK_LETTERS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "omicron", "rho", "varrho", "sigma",
    "varsigma", "tau", "upsilon", "phi", "varphi", "chi", "psi", "omega", "Gamma", "Delta",
    "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi", "Omega",
];

/// Returns true if the given name (without backslash) is a Greek letter command.
pub fn is_greek_letter(name: &str) -> bool {
    GREEK_LETTERS.contains(&name)
}

/// The set of function command names (without the leading backslash) that parse as function
/// calls, e.g. `\sin x` or `\max(a, b)`.
///
/// Commands with dedicated syntax (`\frac`, `\sqrt`, `\int`, `\log`, `\ln`, `\exp`) are always
/// recognized and do not need to be listed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionTable {
    names: BTreeSet<String>,
}

impl FunctionTable {
    /// Creates a table from the given function names. Leading backslashes are stripped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter()
                .map(|name| name.as_ref().trim_start_matches('\\').to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// Returns true if the given name (with or without backslash) is a recognized function.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name.trim_start_matches('\\'))
    }

    /// Returns the recognized function names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns the number of recognized functions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no functions are recognized.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::new(DEFAULT_FUNCTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_backslashes() {
        let table = FunctionTable::new(["\\sin", "foo", ""]);
        assert!(table.contains("sin"));
        assert!(table.contains("\\foo"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn default_is_sorted() {
        let table = FunctionTable::default();
        let names = table.names().collect::<Vec<_>>();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(table.contains("tan"));
        assert!(!table.contains("frac"));
    }
}
