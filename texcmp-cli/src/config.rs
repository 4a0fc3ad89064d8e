//! The optional `texcmp.yml` configuration file.
//!
//! Every key is optional; missing keys fall back to the library defaults, and command-line flags
//! override whatever the file says.
//!
//! ```yaml
//! max_iterations: 500
//! timeout_ms: 2000
//! operations: [sin, cos, tan, sgn]
//! ```

use crate::error::Error;
use serde::Deserialize;
use std::{fs, path::{Path, PathBuf}, time::Duration};
use texcmp_core::ComparisonConfig;
use texcmp_latex::FunctionTable;
use tracing::debug;

/// The file read when no `--config` path is given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "texcmp.yml";

/// The contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// The most rewrite iterations a comparison may run.
    pub max_iterations: Option<usize>,

    /// The time budget of a comparison, in milliseconds.
    pub timeout_ms: Option<u64>,

    /// Function commands recognized in LaTeX input, without the leading backslash.
    pub operations: Option<Vec<String>>,
}

impl FileConfig {
    /// Parses a configuration from YAML source. An empty document is an empty configuration.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source)
    }

    /// Loads the configuration file at `path`, or [`DEFAULT_CONFIG_FILE`] if no path is given.
    ///
    /// An explicitly given file must exist. The default file is skipped silently when missing.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.is_file() {
            return Ok(Self::default());
        }

        let source = fs::read_to_string(&path)
            .map_err(|source| Error::ReadConfig { path: path.clone(), source })?;
        let config = Self::from_yaml(&source)
            .map_err(|source| Error::InvalidConfig { path: path.clone(), source })?;
        debug!(path = %path.display(), ?config, "loaded configuration file");
        Ok(config)
    }
}

/// Values given on the command line, which take precedence over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub max_iterations: Option<usize>,
    pub timeout_ms: Option<u64>,
}

/// Merges the file configuration and the command-line overrides into the settings of a
/// comparison.
pub fn resolve(file: FileConfig, overrides: Overrides) -> ComparisonConfig {
    let defaults = ComparisonConfig::default();
    ComparisonConfig {
        max_iterations: overrides.max_iterations
            .or(file.max_iterations)
            .unwrap_or(defaults.max_iterations),
        timeout: overrides.timeout_ms
            .or(file.timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout),
        operations: file.operations
            .map(FunctionTable::new)
            .unwrap_or(defaults.operations),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn empty_file() {
        assert_eq!(FileConfig::from_yaml("").unwrap(), FileConfig::default());
        assert_eq!(resolve(FileConfig::default(), Overrides::default()), ComparisonConfig::default());
    }

    #[test]
    fn full_file() {
        let config = FileConfig::from_yaml("
max_iterations: 50
timeout_ms: 250
operations: [sin, '\\sgn']
").unwrap();
        assert_eq!(config, FileConfig {
            max_iterations: Some(50),
            timeout_ms: Some(250),
            operations: Some(vec!["sin".to_string(), "\\sgn".to_string()]),
        });

        let resolved = resolve(config, Overrides::default());
        assert_eq!(resolved.max_iterations, 50);
        assert_eq!(resolved.timeout, Duration::from_millis(250));
        assert_eq!(resolved.operations, FunctionTable::new(["sin", "sgn"]));
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig {
            max_iterations: Some(50),
            timeout_ms: Some(250),
            operations: None,
        };
        let resolved = resolve(file, Overrides {
            max_iterations: Some(7),
            timeout_ms: None,
        });
        assert_eq!(resolved.max_iterations, 7);
        assert_eq!(resolved.timeout, Duration::from_millis(250));
        assert_eq!(resolved.operations, FunctionTable::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_yaml("max_iteration: 5").is_err());
        assert!(FileConfig::from_yaml("timeout_ms: soon").is_err());
    }

    #[test]
    fn missing_explicit_file() {
        let err = FileConfig::load(Some(Path::new("does/not/exist.yml"))).unwrap_err();
        assert!(matches!(err, Error::ReadConfig { .. }));
    }
}
