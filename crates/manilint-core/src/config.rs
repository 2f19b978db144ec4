//! Configuration types for manilint.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for manilint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rewrite manifests in place (default: false).
    #[serde(default)]
    pub fix: bool,

    /// Unfixed problems at or above this severity fail the run
    /// (default: error).
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// File discovery configuration.
    #[serde(default)]
    pub linter: LinterConfig,

    /// Per-check configurations, keyed by check name.
    #[serde(default)]
    pub checks: HashMap<String, CheckConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a check is enabled. Unlisted checks are enabled.
    #[must_use]
    pub fn is_check_enabled(&self, name: &str) -> bool {
        self.checks
            .get(name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a check.
    #[must_use]
    pub fn check_severity(&self, name: &str) -> Option<Severity> {
        self.checks.get(name).and_then(|c| c.severity)
    }

    /// Disables the named check.
    pub fn disable(&mut self, name: &str) {
        self.checks.entry(name.to_string()).or_default().enabled = Some(false);
    }

    /// Severity threshold for a failing run.
    #[must_use]
    pub fn fail_threshold(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }
}

/// File discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Glob patterns to exclude from linting.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// File extensions to lint, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            respect_gitignore: true,
            extensions: default_extensions(),
        }
    }
}

fn default_exclude() -> Vec<String> {
    vec!["**/vendor/**".to_string(), "**/spec/fixtures/**".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec!["pp".to_string()]
}

fn default_true() -> bool {
    true
}

/// Per-check configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Whether this check is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this check.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.fix);
        assert!(config.linter.respect_gitignore);
        assert_eq!(config.linter.extensions, vec!["pp"]);
        assert!(config.checks.is_empty());
        assert_eq!(config.fail_threshold(), Severity::Error);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fix = true
fail_on = "warning"

[linter]
exclude = ["**/generated/**"]

[checks.arrow-alignment]
enabled = true
severity = "error"

[checks.trailing-comma]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert!(config.fix);
        assert_eq!(config.fail_threshold(), Severity::Warning);
        assert_eq!(config.linter.exclude, vec!["**/generated/**"]);
        assert!(config.is_check_enabled("arrow-alignment"));
        assert!(!config.is_check_enabled("trailing-comma"));
        assert!(config.is_check_enabled("unlisted"));
        assert_eq!(
            config.check_severity("arrow-alignment"),
            Some(Severity::Error)
        );
    }

    #[test]
    fn test_disable() {
        let mut config = Config::default();
        config.disable("trailing-comma");
        assert!(!config.is_check_enabled("trailing-comma"));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("fix = \"maybe\"").expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
