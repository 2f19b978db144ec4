//! # manilint
//!
//! Lossless linter and fixer for resource manifests.
//!
//! This is the facade crate that re-exports the engine and the built-in
//! checks.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use manilint::RunOptions;
//!
//! let outcome = manilint::lint(source, RunOptions::fix())?;
//! for problem in &outcome.report.problems {
//!     eprintln!("{problem}");
//! }
//! std::fs::write(path, outcome.output)?;
//! ```
//!
//! ## Control Comments
//!
//! ```text
//! file { 'foo':
//!   ensure => file,
//!   mode  => '0644',  # lint:ignore:arrow-alignment
//! }
//!
//! # lint:ignore:all
//! ...
//! # lint:endignore
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use manilint::{Config, Linter};
//! use manilint::checks::all_checks;
//!
//! let config = Config::from_file("manilint.toml".as_ref())?;
//! let linter = Linter::builder().checks(all_checks()).config(config).build();
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use manilint_core::*;

/// Built-in checks and the check registry.
pub mod checks {
    pub use manilint_checks::*;
}

/// Builds a linter running every built-in check with default configuration.
#[must_use]
pub fn default_linter() -> Linter {
    linter_with_config(Config::default())
}

/// Builds a linter running every built-in check under `config`.
#[must_use]
pub fn linter_with_config(config: Config) -> Linter {
    Linter::builder()
        .checks(manilint_checks::all_checks())
        .config(config)
        .build()
}

/// Lints `source` with every built-in check.
///
/// # Errors
///
/// Returns [`LintError::Lex`] if the source cannot be tokenized.
pub fn lint(source: &str, options: RunOptions) -> Result<LintOutcome, LintError> {
    default_linter().lint(source, options)
}
