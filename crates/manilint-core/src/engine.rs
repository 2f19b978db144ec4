//! Lint engine: runs the registered checks over one manifest.

use crate::check::{Check, CheckBox, RunContext};
use crate::config::Config;
use crate::lexer::{tokenize, LexError};
use crate::scope::build_blocks;
use crate::suppress::Suppressions;
use crate::token::TokenStream;
use crate::types::LintReport;

use thiserror::Error;
use tracing::{debug, info};

/// Errors that stop linting of a manifest.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum LintError {
    /// The manifest could not be tokenized; no checks ran.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),
}

/// Options of one lint invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Let checks repair the problems they find.
    pub fix: bool,
}

impl RunOptions {
    /// Report-only run.
    #[must_use]
    pub fn check() -> Self {
        Self { fix: false }
    }

    /// Run that repairs fixable problems.
    #[must_use]
    pub fn fix() -> Self {
        Self { fix: true }
    }
}

/// Result of linting one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOutcome {
    /// Rendered token stream: the input, plus any fixes.
    pub output: String,
    /// Problems in check registration order.
    pub report: LintReport,
    /// True if the output differs from the input.
    pub modified: bool,
}

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    checks: Vec<CheckBox>,
    config: Option<Config>,
}

impl LinterBuilder {
    /// Creates a new builder with no checks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a check to the pipeline.
    #[must_use]
    pub fn check<C: Check + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Appends a boxed check to the pipeline.
    #[must_use]
    pub fn check_box(mut self, check: CheckBox) -> Self {
        self.checks.push(check);
        self
    }

    /// Appends several boxed checks, keeping their order.
    #[must_use]
    pub fn checks<I>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = CheckBox>,
    {
        self.checks.extend(checks);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the linter.
    #[must_use]
    pub fn build(self) -> Linter {
        Linter {
            checks: self.checks,
            config: self.config.unwrap_or_default(),
        }
    }
}

/// Runs checks, in registration order, over manifests.
///
/// Use [`Linter::builder()`] to construct an instance.
pub struct Linter {
    checks: Vec<CheckBox>,
    config: Config,
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    /// Names of the checks that will run, in order.
    #[must_use]
    pub fn active_checks(&self) -> Vec<&'static str> {
        self.checks
            .iter()
            .map(|c| c.name())
            .filter(|name| self.config.is_check_enabled(name))
            .collect()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tokenizes `source`, runs every enabled check and renders the result.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Lex`] if the source cannot be tokenized.
    pub fn lint(&self, source: &str, options: RunOptions) -> Result<LintOutcome, LintError> {
        let mut tokens = tokenize(source)?;
        let report = self.lint_tokens(&mut tokens, options);
        let output = tokens.render();
        let modified = output != source;
        Ok(LintOutcome {
            output,
            report,
            modified,
        })
    }

    /// Runs every enabled check over an already tokenized manifest.
    ///
    /// Positions and the block tree are re-derived after each check that
    /// fixed something, so later checks never see stale columns.
    pub fn lint_tokens(&self, tokens: &mut TokenStream, options: RunOptions) -> LintReport {
        let suppressions = Suppressions::from_tokens(tokens);
        let ctx = RunContext::new(options.fix, &suppressions);
        let mut blocks = build_blocks(tokens);
        let mut report = LintReport::new();

        for check in &self.checks {
            let name = check.name();
            if !self.config.is_check_enabled(name) {
                debug!("Skipping disabled check: {}", name);
                continue;
            }

            let mut problems = check.run(tokens, &blocks, &ctx);
            let fixed_any = problems.iter().any(|p| p.fixed);

            let before = problems.len();
            problems.retain(|p| !suppressions.is_suppressed(name, p.location.line));
            if problems.len() < before {
                debug!("{}: {} problem(s) suppressed", name, before - problems.len());
            }

            if let Some(severity) = self.config.check_severity(name) {
                for p in &mut problems {
                    p.severity = severity;
                }
            }

            debug!("{}: {} problem(s)", name, problems.len());
            report.extend(problems);

            if fixed_any {
                tokens.reindex();
                blocks = build_blocks(tokens);
            }
        }

        info!(
            "Lint complete: {} problem(s), {} fixed",
            report.problems.len(),
            report.fixed_count()
        );
        report
    }
}
