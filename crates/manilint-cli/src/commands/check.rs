//! Check command implementation.

use anyhow::{Context, Result};
use manilint_checks::select_checks;
use manilint_core::{LintError, Linter, RunOptions};
use miette::{NamedSource, Report};
use std::path::{Path, PathBuf};

use super::output::{self, FileReport};
use crate::config_resolver;
use crate::discover::discover_files;
use crate::OutputFormat;

/// Arguments of `manilint check`.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// File or directory to lint.
    pub path: PathBuf,
    /// Rewrite fixed files.
    pub fix: bool,
    /// Output format.
    pub format: OutputFormat,
    /// Only run these checks.
    pub only: Vec<String>,
    /// Skip these checks.
    pub disable: Vec<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
}

/// Totals of one `check` run.
#[derive(Debug, Default)]
pub struct Summary {
    /// Per-file problems.
    pub files: Vec<FileReport>,
    /// Manifests that could not be tokenized.
    pub failed: usize,
    /// Manifests rewritten on disk.
    pub written: usize,
}

/// Runs the check command and prints the results.
///
/// Returns `false` if an unfixed problem at or above the configured
/// threshold remains, or if a manifest failed to tokenize.
pub fn run(args: &CheckArgs, explicit_config: Option<&Path>) -> Result<bool> {
    let source = config_resolver::resolve(&args.path, explicit_config);
    let config = source.load()?;
    let threshold = config.fail_threshold();

    let summary = lint_path(args, config)?;
    output::print(&summary.files, args.format)?;

    let failing = summary
        .files
        .iter()
        .any(|f| f.report.has_unfixed_at(threshold));
    Ok(!failing && summary.failed == 0)
}

/// Lints every manifest under `args.path`, writing fixes if requested.
pub fn lint_path(args: &CheckArgs, config: manilint_core::Config) -> Result<Summary> {
    let fix = args.fix || config.fix;
    let files = discover_files(&args.path, &config.linter, &args.exclude)?;
    let checks = select_checks(&args.only, &args.disable)?;
    let linter = Linter::builder().checks(checks).config(config).build();

    tracing::info!(
        "Linting {} file(s) with {} check(s)",
        files.len(),
        linter.active_checks().len()
    );

    let options = if fix {
        RunOptions::fix()
    } else {
        RunOptions::check()
    };

    let mut summary = Summary::default();
    for path in files {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        match linter.lint(&text, options) {
            Ok(outcome) => {
                if fix && outcome.modified {
                    std::fs::write(&path, &outcome.output)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::debug!("Rewrote {}", path.display());
                    summary.written += 1;
                }
                summary.files.push(FileReport {
                    path,
                    report: outcome.report,
                });
            }
            Err(LintError::Lex(err)) => {
                let report = Report::new(err)
                    .with_source_code(NamedSource::new(path.display().to_string(), text));
                eprintln!("{report:?}");
                summary.failed += 1;
            }
        }
    }

    if summary.written > 0 {
        tracing::info!("Fixed {} file(s)", summary.written);
    }
    Ok(summary)
}
