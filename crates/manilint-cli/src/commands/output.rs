//! Shared output formatting for lint results.

use anyhow::Result;
use manilint_core::{LintReport, Severity};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::OutputFormat;

/// Problems found in one manifest.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Manifest path as discovered.
    pub path: PathBuf,
    /// Problems, in check order.
    #[serde(flatten)]
    pub report: LintReport,
}

/// Print lint results to stdout in the specified format.
pub fn print(results: &[FileReport], format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(results, format, &mut out)
}

/// Write lint results in the specified format.
pub fn render(results: &[FileReport], format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => render_text(results, out)?,
        OutputFormat::Json => render_json(results, out)?,
        OutputFormat::Compact => render_compact(results, out)?,
    }
    Ok(())
}

fn render_text(results: &[FileReport], out: &mut impl Write) -> Result<()> {
    let mut errors = 0;
    let mut warnings = 0;
    let mut fixed = 0;

    for file in results {
        let (e, w) = file.report.count_by_severity();
        errors += e;
        warnings += w;
        fixed += file.report.fixed_count();

        for problem in &file.report.problems {
            let severity = match problem.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",
                Severity::Warning => "\x1b[33mwarning\x1b[0m",
            };
            writeln!(
                out,
                "{}:{}:{}",
                file.path.display(),
                problem.location.line,
                problem.location.column
            )?;
            write!(
                out,
                "  {}[{}] {}: {}",
                severity, problem.code, problem.check, problem.message
            )?;
            if problem.fixed {
                write!(out, " \x1b[32m(fixed)\x1b[0m")?;
            }
            writeln!(out)?;
        }
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    writeln!(
        out,
        "{}Found {} error(s), {} warning(s) in {} file(s), {} fixed\x1b[0m",
        summary_color,
        errors,
        warnings,
        results.len(),
        fixed
    )?;
    Ok(())
}

fn render_json(results: &[FileReport], out: &mut impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn render_compact(results: &[FileReport], out: &mut impl Write) -> Result<()> {
    for file in results {
        for problem in &file.report.problems {
            write!(
                out,
                "{}:{}:{}: {} [{}] {}",
                file.path.display(),
                problem.location.line,
                problem.location.column,
                problem.severity,
                problem.code,
                problem.message,
            )?;
            if problem.fixed {
                write!(out, " (fixed)")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
