//! Core types for reported problems and lint results.

use serde::{Deserialize, Serialize};

/// Severity level of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style issue that should be addressed.
    Warning,
    /// Problem that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Position of the offending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Byte column within the line (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One finding reported by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Check code (e.g., "ML002").
    pub code: String,
    /// Check name (e.g., "arrow-alignment").
    pub check: String,
    /// Severity of this problem.
    pub severity: Severity,
    /// Where the offending token was, before any fix.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// True if the check repaired the token stream for this problem.
    #[serde(default)]
    pub fixed: bool,
}

impl Problem {
    /// Creates a new, unfixed problem.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        check: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            check: check.into(),
            severity,
            location,
            message: message.into(),
            fixed: false,
        }
    }

    /// Marks whether this problem was fixed.
    #[must_use]
    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.code, self.message
        )?;
        if self.fixed {
            write!(f, " (fixed)")?;
        }
        Ok(())
    }
}

/// Ordered problems of one lint run.
///
/// Problems appear in check registration order, and in source order within
/// a check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    /// All problems found.
    pub problems: Vec<Problem>,
}

impl LintReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// Returns true if any problem at or above `severity` was left unfixed.
    #[must_use]
    pub fn has_unfixed_at(&self, severity: Severity) -> bool {
        self.problems
            .iter()
            .any(|p| !p.fixed && p.severity >= severity)
    }

    /// Returns problems reported by the named check.
    #[must_use]
    pub fn by_check(&self, check: &str) -> Vec<&Problem> {
        self.problems.iter().filter(|p| p.check == check).collect()
    }

    /// Counts problems as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .problems
            .iter()
            .filter(|p| p.severity == Severity::Error)
            .count();
        (errors, self.problems.len() - errors)
    }

    /// Number of problems that were fixed.
    #[must_use]
    pub fn fixed_count(&self) -> usize {
        self.problems.iter().filter(|p| p.fixed).count()
    }

    /// Appends problems in order.
    pub fn extend(&mut self, problems: impl IntoIterator<Item = Problem>) {
        self.problems.extend(problems);
    }
}
