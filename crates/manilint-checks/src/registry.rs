//! Ordered registry of the built-in checks.

use crate::{ArrowAlignment, TrailingComma};
use manilint_core::{CheckBox, Severity};
use thiserror::Error;

/// A check name or code that matches no built-in check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown check `{0}` (run `manilint list-checks` to see available checks)")]
pub struct UnknownCheck(pub String);

/// Static description of a registered check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInfo {
    /// Check code (e.g. `ML001`).
    pub code: &'static str,
    /// Check name (e.g. `trailing-comma`).
    pub name: &'static str,
    /// Severity used when configuration does not override it.
    pub severity: Severity,
    /// One-line description.
    pub description: &'static str,
}

impl CheckInfo {
    /// Describes a check instance.
    #[must_use]
    pub fn of(check: &CheckBox) -> Self {
        Self {
            code: check.code(),
            name: check.name(),
            severity: check.default_severity(),
            description: check.description(),
        }
    }
}

/// Returns every built-in check in run order.
#[must_use]
pub fn all_checks() -> Vec<CheckBox> {
    vec![Box::new(TrailingComma::new()), Box::new(ArrowAlignment::new())]
}

/// Looks up a built-in check by name or code (case-insensitive).
#[must_use]
pub fn find_check(key: &str) -> Option<CheckBox> {
    all_checks()
        .into_iter()
        .find(|c| c.name().eq_ignore_ascii_case(key) || c.code().eq_ignore_ascii_case(key))
}

/// Builds the check list for a run.
///
/// With a non-empty `only`, just those checks run; `disable` then removes
/// checks from the result. Run order is always registry order.
///
/// # Errors
///
/// Returns [`UnknownCheck`] for the first key that names no check.
pub fn select_checks<S: AsRef<str>>(only: &[S], disable: &[S]) -> Result<Vec<CheckBox>, UnknownCheck> {
    let only = resolve(only)?;
    let disable = resolve(disable)?;
    Ok(all_checks()
        .into_iter()
        .filter(|c| only.is_empty() || only.contains(&c.name()))
        .filter(|c| !disable.contains(&c.name()))
        .collect())
}

fn resolve<S: AsRef<str>>(keys: &[S]) -> Result<Vec<&'static str>, UnknownCheck> {
    keys.iter()
        .map(|key| {
            let key = key.as_ref().trim();
            find_check(key)
                .map(|c| c.name())
                .ok_or_else(|| UnknownCheck(key.to_string()))
        })
        .collect()
}
