//! # manilint-checks
//!
//! Built-in checks for manilint.
//!
//! ## Available Checks
//!
//! | Code | Name | Severity | Description |
//! |------|------|----------|-------------|
//! | ML001 | `trailing-comma` | error | Multi-line resource bodies end their last attribute with `,` |
//! | ML002 | `arrow-alignment` | warning | `=>` of one block line up one space past the longest key |
//!
//! Checks run in the order above, so a comma inserted by `trailing-comma`
//! is already in place when arrows are aligned.
//!
//! ## Usage
//!
//! ```ignore
//! use manilint_core::{Linter, RunOptions};
//! use manilint_checks::all_checks;
//!
//! let linter = Linter::builder().checks(all_checks()).build();
//! let outcome = linter.lint(source, RunOptions::fix())?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod arrow_alignment;
mod registry;
pub mod trailing_comma;

pub use arrow_alignment::ArrowAlignment;
pub use registry::{all_checks, find_check, select_checks, CheckInfo, UnknownCheck};
pub use trailing_comma::TrailingComma;

/// Re-export core types for convenience.
pub use manilint_core::{Check, Problem, Severity};
