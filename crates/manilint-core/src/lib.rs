//! # manilint-core
//!
//! Core lint engine for declarative infrastructure manifests.
//!
//! This crate provides the foundational pieces for building manifest checks:
//!
//! - [`tokenize`] turns source text into a lossless [`TokenStream`]
//! - [`build_blocks`] groups tokens into a [`BlockTree`] of resource bodies,
//!   hashes and selectors
//! - [`Check`] is the trait every lint rule implements
//! - [`Linter`] runs checks in order and renders the (possibly fixed) text
//!
//! ## Example
//!
//! ```ignore
//! use manilint_core::{Linter, RunOptions};
//!
//! let linter = Linter::builder()
//!     .check(MyCheck::new())
//!     .build();
//!
//! let outcome = linter.lint(source, RunOptions::fix())?;
//! std::fs::write(path, outcome.output)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod check;
mod config;
mod engine;
mod fix;
mod lexer;
mod scope;
mod suppress;
mod token;
mod types;

pub use check::{Check, CheckBox, RunContext};
pub use config::{CheckConfig, Config, ConfigError, LinterConfig};
pub use engine::{LintError, LintOutcome, Linter, LinterBuilder, RunOptions};
pub use fix::FixSet;
pub use lexer::{tokenize, LexError};
pub use scope::{build_blocks, Block, BlockId, BlockKind, BlockTree, TitleScope};
pub use suppress::Suppressions;
pub use token::{Token, TokenKind, TokenStream};
pub use types::{LintReport, Location, Problem, Severity};
