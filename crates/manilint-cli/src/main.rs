//! manilint CLI tool.
//!
//! Usage:
//! ```bash
//! manilint check [OPTIONS] [PATH]
//! manilint list-checks
//! manilint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod discover;

/// Lossless linter and fixer for resource manifests
#[derive(Parser)]
#[command(name = "manilint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint manifests, optionally fixing them in place
    Check {
        /// File or directory to lint (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Rewrite files with fixable problems repaired
        #[arg(long)]
        fix: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run these checks (comma-separated names or codes)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Skip these checks (comma-separated names or codes)
        #[arg(long, value_delimiter = ',')]
        disable: Vec<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available checks
    ListChecks,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-problem compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            fix,
            format,
            only,
            disable,
            exclude,
        } => {
            let args = commands::check::CheckArgs {
                path,
                fix,
                format,
                only,
                disable,
                exclude,
            };
            let passed = commands::check::run(&args, cli.config.as_deref())?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListChecks => {
            commands::list_checks::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(std::path::Path::new("."), force),
    }
}
