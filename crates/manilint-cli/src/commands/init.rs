//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_NAME: &str = "manilint.toml";

const DEFAULT_CONFIG: &str = r#"# manilint configuration

# Rewrite manifests in place when fixable problems are found
fix = false

# Unfixed problems at or above this severity fail the run ("error" or "warning")
fail_on = "error"

[linter]
# Glob patterns to exclude from linting
exclude = [
    "**/vendor/**",
    "**/spec/fixtures/**",
]

# Respect .gitignore files
respect_gitignore = true

# File extensions to lint
extensions = ["pp"]

# Check configurations
# Each check can be enabled/disabled and have its severity overridden

[checks.trailing-comma]
enabled = true

[checks.arrow-alignment]
enabled = true
# severity = "error"  # Override default severity
"#;

/// Writes a default `manilint.toml` into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to configure checks");
    println!("  2. Run: manilint check");
    println!("  3. Run: manilint check --fix");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use manilint_core::{Config, Severity};
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).expect("should parse");
        assert!(!config.fix);
        assert_eq!(config.fail_threshold(), Severity::Error);
        assert!(config.is_check_enabled("trailing-comma"));
        assert!(config.is_check_enabled("arrow-alignment"));
        assert_eq!(config.linter.extensions, vec!["pp".to_string()]);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().expect("should create temp dir");
        let path = tmp.path().join(CONFIG_NAME);
        std::fs::write(&path, "fix = true").expect("write");

        assert!(run(tmp.path(), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "fix = true");

        run(tmp.path(), true).expect("should overwrite");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), DEFAULT_CONFIG);
    }
}
