//! Manifest discovery.

use anyhow::{Context, Result};
use manilint_core::LinterConfig;
use std::path::{Path, PathBuf};

/// Collects the manifests to lint under `root`, sorted by path.
///
/// A file given directly is always linted. Directories are walked with
/// `.gitignore` support per `config.respect_gitignore`; files are kept if
/// their extension is listed in `config.extensions` and neither the config
/// excludes nor `extra_excludes` match their path.
///
/// # Errors
///
/// Returns an error for an invalid glob pattern or an unreadable directory.
pub fn discover_files(
    root: &Path,
    config: &LinterConfig,
    extra_excludes: &[String],
) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let excludes = config
        .exclude
        .iter()
        .chain(extra_excludes)
        .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern: {p}")))
        .collect::<Result<Vec<_>>>()?;

    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(config.respect_gitignore)
        .git_global(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .require_git(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.context("Failed to walk directory")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if !config.extensions.iter().any(|e| e == ext) {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        if excludes
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(rel))
        {
            tracing::debug!("Excluding: {}", path.display());
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(files: &[&str]) -> TempDir {
        let tmp = TempDir::new().expect("should create temp dir");
        for file in files {
            let path = tmp.path().join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("should create dirs");
            }
            fs::write(&path, "").expect("should write file");
        }
        tmp
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .expect("should be under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn finds_manifests_by_extension() {
        let tmp = tree(&["manifests/init.pp", "manifests/b.pp", "README.md", "templates/x.erb"]);
        let files = discover_files(tmp.path(), &LinterConfig::default(), &[]).expect("discover");
        assert_eq!(
            relative(tmp.path(), &files),
            vec!["manifests/b.pp", "manifests/init.pp"]
        );
    }

    #[test]
    fn default_excludes_skip_vendor_and_fixtures() {
        let tmp = tree(&["a.pp", "vendor/mod/init.pp", "spec/fixtures/modules/x.pp"]);
        let files = discover_files(tmp.path(), &LinterConfig::default(), &[]).expect("discover");
        assert_eq!(relative(tmp.path(), &files), vec!["a.pp"]);
    }

    #[test]
    fn extra_excludes_apply() {
        let tmp = tree(&["a.pp", "generated/b.pp"]);
        let files = discover_files(
            tmp.path(),
            &LinterConfig::default(),
            &["generated/**".to_string()],
        )
        .expect("discover");
        assert_eq!(relative(tmp.path(), &files), vec!["a.pp"]);
    }

    #[test]
    fn gitignore_is_respected_when_enabled() {
        let tmp = tree(&["a.pp", "build/b.pp"]);
        fs::write(tmp.path().join(".gitignore"), "build/\n").expect("write gitignore");

        let files = discover_files(tmp.path(), &LinterConfig::default(), &[]).expect("discover");
        assert_eq!(relative(tmp.path(), &files), vec!["a.pp"]);

        let config = LinterConfig {
            respect_gitignore: false,
            ..LinterConfig::default()
        };
        let files = discover_files(tmp.path(), &config, &[]).expect("discover");
        assert_eq!(relative(tmp.path(), &files), vec!["a.pp", "build/b.pp"]);
    }

    #[test]
    fn single_file_is_returned_as_is() {
        let tmp = tree(&["site.manifest"]);
        let file = tmp.path().join("site.manifest");
        let files = discover_files(&file, &LinterConfig::default(), &[]).expect("discover");
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let tmp = tree(&["a.pp"]);
        let err = discover_files(tmp.path(), &LinterConfig::default(), &["[".to_string()]);
        assert!(err.is_err());
    }
}
