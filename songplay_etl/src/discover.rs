//! Recursive discovery of `*.json` input files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extension matched by [`json_files`].
pub const JSON_EXTENSION: &str = ".json";

/// Collect the absolute path of every `*.json` file below `root`.
///
/// - Nested directories are walked in file-name order, so the result is stable.
/// - Matching follows shell-glob rules: case-sensitive, and hidden files
///   (leading `.`) are not matched.
/// - Paths are made absolute without resolving symlinks.
/// - A missing `root` yields an empty list; unreadable entries below it are skipped.
pub fn json_files(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        tracing::debug!(root = %root.display(), "input directory does not exist");
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_json_name(entry.file_name().to_str()) {
            continue;
        }
        match std::path::absolute(entry.path()) {
            Ok(path) => files.push(path),
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), error = %err, "skipping entry");
            }
        }
    }
    files
}

fn is_json_name(name: Option<&str>) -> bool {
    match name {
        Some(name) => !name.starts_with('.') && name.ends_with(JSON_EXTENSION),
        None => false,
    }
}
