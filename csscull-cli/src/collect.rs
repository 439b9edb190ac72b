//! Finding the stylesheets named on the command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Expand `paths` into a sorted, deduplicated list of stylesheet files.
///
/// Directories are walked recursively and contribute every `*.css` file
/// below them. Paths that are not directories are kept as given, whatever
/// their extension, so a missing file is reported when it is read.
pub fn stylesheets(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(true) {
                let entry =
                    entry.with_context(|| format!("failed to walk '{}'", path.display()))?;
                if entry.file_type().is_file() && is_stylesheet(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    log::debug!("collected {} stylesheets", files.len());
    Ok(files)
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("css"))
}
