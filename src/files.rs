// src/files.rs

//! File helpers used when assembling a package folder

use crate::error::{Error, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

fn pattern(mask: &str) -> Result<Pattern> {
    Pattern::new(mask).map_err(|e| Error::Config(format!("invalid file pattern '{}': {}", mask, e)))
}

/// Copy the files directly inside `src` whose names match `mask` into `dst`
///
/// Returns the copied destination paths. A missing `src` copies nothing.
pub fn copy_matching(src: &Path, mask: &str, dst: &Path) -> Result<Vec<PathBuf>> {
    let pattern = pattern(mask)?;
    let mut copied = Vec::new();

    if !src.is_dir() {
        return Ok(copied);
    }

    let mut entries: Vec<_> = fs::read_dir(src)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if !pattern.matches(&name.to_string_lossy()) {
            continue;
        }
        fs::create_dir_all(dst)?;
        let target = dst.join(&name);
        fs::copy(entry.path(), &target)?;
        debug!("Copied {} to {}", entry.path().display(), target.display());
        copied.push(target);
    }

    Ok(copied)
}

/// Remove a directory tree if it exists
pub fn rmdir(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(path)?;
    debug!("Removed {}", path.display());
    Ok(true)
}

/// Recursively delete files under `root` whose names match `mask`
///
/// Returns the number of files removed.
pub fn remove_files_by_mask(root: &Path, mask: &str) -> Result<usize> {
    let pattern = pattern(mask)?;
    let mut removed = 0;

    if !root.is_dir() {
        return Ok(0);
    }

    let matches: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| pattern.matches(&e.file_name().to_string_lossy()))
        .map(|e| e.into_path())
        .collect();

    for path in matches {
        fs::remove_file(&path)?;
        removed += 1;
    }

    debug!("Removed {} files matching {} under {}", removed, mask, root.display());
    Ok(removed)
}
