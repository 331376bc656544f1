//! Filesystem utilities.
//!
//! Every mutating helper here pre-checks existence, so "path does not
//! exist" is never an error. Anything else (permissions, type mismatch)
//! propagates with the offending path attached.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Outcome of a [`move_entries`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSummary {
    /// Destination paths of everything that was moved.
    pub moved: Vec<PathBuf>,
    /// Names that matched the exclude list and were left at the source.
    pub skipped: Vec<String>,
}

/// Move every entry of `src_dir` into `dest_dir`, except names in `exclude`.
///
/// Directories overwrite: an existing destination directory is removed
/// recursively before the move, so the result holds only the source's
/// contents. Files overwrite the same way. Entries are processed in name
/// order so log output is stable.
pub fn move_entries(src_dir: &Path, dest_dir: &Path, exclude: &[&str]) -> Result<MoveSummary> {
    let mut entries = fs::read_dir(src_dir)
        .with_context(|| format!("failed to read directory: {}", src_dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to read directory: {}", src_dir.display()))?;
    entries.sort_by_key(|e| e.file_name());

    let mut summary = MoveSummary::default();

    for entry in entries {
        let name = entry.file_name();
        let name_str = name.to_string_lossy();

        if exclude.iter().any(|ex| *ex == name_str) {
            tracing::debug!("keeping {}", entry.path().display());
            summary.skipped.push(name_str.into_owned());
            continue;
        }

        let src_path = entry.path();
        let dest_path = dest_dir.join(&name);

        if src_path.is_dir() {
            remove_dir_all_if_exists(&dest_path)?;
        } else {
            remove_file_if_exists(&dest_path)?;
        }
        move_path(&src_path, &dest_path)?;
        summary.moved.push(dest_path);
    }

    Ok(summary)
}

/// Move a single file, replacing any file already at `dst`.
pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
    remove_file_if_exists(dst)?;
    move_path(src, dst)
}

/// Rename, falling back to copy + delete when `src` and `dst` sit on
/// different filesystems.
fn move_path(src: &Path, dst: &Path) -> Result<()> {
    if fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    if src.is_dir() {
        copy_dir_all(src, dst)?;
        fs::remove_dir_all(src)
            .with_context(|| format!("failed to remove directory: {}", src.display()))?;
    } else {
        fs::copy(src, dst).with_context(|| {
            format!("failed to move {} to {}", src.display(), dst.display())
        })?;
        fs::remove_file(src)
            .with_context(|| format!("failed to remove file: {}", src.display()))?;
    }
    Ok(())
}

/// Recursively copy a directory.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .with_context(|| format!("failed to create directory: {}", dst.display()))?;

    for entry in fs::read_dir(src)
        .with_context(|| format!("failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let ty = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
    }
    Ok(())
}

/// Copy `file` into `dest_dir` under its own name, creating the directory
/// tree first. Returns the destination path.
pub fn copy_into(file: &Path, dest_dir: &Path) -> Result<PathBuf> {
    ensure_dir(dest_dir)?;
    let name = file
        .file_name()
        .with_context(|| format!("no file name: {}", file.display()))?;
    let dest = dest_dir.join(name);
    fs::copy(file, &dest)
        .with_context(|| format!("failed to copy {} to {}", file.display(), dest.display()))?;
    Ok(dest)
}

/// Remove a directory and all its contents, if it exists.
///
/// Returns whether anything was removed.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
        return Ok(true);
    }
    Ok(false)
}

/// Remove a file (or dangling symlink), if it exists.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if path.exists() || path.is_symlink() {
        fs::remove_file(path)
            .with_context(|| format!("failed to remove file: {}", path.display()))?;
        return Ok(true);
    }
    Ok(false)
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Count regular files below `root`. Missing roots count as empty.
pub fn count_files(root: &Path) -> usize {
    if !root.exists() {
        return 0;
    }
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count()
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}
