//! Reducing a real library file name to the name the loader asks for.
//!
//! `libSDL2-2.0.so.0.2600.2` is what sits on disk, `libSDL2-2.0.so.0` is
//! what a binary linked with `-lSDL2` records. The reduction keeps the
//! base name, `.so`, and at most one version component.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::errors::ResolveError;

static SHARED_OBJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?\.so(?:\.[^.]+)?").expect("valid regex"));

/// Shortest prefix of `file_name` ending in `.so` plus at most one
/// version component. `None` if the name contains no `.so`.
pub fn reduce_name(file_name: &str) -> Option<&str> {
    SHARED_OBJECT_NAME.find(file_name).map(|m| m.as_str())
}

/// Reduce the real library at `real` and check the reduced name is an
/// alias of the same file in the same directory.
///
/// A mismatch means the reduction guessed wrong; that is an error rather
/// than a silently wrong answer.
pub fn versioned_name(real: &Path) -> Result<String, ResolveError> {
    let file_name = real
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let reduced = reduce_name(&file_name).ok_or_else(|| ResolveError::NoSharedObjectName {
        file_name: file_name.clone(),
    })?;
    tracing::info!("Reduced name {}", reduced);

    let alias = real.with_file_name(reduced);
    let actual = alias.canonicalize().ok();
    if actual.as_deref() != Some(real) {
        return Err(ResolveError::AliasMismatch {
            reduced: reduced.to_string(),
            real: real.to_path_buf(),
            actual,
        });
    }

    Ok(reduced.to_string())
}

/// Canonicalize `path`, following every symlink.
pub fn real_path(path: &Path) -> Result<PathBuf, ResolveError> {
    path.canonicalize()
        .map_err(|source| ResolveError::Unresolvable {
            path: path.to_path_buf(),
            source,
        })
}
