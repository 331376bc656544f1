//! Expansion of `ld.so.conf`-style directory lists.
//!
//! The format is one directory per line, `#` comments, and
//! `include <glob>` directives that pull in further files (usually
//! `/etc/ld.so.conf.d/*.conf`). This is a secondary discovery source: the
//! resolver only consults it when asked to, after the compiler's own
//! search directories.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::glob;

use super::errors::ResolveError;

/// System-wide loader configuration.
pub const DEFAULT_LD_SO_CONF: &str = "/etc/ld.so.conf";

/// Expand `conf` into a flat, ordered list of library directories.
///
/// An unreadable file contributes no entries (logged as a warning).
/// Relative include patterns are resolved against the including file's
/// directory. Each file is expanded at most once, so include cycles
/// terminate.
pub fn ldconf_dirs(conf: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let mut expander = Expander::default();
    expander.expand(conf)?;
    Ok(expander.entries)
}

#[derive(Default)]
struct Expander {
    visited: HashSet<PathBuf>,
    entries: Vec<PathBuf>,
}

impl Expander {
    fn expand(&mut self, conf: &Path) -> Result<(), ResolveError> {
        let key = conf.canonicalize().unwrap_or_else(|_| conf.to_path_buf());
        if !self.visited.insert(key) {
            tracing::debug!("already expanded {}", conf.display());
            return Ok(());
        }

        let text = match std::fs::read_to_string(conf) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", conf.display(), e);
                return Ok(());
            }
        };

        for line in text.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            if let Some(pattern) = line.strip_prefix("include ") {
                self.include(conf, pattern.trim_start())?;
            } else if line.starts_with("hwcap ") {
                tracing::debug!("ignoring `{}` in {}", line, conf.display());
            } else {
                self.entries.push(PathBuf::from(line));
            }
        }

        Ok(())
    }

    fn include(&mut self, conf: &Path, pattern: &str) -> Result<(), ResolveError> {
        let full = match conf.parent() {
            Some(dir) if Path::new(pattern).is_relative() => dir.join(pattern),
            _ => PathBuf::from(pattern),
        };

        let matches = glob(&full.to_string_lossy()).map_err(|source| ResolveError::BadInclude {
            conf: conf.to_path_buf(),
            pattern: pattern.to_string(),
            source,
        })?;

        for entry in matches {
            match entry {
                Ok(path) => self.expand(&path)?,
                Err(e) => tracing::warn!("glob error: {}", e),
            }
        }
        Ok(())
    }
}
