//! Library search directories as reported by the compiler driver.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use super::errors::ResolveError;
use crate::util::process::ProcessBuilder;

/// Flag that makes gcc/clang print their search-path configuration.
pub const SEARCH_DIRS_FLAG: &str = "-print-search-dirs";

static LIBRARIES_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^libraries: =(.*)$").expect("valid regex"));

/// Extract the linker search directories from `-print-search-dirs` output.
///
/// Order is preserved; empty entries are dropped. Returns `None` when the
/// output has no `libraries:` line.
pub fn parse_library_dirs(output: &str) -> Option<Vec<PathBuf>> {
    let caps = LIBRARIES_LINE.captures(output)?;
    let value = caps.get(1)?.as_str().trim();

    Some(
        std::env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect(),
    )
}

/// Run `compiler -print-search-dirs` and parse its library directories.
pub fn query_library_dirs<S: AsRef<str>>(compiler: &[S]) -> Result<Vec<PathBuf>, ResolveError> {
    let cmd = ProcessBuilder::from_command_line(compiler)
        .ok_or(ResolveError::EmptyCommand)?
        .arg(SEARCH_DIRS_FLAG);

    tracing::debug!("running {}", cmd.display_command());
    let output = cmd.exec_and_check().map_err(ResolveError::CompilerFailed)?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    parse_library_dirs(&stdout).ok_or_else(|| ResolveError::NoSearchPath {
        command: cmd.display_command(),
        output: stdout.into_owned(),
    })
}
