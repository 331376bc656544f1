//! Shared-library resolution errors and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while resolving a library's versioned name.
///
/// "Not found" is not an error; these are the loud failures.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no compiler command given")]
    EmptyCommand,

    #[error("compiler query failed: {0:#}")]
    CompilerFailed(anyhow::Error),

    #[error("`{command}` did not report a library search path")]
    NoSearchPath { command: String, output: String },

    #[error("failed to resolve {}", path.display())]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{file_name}` has no shared-object name")]
    NoSharedObjectName { file_name: String },

    #[error("reduced name `{reduced}` is not an alias of {}", real.display())]
    AliasMismatch {
        reduced: String,
        real: PathBuf,
        actual: Option<PathBuf>,
    },

    #[error("invalid include pattern `{pattern}` in {}", conf.display())]
    BadInclude {
        conf: PathBuf,
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            ResolveError::EmptyCommand => diag.with_suggestion(
                "help: Pass the compiler command after the library name, e.g. `SDL2 cc`",
            ),

            ResolveError::CompilerFailed(_) => diag.with_suggestion(suggestions::CHECK_COMPILER),

            ResolveError::NoSearchPath { output, .. } => {
                let mut diag = diag;
                for line in output.lines().take(5) {
                    diag = diag.with_context(format!("compiler said: {}", line));
                }
                diag.with_suggestion(suggestions::CHECK_COMPILER)
            }

            ResolveError::Unresolvable { path, source } => {
                diag.with_location(path).with_context(source.to_string())
            }

            ResolveError::NoSharedObjectName { .. } => diag,

            ResolveError::AliasMismatch { actual, .. } => match actual {
                Some(actual) => {
                    diag.with_context(format!("it resolves to {}", actual.display()))
                }
                None => diag.with_context("it does not exist"),
            },

            ResolveError::BadInclude { source, .. } => diag.with_context(source.to_string()),
        }
    }
}
