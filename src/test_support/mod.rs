//! Test utilities for unit tests.
//!
//! Staged install trees are built on a real temporary filesystem (see
//! [`fixtures`]); the only external capability that needs faking is the
//! load-path rewriter, which would otherwise shell out to
//! `install_name_tool`.
//!
//! # Example
//!
//! ```rust,ignore
//! use relayout::test_support::{RecordingRewriter, StagedTree};
//!
//! #[test]
//! fn test_example() {
//!     let tree = StagedTree::posix("app");
//!     tree.prefix_file("include/zlib.h", "");
//!     let rewriter = RecordingRewriter::default();
//!     // Hand `tree.env()` and `&rewriter` to a Reorganizer...
//! }
//! ```

pub mod fixtures;

use std::path::Path;
use std::sync::Mutex;

use anyhow::{bail, Result};

pub use fixtures::*;

use crate::ops::fixup::{LoadPathChange, LoadPathRewriter};

/// Rewriter that records requested changes instead of running a tool.
#[derive(Debug, Default)]
pub struct RecordingRewriter {
    calls: Mutex<Vec<LoadPathChange>>,
    fail: bool,
}

impl RecordingRewriter {
    /// A rewriter whose every call fails, for error-path tests.
    pub fn failing() -> Self {
        RecordingRewriter {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Changes requested so far, in call order.
    pub fn calls(&self) -> Vec<LoadPathChange> {
        self.calls.lock().unwrap().clone()
    }
}

impl LoadPathRewriter for RecordingRewriter {
    fn change_reference(&self, binary: &Path, old: &str, new: &str) -> Result<()> {
        self.calls.lock().unwrap().push(LoadPathChange {
            binary: binary.to_path_buf(),
            old: old.to_string(),
            new: new.to_string(),
        });
        if self.fail {
            bail!("install_name_tool failed for {}", binary.display());
        }
        Ok(())
    }
}
