//! Relayout - post-install reorganizer for staged application trees
//!
//! This crate provides the two pieces a Meson-based application build
//! needs around installation:
//!
//! - [`ops::reorganize`]: run as an install script after files are staged.
//!   It classifies the layout (portable, macOS bundle, or prefix install),
//!   moves vendored subproject headers out of the shared `include`
//!   namespace, prunes development libraries, and applies platform fixups.
//! - [`resolver`]: a configure-time query that maps a bare library name to
//!   the versioned shared object the linker would pick.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities for Relayout unit tests.
///
/// Only compiled for tests. Provides staged-tree fixtures and a
/// recording load-path rewriter.
#[cfg(test)]
pub mod test_support;

pub use core::{
    env::InstallEnv,
    layout::{classify, LayoutProbe, Strategy},
    product::{HostPlatform, Product},
};

pub use ops::reorganize::{Reorganizer, ReorganizeReport};
pub use resolver::{find_dylib_name, Resolution, ResolveError};
pub use util::config::LayoutConfig;
