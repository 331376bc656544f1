//! Install layout classification.
//!
//! Classification is a pure function of a handful of filesystem facts
//! collected up front by [`LayoutProbe::inspect`], so strategies can be
//! tested without staging a tree.

use std::fmt;
use std::path::PathBuf;

use crate::core::env::InstallEnv;
use crate::core::product::Product;

/// How the staged tree is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Self-contained, relocatable directory with the executable at its root
    Portable,
    /// macOS `.app` bundle
    Bundle,
    /// Conventional prefix install (`bin/`, `lib/`, `include/`)
    Posix,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Portable => "portable",
            Strategy::Bundle => "bundle",
            Strategy::Posix => "posix",
        }
    }

    /// Whether the staged prefix's `include` and `lib` directories are
    /// dropped wholesale once headers are relocated.
    pub fn drops_generic_dirs(&self) -> bool {
        matches!(self, Strategy::Portable | Strategy::Bundle)
    }

    /// Whether the top-level prefix directory is wiped from the staging root.
    pub fn wipes_prefix(&self) -> bool {
        matches!(self, Strategy::Portable)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filesystem facts that decide the strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutProbe {
    /// The primary executable sits directly in the staging root
    pub executable_at_destdir: bool,
    /// The staging root and the staged prefix are the same directory
    pub destdir_is_prefix: bool,
    /// `<staged prefix>/Contents/MacOS` exists
    pub has_bundle_dir: bool,
}

impl LayoutProbe {
    /// Collect the facts from a staged tree.
    pub fn inspect(env: &InstallEnv, product: &Product) -> Self {
        LayoutProbe {
            executable_at_destdir: env.destdir.join(product.executable()).exists(),
            destdir_is_prefix: env.destdir_is_prefix(),
            has_bundle_dir: env.destdir_prefix.join("Contents/MacOS").is_dir(),
        }
    }
}

/// Pick the strategy. First matching rule wins.
pub fn classify(probe: &LayoutProbe) -> Strategy {
    if probe.executable_at_destdir && !probe.destdir_is_prefix {
        Strategy::Portable
    } else if probe.has_bundle_dir {
        Strategy::Bundle
    } else {
        Strategy::Posix
    }
}

/// Directory third-party headers are consolidated into.
pub fn headers_destination(strategy: Strategy, env: &InstallEnv, product: &Product) -> PathBuf {
    let base = match strategy {
        Strategy::Portable => env.destdir.join("include"),
        Strategy::Bundle => env.destdir.join("Contents/Resources/include"),
        Strategy::Posix => env.destdir_prefix.join("include"),
    };
    base.join(product.name()).join("third_party")
}
