//! Platform fixups applied after every strategy.
//!
//! - Windows: the console build of the executable can't share a target
//!   name with the windowed one, so it is staged as `<name>-cli.exe` and
//!   renamed to `<name>.com` here.
//! - macOS: the executable references its dylib by the absolute path it
//!   had at build time; that reference is rewritten to be relative to
//!   `@executable_path`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::env::InstallEnv;
use crate::core::product::{HostPlatform, Product};
use crate::util::fs::move_file;
use crate::util::process::{find_executable, ProcessBuilder};

/// Capability to rewrite a library reference embedded in a binary.
pub trait LoadPathRewriter {
    /// Replace the load command referencing `old` with one referencing `new`.
    fn change_reference(&self, binary: &Path, old: &str, new: &str) -> Result<()>;
}

/// Rewrites Mach-O load commands with `install_name_tool -change`.
#[derive(Debug, Clone)]
pub struct InstallNameTool {
    tool: PathBuf,
}

impl InstallNameTool {
    /// Use `install_name_tool` from PATH, or the bare name if `which`
    /// can't find it (so the spawn error names the missing tool).
    pub fn new() -> Self {
        InstallNameTool {
            tool: find_executable("install_name_tool")
                .unwrap_or_else(|| PathBuf::from("install_name_tool")),
        }
    }

    pub fn with_tool(tool: impl Into<PathBuf>) -> Self {
        InstallNameTool { tool: tool.into() }
    }

    fn command(&self, binary: &Path, old: &str, new: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.tool)
            .args(["-change", old, new])
            .arg(binary)
    }
}

impl Default for InstallNameTool {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadPathRewriter for InstallNameTool {
    fn change_reference(&self, binary: &Path, old: &str, new: &str) -> Result<()> {
        let cmd = self.command(binary, old, new);
        tracing::debug!("running {}", cmd.display_command());
        cmd.exec_and_check()?;
        Ok(())
    }
}

/// Rewriter for platforms whose binaries need no load-path changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRewriter;

impl LoadPathRewriter for NoopRewriter {
    fn change_reference(&self, binary: &Path, old: &str, new: &str) -> Result<()> {
        tracing::debug!(
            "not rewriting {} -> {} in {}",
            old,
            new,
            binary.display()
        );
        Ok(())
    }
}

/// The rewriter appropriate for `platform`.
pub fn default_rewriter(platform: HostPlatform) -> Box<dyn LoadPathRewriter> {
    match platform {
        HostPlatform::MacOs => Box::new(InstallNameTool::new()),
        _ => Box::new(NoopRewriter),
    }
}

/// A load-path rewrite that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPathChange {
    pub binary: PathBuf,
    pub old: String,
    pub new: String,
}

/// Rename the console executable to `.com`. Windows only.
///
/// The staging root is checked before the staged prefix. Returns the new
/// path when a rename happened.
pub fn rename_console_executable(env: &InstallEnv, product: &Product) -> Result<Option<PathBuf>> {
    if product.platform() != HostPlatform::Windows {
        return Ok(None);
    }

    for dir in [&env.destdir, &env.destdir_prefix] {
        let console = dir.join(product.console_executable());
        if console.exists() {
            let target = dir.join(product.console_target());
            move_file(&console, &target)?;
            tracing::info!("renamed {} -> {}", console.display(), target.display());
            return Ok(Some(target));
        }
    }

    Ok(None)
}

/// Point the executable's dylib reference at `@executable_path`. macOS only.
///
/// Bundles load from `Contents/Frameworks`; flat layouts from the
/// executable's own directory. Returns the change when one was applied.
pub fn rewrite_load_path(
    env: &InstallEnv,
    product: &Product,
    rewriter: &dyn LoadPathRewriter,
) -> Result<Option<LoadPathChange>> {
    if product.platform() != HostPlatform::MacOs {
        return Ok(None);
    }

    let dylib = product.dylib();
    let bundle_dir = env.destdir_prefix.join("Contents/MacOS");
    let flat_binary = env.destdir_prefix.join(product.name());

    let change = if bundle_dir.exists() {
        LoadPathChange {
            binary: bundle_dir.join(product.name()),
            old: format!("/Contents/Frameworks/{}", dylib),
            new: format!("@executable_path/../Frameworks/{}", dylib),
        }
    } else if flat_binary.exists() {
        LoadPathChange {
            binary: flat_binary,
            old: format!("/{}", dylib),
            new: format!("@executable_path/{}", dylib),
        }
    } else {
        tracing::debug!("no executable found for load path rewrite");
        return Ok(None);
    };

    if !change.binary.exists() {
        bail!(
            "bundle executable not found: {}",
            change.binary.display()
        );
    }

    rewriter.change_reference(&change.binary, &change.old, &change.new)?;
    tracing::info!(
        "rewrote load path {} -> {} in {}",
        change.old,
        change.new,
        change.binary.display()
    );
    Ok(Some(change))
}
