//! Post-install reorganization of a staged tree.
//!
//! Vendored subprojects install their headers and static libraries into
//! the same prefix as the product. Left alone they would clash with the
//! host's own packages (`/usr/include/lua.h`, `/usr/lib/liblua.a`), so
//! after staging:
//!
//! 1. the layout is classified ([`Strategy`]),
//! 2. third-party headers are moved under `include/<product>/third_party`,
//! 3. development-only libraries are pruned,
//! 4. the vendored subproject headers the product's API exposes are
//!    merged in,
//! 5. platform fixups run.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::env::InstallEnv;
use crate::core::layout::{classify, headers_destination, LayoutProbe, Strategy};
use crate::core::product::{Product, PKGCONFIG_DIR, SCRATCH_DIR};
use crate::ops::fixup::{self, LoadPathChange, LoadPathRewriter};
use crate::util::config::LayoutConfig;
use crate::util::fs::{
    copy_into, count_files, ensure_dir, move_entries, relative_path, remove_dir_all_if_exists,
};

/// What the reorganizer decided before touching anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub strategy: Strategy,
    pub headers_dest: PathBuf,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorganizeReport {
    pub strategy: Strategy,
    pub headers_dest: PathBuf,
    /// Paths moved into the headers destination
    pub relocated: Vec<PathBuf>,
    /// Directories deleted from the staged tree
    pub removed: Vec<PathBuf>,
    /// Subproject headers copied into the headers destination
    pub merged: Vec<PathBuf>,
    /// Where the console executable ended up, if renamed
    pub console: Option<PathBuf>,
    /// Load path rewrite applied to the executable, if any
    pub load_path: Option<LoadPathChange>,
}

impl ReorganizeReport {
    fn new(plan: Plan) -> Self {
        ReorganizeReport {
            strategy: plan.strategy,
            headers_dest: plan.headers_dest,
            relocated: Vec::new(),
            removed: Vec::new(),
            merged: Vec::new(),
            console: None,
            load_path: None,
        }
    }
}

/// Reorganizes one staged install.
pub struct Reorganizer<'a> {
    env: &'a InstallEnv,
    config: &'a LayoutConfig,
    product: Product,
    rewriter: &'a dyn LoadPathRewriter,
}

impl<'a> Reorganizer<'a> {
    pub fn new(
        env: &'a InstallEnv,
        config: &'a LayoutConfig,
        product: Product,
        rewriter: &'a dyn LoadPathRewriter,
    ) -> Self {
        Reorganizer {
            env,
            config,
            product,
            rewriter,
        }
    }

    /// Classify the staged tree without mutating it.
    pub fn plan(&self) -> Plan {
        let probe = LayoutProbe::inspect(self.env, &self.product);
        let strategy = classify(&probe);
        tracing::debug!(?probe, %strategy, "classified staged tree");
        Plan {
            strategy,
            headers_dest: headers_destination(strategy, self.env, &self.product),
        }
    }

    /// Run the whole reorganization.
    pub fn run(&self) -> Result<ReorganizeReport> {
        let plan = self.plan();
        tracing::info!("STRATEGY: {}", plan.strategy);

        let mut report = ReorganizeReport::new(plan);

        if report.strategy.drops_generic_dirs() {
            self.flatten(&mut report)?;
        } else {
            self.reorganize_posix(&mut report)?;
        }

        self.merge_subproject_headers(&mut report)?;

        report.console = fixup::rename_console_executable(self.env, &self.product)?;
        report.load_path = fixup::rewrite_load_path(self.env, &self.product, self.rewriter)?;

        tracing::info!(
            "{} header files under {}",
            count_files(&report.headers_dest),
            report.headers_dest.display()
        );
        Ok(report)
    }

    fn staged(&self, rel: &str) -> PathBuf {
        self.env.destdir_prefix.join(rel)
    }

    fn remove(&self, path: &Path, report: &mut ReorganizeReport) -> Result<()> {
        if remove_dir_all_if_exists(path)? {
            tracing::info!("removed {}", relative_path(&self.env.destdir, path).display());
            report.removed.push(path.to_path_buf());
        }
        Ok(())
    }

    /// Portable and bundle layouts: everything under the staged
    /// `include` is third-party; `include` and `lib` then go away.
    fn flatten(&self, report: &mut ReorganizeReport) -> Result<()> {
        let include = self.staged("include");

        if include.exists() {
            ensure_dir(&report.headers_dest)?;
            let summary = move_entries(&include, &report.headers_dest, &[])?;
            report.relocated.extend(summary.moved);
        }

        self.remove(&include, report)?;
        self.remove(&self.staged("lib"), report)?;

        if report.strategy.wipes_prefix() {
            if let Some(top) = self.env.prefix_top_dir()? {
                self.remove(&top, report)?;
            }
        }
        Ok(())
    }

    /// Prefix installs keep the product's own headers and shared library
    /// and prune everything else.
    fn reorganize_posix(&self, report: &mut ReorganizeReport) -> Result<()> {
        let include = self.staged("include");
        if include.exists() {
            ensure_dir(&report.headers_dest)?;
            let summary = move_entries(&include, &report.headers_dest, &[self.product.name()])?;
            report.relocated.extend(summary.moved);
        }

        let lib = self.staged("lib");
        if !lib.exists() {
            return Ok(());
        }

        let scratch = self.staged(SCRATCH_DIR);
        remove_dir_all_if_exists(&scratch)?;
        ensure_dir(&scratch)?;

        let libraries = self.product.shared_library_candidates();
        let mut keep: Vec<&str> = libraries.iter().map(String::as_str).collect();
        keep.push(PKGCONFIG_DIR);
        move_entries(&lib, &scratch, &keep)?;

        let pkgconfig = lib.join(PKGCONFIG_DIR);
        if pkgconfig.exists() {
            let pc_file = self.product.pkgconfig_file();
            move_entries(&pkgconfig, &scratch, &[pc_file.as_str()])?;
        }

        self.remove(&scratch, report)?;

        if !libraries.iter().any(|name| lib.join(name).exists()) {
            tracing::info!("no shared {} library was installed", self.product.name());
            self.remove(&lib, report)?;
        }
        Ok(())
    }

    fn merge_subproject_headers(&self, report: &mut ReorganizeReport) -> Result<()> {
        let subprojects = &self.config.subprojects;
        let dest = &report.headers_dest;

        let encoding_root = self.env.source_root.join(&subprojects.encoding.path);
        if encoding_root.exists() {
            let header = encoding_root.join(&subprojects.encoding.header);
            report.merged.push(copy_into(&header, dest)?);
            tracing::info!("merged {}", header.display());
        }

        let scripting = &subprojects.scripting;
        let scripting_root = self.env.source_root.join(&scripting.path);
        if scripting_root.exists() {
            let already_present = scripting
                .sentinel_header()
                .and_then(Path::file_name)
                .is_some_and(|name| dest.join(name).exists());

            if already_present {
                tracing::info!("keeping scripting headers already in {}", dest.display());
            } else {
                for header in &scripting.headers {
                    report.merged.push(copy_into(&scripting_root.join(header), dest)?);
                }
                tracing::info!(
                    "merged {} headers from {}",
                    scripting.headers.len(),
                    scripting_root.display()
                );
            }
        }
        Ok(())
    }
}
