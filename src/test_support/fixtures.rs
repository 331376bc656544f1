//! Fixtures for staged install trees and compiler search paths.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::env::InstallEnv;

/// A staged install tree in a temporary directory.
///
/// Layout under the temp root:
/// - `stage/`: the staging root (`DESTDIR`)
/// - `stage/<prefix>`: the staged prefix
/// - `src/`: the source root
#[derive(Debug)]
pub struct StagedTree {
    _tmp: TempDir,
    product: String,
    env: InstallEnv,
}

impl StagedTree {
    fn new(product: &str, install_prefix: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let destdir = tmp.path().join("stage");
        let destdir_prefix = destdir.join(install_prefix.trim_start_matches('/'));
        let source_root = tmp.path().join("src");

        fs::create_dir_all(&destdir_prefix).unwrap();
        fs::create_dir_all(&source_root).unwrap();

        StagedTree {
            _tmp: tmp,
            product: product.to_string(),
            env: InstallEnv {
                destdir,
                install_prefix: PathBuf::from(install_prefix),
                destdir_prefix,
                source_root,
                alt_packaging: false,
            },
        }
    }

    /// Conventional `/usr` prefix install.
    pub fn posix(product: &str) -> Self {
        Self::new(product, "/usr")
    }

    /// Relocatable install: executable at the staging root, prefix
    /// `/usr/local` left behind as scaffolding.
    pub fn portable(product: &str) -> Self {
        Self::portable_named(product, product)
    }

    /// Portable install with an explicit executable file name.
    pub fn portable_named(product: &str, executable: &str) -> Self {
        let tree = Self::new(product, "/usr/local");
        tree.file(executable, "exe");
        tree
    }

    /// macOS application bundle staged at `/<Product>.app`.
    pub fn bundle(product: &str) -> Self {
        let tree = Self::new(product, &format!("/{}.app", product));
        fs::create_dir_all(tree.prefix().join("Contents/MacOS")).unwrap();
        tree
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn env(&self) -> &InstallEnv {
        &self.env
    }

    pub fn destdir(&self) -> &Path {
        &self.env.destdir
    }

    pub fn prefix(&self) -> &Path {
        &self.env.destdir_prefix
    }

    pub fn source_root(&self) -> &Path {
        &self.env.source_root
    }

    /// Write a file relative to the staging root.
    pub fn file(&self, rel: &str, contents: &str) {
        write_file(&self.env.destdir.join(rel), contents);
    }

    /// Write a file relative to the staged prefix.
    pub fn prefix_file(&self, rel: &str, contents: &str) {
        write_file(&self.env.destdir_prefix.join(rel), contents);
    }

    /// Write a file relative to the source root.
    pub fn source_file(&self, rel: &str, contents: &str) {
        write_file(&self.env.source_root.join(rel), contents);
    }

    /// Vendor the default scripting-language subproject.
    pub fn stage_scripting_subproject(&self) {
        for header in ["lauxlib.h", "lua.h", "lua.hpp", "luaconf.h", "lualib.h"] {
            self.source_file(
                &format!("subprojects/lua-5.4.6/src/{}", header),
                &format!("/* bundled {} */", header),
            );
        }
    }
}

/// Write a file, creating parent directories.
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Create a versioned shared library with the usual symlink chain:
/// `lib<name>.so -> lib<name>.so.<major> -> lib<name>.so.<full>`.
#[cfg(unix)]
pub fn versioned_library(dir: &Path, name: &str, major: &str, full: &str) -> PathBuf {
    use std::os::unix::fs::symlink;

    fs::create_dir_all(dir).unwrap();
    let real = dir.join(format!("lib{}.so.{}", name, full));
    let soname = format!("lib{}.so.{}", name, major);
    fs::write(&real, "ELF").unwrap();
    symlink(real.file_name().unwrap(), dir.join(&soname)).unwrap();
    symlink(&soname, dir.join(format!("lib{}.so", name))).unwrap();
    real
}

/// Write an executable shell script that prints a `-print-search-dirs`
/// report listing `libdirs`. Returns the script path.
#[cfg(unix)]
pub fn fake_compiler(dir: &Path, libdirs: &[&Path]) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let joined = std::env::join_paths(libdirs).unwrap();
    let script = format!(
        "#!/bin/sh\n\
         echo 'install: /usr/lib/gcc/x86_64-linux-gnu/13/'\n\
         echo 'programs: =/usr/libexec/gcc/x86_64-linux-gnu/13/'\n\
         echo 'libraries: ={}'\n",
        joined.to_string_lossy()
    );

    let path = dir.join("fake-cc");
    write_file(&path, &script);
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}
