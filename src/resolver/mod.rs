//! Shared-library name resolution.
//!
//! Given a bare library name (`SDL2`) and a compiler command, find the
//! `lib<name>.so` the linker would pick for `-l<name>` and report the
//! versioned name a binary linked against it would load at runtime
//! (`libSDL2-2.0.so.0`). Build configuration uses the answer to decide
//! between loading the system copy and bundling a static build.
//!
//! Search order is the compiler's own `libraries:` order; the first
//! directory holding `lib<name>.so` wins.

pub mod errors;
pub mod ldconf;
pub mod search_dirs;
pub mod soname;

pub use errors::ResolveError;
pub use ldconf::{ldconf_dirs, DEFAULT_LD_SO_CONF};
pub use search_dirs::{parse_library_dirs, query_library_dirs};
pub use soname::{reduce_name, versioned_name};

use std::path::{Path, PathBuf};

/// A library found on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The `lib<name>.so` that matched
    pub found: PathBuf,
    /// Its fully resolved target
    pub real: PathBuf,
    /// Versioned file name to load at runtime
    pub soname: String,
}

/// Development (linker) file name for a library.
pub fn linker_name(name: &str) -> String {
    format!("lib{}.so", name)
}

/// Look for `lib<name>.so` in `dirs`, in order.
///
/// `Ok(None)` when no directory has it.
pub fn resolve_in_dirs<P: AsRef<Path>>(
    name: &str,
    dirs: &[P],
) -> Result<Option<Resolution>, ResolveError> {
    let file_name = linker_name(name);

    for dir in dirs {
        let candidate = dir.as_ref().join(&file_name);
        if !candidate.is_file() {
            continue;
        }

        tracing::info!("Found {}", candidate.display());
        let real = soname::real_path(&candidate)?;
        tracing::info!("Real path {}", real.display());

        let soname = versioned_name(&real)?;
        return Ok(Some(Resolution {
            found: candidate,
            real,
            soname,
        }));
    }

    Ok(None)
}

/// Resolve `name` against the compiler's library search path, followed by
/// any `extra_dirs`.
pub fn find_dylib_name<S: AsRef<str>>(
    name: &str,
    compiler: &[S],
    extra_dirs: &[PathBuf],
) -> Result<Option<Resolution>, ResolveError> {
    tracing::info!("Looking for {}", name);
    tracing::info!(
        "cc: {}",
        compiler.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(" ")
    );

    let mut dirs = query_library_dirs(compiler)?;
    dirs.extend(extra_dirs.iter().cloned());

    tracing::info!(
        "Search path:\n\t{}",
        dirs.iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join("\n\t")
    );

    resolve_in_dirs(name, &dirs)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::{fake_compiler, versioned_library};
    use tempfile::TempDir;

    #[test]
    fn test_resolve_symlink_chain() {
        let tmp = TempDir::new().unwrap();
        let libdir = tmp.path().join("lib");
        versioned_library(&libdir, "Foo", "2", "2.1.0");

        let found = resolve_in_dirs("Foo", &[&libdir]).unwrap().unwrap();

        assert_eq!(found.soname, "libFoo.so.2");
        assert_eq!(found.found, libdir.join("libFoo.so"));
        assert_eq!(found.real.file_name().unwrap(), "libFoo.so.2.1.0");
    }

    #[test]
    fn test_first_directory_wins() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        versioned_library(&first, "Foo", "3", "3.0.1");
        versioned_library(&second, "Foo", "2", "2.1.0");

        let found = resolve_in_dirs("Foo", &[&first, &second]).unwrap().unwrap();

        assert_eq!(found.soname, "libFoo.so.3");
    }

    #[test]
    fn test_not_found() {
        let tmp = TempDir::new().unwrap();
        let libdir = tmp.path().join("lib");
        std::fs::create_dir_all(&libdir).unwrap();
        std::fs::write(libdir.join("libFoo.a"), "ar").unwrap();

        assert_eq!(resolve_in_dirs("Foo", &[&libdir]).unwrap(), None);
    }

    #[test]
    fn test_dangling_linker_name_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let libdir = tmp.path().join("lib");
        std::fs::create_dir_all(&libdir).unwrap();
        std::os::unix::fs::symlink("libFoo.so.9", libdir.join("libFoo.so")).unwrap();

        assert_eq!(resolve_in_dirs("Foo", &[&libdir]).unwrap(), None);
    }

    #[test]
    fn test_unversioned_library() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("libplain.so"), "ELF").unwrap();

        let found = resolve_in_dirs("plain", &[tmp.path()]).unwrap().unwrap();

        assert_eq!(found.soname, "libplain.so");
    }

    #[test]
    fn test_find_dylib_name_through_compiler() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty");
        let libdir = tmp.path().join("lib");
        std::fs::create_dir_all(&empty).unwrap();
        versioned_library(&libdir, "SDL2-2.0", "0", "0.2600.2");
        // `-lSDL2` finds libSDL2.so, which points into the SDL2-2.0 chain
        std::os::unix::fs::symlink("libSDL2-2.0.so.0", libdir.join("libSDL2.so")).unwrap();
        let cc = fake_compiler(tmp.path(), &[&empty, &libdir]);

        let found = find_dylib_name("SDL2", &[cc.to_string_lossy()], &[])
            .unwrap()
            .unwrap();

        assert_eq!(found.soname, "libSDL2-2.0.so.0");
    }

    #[test]
    fn test_extra_dirs_searched_after_compiler_dirs() {
        let tmp = TempDir::new().unwrap();
        let compiler_dir = tmp.path().join("cc-lib");
        let extra_dir = tmp.path().join("ldconf-lib");
        versioned_library(&compiler_dir, "Foo", "1", "1.0.0");
        versioned_library(&extra_dir, "Foo", "2", "2.0.0");
        let cc = fake_compiler(tmp.path(), &[&compiler_dir]);

        let found = find_dylib_name("Foo", &[cc.to_string_lossy()], &[extra_dir.clone()])
            .unwrap()
            .unwrap();
        assert_eq!(found.soname, "libFoo.so.1");

        let missing = find_dylib_name("Bar", &[cc.to_string_lossy()], &[extra_dir])
            .unwrap();
        assert_eq!(missing, None);
    }
}
