//! Install environment handed over by the build system.
//!
//! Meson exports the staging paths to install scripts through the process
//! environment. They are read once into [`InstallEnv`] and never consulted
//! again.

use std::ffi::OsString;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Staging directory override.
pub const DESTDIR: &str = "DESTDIR";
/// Final install prefix on the target machine.
pub const INSTALL_PREFIX: &str = "MESON_INSTALL_PREFIX";
/// Install prefix joined onto the staging directory.
pub const DESTDIR_PREFIX: &str = "MESON_INSTALL_DESTDIR_PREFIX";
/// Root of the source tree.
pub const SOURCE_ROOT: &str = "MESON_SOURCE_ROOT";
/// Present under MSYS2 shells; switches how the prefix is derived.
pub const MSYSTEM: &str = "MSYSTEM";

/// Error reading the install environment.
#[derive(Debug, Error, Diagnostic)]
pub enum EnvError {
    #[error("required environment variable `{var}` is not set")]
    #[diagnostic(
        code(relayout::env::missing),
        help("this tool runs as a meson install script; run it from `meson install`")
    )]
    Missing { var: &'static str },

    #[error("install prefix {destdir_prefix} is not inside DESTDIR {destdir}")]
    #[diagnostic(code(relayout::env::prefix_outside_destdir))]
    PrefixOutsideDestdir {
        destdir: PathBuf,
        destdir_prefix: PathBuf,
    },
}

/// Paths describing one staged install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallEnv {
    /// Staging root (`DESTDIR`)
    pub destdir: PathBuf,
    /// Runtime prefix (`MESON_INSTALL_PREFIX`)
    pub install_prefix: PathBuf,
    /// Prefix inside the staging root (`MESON_INSTALL_DESTDIR_PREFIX`)
    pub destdir_prefix: PathBuf,
    /// Source tree (`MESON_SOURCE_ROOT`)
    pub source_root: PathBuf,
    /// `MSYSTEM` was set
    pub alt_packaging: bool,
}

impl InstallEnv {
    /// Read the process environment.
    ///
    /// Returns `Ok(None)` when `DESTDIR` is unset or empty: without a
    /// staging root there is nothing to reorganize.
    pub fn from_env() -> Result<Option<Self>, EnvError> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Like [`InstallEnv::from_env`] but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, EnvError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let Some(destdir) = non_empty(DESTDIR) else {
            return Ok(None);
        };

        let require = |var: &'static str| {
            non_empty(var)
                .map(PathBuf::from)
                .ok_or(EnvError::Missing { var })
        };

        Ok(Some(InstallEnv {
            destdir: PathBuf::from(destdir),
            install_prefix: require(INSTALL_PREFIX)?,
            destdir_prefix: require(DESTDIR_PREFIX)?,
            source_root: require(SOURCE_ROOT)?,
            alt_packaging: lookup(MSYSTEM).is_some(),
        }))
    }

    /// Prefix used to locate the scaffolding removed by a portable install.
    ///
    /// Normally the install prefix; under MSYS2 the staged prefix with the
    /// staging root stripped, since the install prefix there is a Windows
    /// path that does not line up with the staged tree.
    pub fn effective_prefix(&self) -> Result<PathBuf, EnvError> {
        if !self.alt_packaging {
            return Ok(self.install_prefix.clone());
        }
        self.destdir_prefix
            .strip_prefix(&self.destdir)
            .map(Path::to_path_buf)
            .map_err(|_| EnvError::PrefixOutsideDestdir {
                destdir: self.destdir.clone(),
                destdir_prefix: self.destdir_prefix.clone(),
            })
    }

    /// Top-level staged directory holding the prefix, e.g.
    /// `<destdir>/usr` for a `/usr/local` prefix. `None` when the prefix
    /// is the filesystem root.
    pub fn prefix_top_dir(&self) -> Result<Option<PathBuf>, EnvError> {
        let prefix = self.effective_prefix()?;
        let first = prefix.components().find_map(|c| match c {
            Component::Normal(name) => Some(name.to_os_string()),
            _ => None,
        });
        Ok(first.map(|name| self.destdir.join(name)))
    }

    /// Whether the staging root is the staged prefix itself.
    pub fn destdir_is_prefix(&self) -> bool {
        self.destdir == self.destdir_prefix
    }
}

impl fmt::Display for InstallEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", DESTDIR, self.destdir.display())?;
        writeln!(f, "{}: {}", INSTALL_PREFIX, self.install_prefix.display())?;
        writeln!(f, "{}: {}", DESTDIR_PREFIX, self.destdir_prefix.display())?;
        write!(f, "{}: {}", SOURCE_ROOT, self.source_root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            (DESTDIR, "/stage"),
            (INSTALL_PREFIX, "/usr/local"),
            (DESTDIR_PREFIX, "/stage/usr/local"),
            (SOURCE_ROOT, "/src/app"),
        ]
    }

    #[test]
    fn test_complete_environment() {
        let env = InstallEnv::from_lookup(lookup(&full_vars())).unwrap().unwrap();

        assert_eq!(env.destdir, PathBuf::from("/stage"));
        assert_eq!(env.destdir_prefix, PathBuf::from("/stage/usr/local"));
        assert!(!env.alt_packaging);
        assert!(!env.destdir_is_prefix());
    }

    #[test]
    fn test_missing_destdir_is_noop() {
        let env = InstallEnv::from_lookup(lookup(&[(INSTALL_PREFIX, "/usr")])).unwrap();
        assert!(env.is_none());

        let env = InstallEnv::from_lookup(lookup(&[(DESTDIR, "")])).unwrap();
        assert!(env.is_none());
    }

    #[test]
    fn test_missing_required_variable() {
        let vars: Vec<_> = full_vars()
            .into_iter()
            .filter(|(k, _)| *k != SOURCE_ROOT)
            .collect();

        let err = InstallEnv::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, EnvError::Missing { var: SOURCE_ROOT }));
        assert!(err.to_string().contains("MESON_SOURCE_ROOT"));
    }

    #[test]
    fn test_empty_required_variable_is_missing() {
        let mut vars = full_vars();
        vars[1] = (INSTALL_PREFIX, "");

        let err = InstallEnv::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, EnvError::Missing { var: INSTALL_PREFIX }));
    }

    #[test]
    fn test_prefix_top_dir() {
        let env = InstallEnv::from_lookup(lookup(&full_vars())).unwrap().unwrap();
        assert_eq!(env.prefix_top_dir().unwrap(), Some(PathBuf::from("/stage/usr")));
    }

    #[test]
    fn test_prefix_top_dir_msys() {
        let mut vars = full_vars();
        vars[1] = (INSTALL_PREFIX, "C:/Program Files/app");
        vars.push((MSYSTEM, "MINGW64"));

        let env = InstallEnv::from_lookup(lookup(&vars)).unwrap().unwrap();
        assert!(env.alt_packaging);
        assert_eq!(env.effective_prefix().unwrap(), PathBuf::from("usr/local"));
        assert_eq!(env.prefix_top_dir().unwrap(), Some(PathBuf::from("/stage/usr")));
    }

    #[test]
    fn test_msys_prefix_outside_destdir() {
        let mut vars = full_vars();
        vars[2] = (DESTDIR_PREFIX, "/elsewhere/usr");
        vars.push((MSYSTEM, ""));

        let env = InstallEnv::from_lookup(lookup(&vars)).unwrap().unwrap();
        assert!(matches!(
            env.effective_prefix(),
            Err(EnvError::PrefixOutsideDestdir { .. })
        ));
    }

    #[test]
    fn test_root_prefix_has_no_top_dir() {
        let mut vars = full_vars();
        vars[1] = (INSTALL_PREFIX, "/");

        let env = InstallEnv::from_lookup(lookup(&vars)).unwrap().unwrap();
        assert_eq!(env.prefix_top_dir().unwrap(), None);
    }

    #[test]
    fn test_trailing_separator_compares_equal() {
        let mut vars = full_vars();
        vars[2] = (DESTDIR_PREFIX, "/stage/");

        let env = InstallEnv::from_lookup(lookup(&vars)).unwrap().unwrap();
        assert!(env.destdir_is_prefix());
    }
}
