//! Host platform and the first-party artifact names derived from it.

use std::fmt;

/// Platform the install is running on.
///
/// Decides executable naming and which post-install fixups apply. Kept
/// as a value (rather than `cfg!` at each call site) so the reorganizer
/// can be exercised for every platform from any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    MacOs,
    /// Linux, BSDs and anything else POSIX-like
    Other,
}

impl HostPlatform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostPlatform::Windows
        } else if cfg!(target_os = "macos") {
            HostPlatform::MacOs
        } else {
            HostPlatform::Other
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPlatform::Windows => write!(f, "windows"),
            HostPlatform::MacOs => write!(f, "macos"),
            HostPlatform::Other => write!(f, "posix"),
        }
    }
}

/// Scratch directory, under the staged prefix, that collects pruned libs.
pub const SCRATCH_DIR: &str = "libs_to_remove";

/// Package-config directory under `lib`.
pub const PKGCONFIG_DIR: &str = "pkgconfig";

/// The first-party product being installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    name: String,
    platform: HostPlatform,
}

impl Product {
    pub fn new(name: impl Into<String>, platform: HostPlatform) -> Self {
        Product {
            name: name.into(),
            platform,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    /// Primary executable file name (`app`, or `app.exe` on Windows).
    pub fn executable(&self) -> String {
        match self.platform {
            HostPlatform::Windows => format!("{}.exe", self.name),
            _ => self.name.clone(),
        }
    }

    /// Console-mode companion executable as produced by the build.
    pub fn console_executable(&self) -> String {
        format!("{}-cli.exe", self.name)
    }

    /// Name the console executable is renamed to.
    pub fn console_target(&self) -> String {
        format!("{}.com", self.name)
    }

    /// Every file name the primary shared library may have, on any platform.
    pub fn shared_library_candidates(&self) -> [String; 3] {
        [
            format!("lib{}.so", self.name),
            format!("lib{}.dll", self.name),
            format!("lib{}.dylib", self.name),
        ]
    }

    /// macOS dynamic library name.
    pub fn dylib(&self) -> String {
        format!("lib{}.dylib", self.name)
    }

    /// Package-config file name.
    pub fn pkgconfig_file(&self) -> String {
        format!("{}.pc", self.name)
    }
}
