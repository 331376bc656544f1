//! Layout configuration.
//!
//! The reorganizer's product-specific names live in an optional
//! `relayout.toml` at the source root:
//!
//! ```toml
//! [product]
//! name = "pragtical"
//!
//! [subprojects.scripting]
//! path = "subprojects/lua-5.4.6"
//! headers = ["src/lauxlib.h", "src/lua.h", "src/lua.hpp", "src/luaconf.h", "src/lualib.h"]
//!
//! [subprojects.encoding]
//! path = "subprojects/uchardet-0.0.8"
//! header = "src/uchardet.h"
//! ```
//!
//! Every key is optional; missing keys fall back to the defaults above.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up at the source root.
pub const CONFIG_FILE_NAME: &str = "relayout.toml";

/// Reorganizer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// First-party product settings
    pub product: ProductConfig,

    /// Vendored subprojects whose headers get merged
    pub subprojects: SubprojectsConfig,
}

/// First-party product settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Product name; drives executable, library, header dir and `.pc` names
    pub name: String,
}

impl Default for ProductConfig {
    fn default() -> Self {
        ProductConfig {
            name: "pragtical".to_string(),
        }
    }
}

/// Vendored subproject locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubprojectsConfig {
    /// Scripting-language subproject (header set merged only as a fallback)
    pub scripting: ScriptingSubproject,

    /// Character-encoding-detection subproject (single header)
    pub encoding: EncodingSubproject,
}

/// Scripting-language subproject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptingSubproject {
    /// Root, relative to the source root
    pub path: PathBuf,

    /// Headers to merge, relative to the subproject root
    pub headers: Vec<PathBuf>,
}

impl Default for ScriptingSubproject {
    fn default() -> Self {
        ScriptingSubproject {
            path: PathBuf::from("subprojects/lua-5.4.6"),
            headers: ["lauxlib.h", "lua.h", "lua.hpp", "luaconf.h", "lualib.h"]
                .iter()
                .map(|h| Path::new("src").join(h))
                .collect(),
        }
    }
}

impl ScriptingSubproject {
    /// Header whose presence at the destination means a system-provided
    /// set was already merged: `lua.h` if configured, otherwise the first
    /// header.
    pub fn sentinel_header(&self) -> Option<&Path> {
        self.headers
            .iter()
            .find(|h| h.file_name().is_some_and(|n| n == "lua.h"))
            .or_else(|| self.headers.first())
            .map(PathBuf::as_path)
    }
}

/// Character-encoding-detection subproject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingSubproject {
    /// Root, relative to the source root
    pub path: PathBuf,

    /// Header to merge, relative to the subproject root
    pub header: PathBuf,
}

impl Default for EncodingSubproject {
    fn default() -> Self {
        EncodingSubproject {
            path: PathBuf::from("subprojects/uchardet-0.0.8"),
            header: PathBuf::from("src/uchardet.h"),
        }
    }
}

impl LayoutConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read layout config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse layout config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't
    /// exist or can't be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load layout config from {}: {:#}",
                    path.display(),
                    e
                );
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}

/// Path of the layout config for a given source root.
pub fn project_config_path(source_root: &Path) -> PathBuf {
    source_root.join(CONFIG_FILE_NAME)
}
