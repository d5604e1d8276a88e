//! Configuration file support.
//!
//! Loaded from `zodgen.toml` in the project root:
//! ```toml
//! [generate]
//! schema_library_alias = "zod"
//! export = true
//! skip_unsupported = false
//! ```

use crate::generate::GenerateOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "zodgen.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ZodgenConfig {
    pub generate: GenerateOptions,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ZodgenConfig {
    /// Load `zodgen.toml` from `root`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::load_file(&path)
    }

    /// Load a specific config file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}
