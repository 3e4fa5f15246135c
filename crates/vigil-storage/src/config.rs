//! Storage configuration
//!
//! Loaded from YAML (default) or TOML (by file extension); environment
//! variables take precedence over the file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use vigil_core::{Error, Result};

use crate::sqlite::SqliteKvConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default)]
    pub sqlite: SqliteKvConfig,
}

impl StoreConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Invalid YAML: {}", e)))?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("VIGIL_STORE_BACKEND") {
            match val.to_lowercase().as_str() {
                "memory" => self.backend = StoreBackend::Memory,
                "sqlite" => self.backend = StoreBackend::Sqlite,
                _ => warn!("Invalid VIGIL_STORE_BACKEND '{}', keeping {:?}", val, self.backend),
            }
        }

        if let Ok(path) = std::env::var("VIGIL_SQLITE_PATH") {
            self.sqlite.path = path;
        }
    }
}
