use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default durable slot key; also the stem of the export file name
pub const DEFAULT_STORAGE_KEY: &str = "CEE33_companion_markers";

/// Configuration from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// tracing level filter for the binary (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the durable slot (default: $XDG_DATA_HOME/pintrack)
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            dir: None,
            key: default_storage_key(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Alternate catalog TOML; the built-in catalog is used when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}
