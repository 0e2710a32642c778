use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::TrackerConfig;

/// Error type for reading config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("pintrack").join("config.toml")
}

/// Default data directory, respecting XDG_DATA_HOME
pub fn default_data_dir() -> PathBuf {
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"));
    data_dir.join("pintrack")
}

/// Read config from a specific path. A missing file yields defaults.
pub fn read_config_from(path: &Path) -> Result<TrackerConfig, ConfigError> {
    if !path.exists() {
        return Ok(TrackerConfig::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read config from the default location.
pub fn read_config() -> Result<TrackerConfig, ConfigError> {
    read_config_from(&config_path())
}

/// Directory the durable slot lives in: explicit override, then config, then default.
pub fn resolve_data_dir(config: &TrackerConfig, override_dir: Option<&Path>) -> PathBuf {
    override_dir
        .map(Path::to_path_buf)
        .or_else(|| config.storage.dir.clone())
        .unwrap_or_else(default_data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::DEFAULT_STORAGE_KEY;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config_from(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
        assert!(config.storage.dir.is_none());
        assert!(config.catalog.path.is_none());
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "log_level = \"debug\"\n\n[storage]\ndir = \"/tmp/pins\"\n").unwrap();
        let config = read_config_from(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.storage.dir, Some(PathBuf::from("/tmp/pins")));
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[storage\n").unwrap();
        assert!(matches!(
            read_config_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn override_beats_config() {
        let mut config = TrackerConfig::default();
        config.storage.dir = Some(PathBuf::from("/from/config"));
        assert_eq!(
            resolve_data_dir(&config, Some(Path::new("/from/flag"))),
            PathBuf::from("/from/flag")
        );
        assert_eq!(resolve_data_dir(&config, None), PathBuf::from("/from/config"));
    }
}
