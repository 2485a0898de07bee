#![forbid(unsafe_code)]

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Store tuning, loadable from TOML. Every key is optional.
///
/// ```toml
/// db_file_name = "arbor.db"
/// busy_timeout_ms = 5000
/// max_tree_depth = 4096
/// history_limit = 500
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub db_file_name: String,
    pub busy_timeout_ms: u64,
    /// Deepest level a node may sit at (top level is 1). Creates and moves
    /// past it fail; ancestor walks are bounded by it too.
    pub max_tree_depth: usize,
    pub history_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_file_name: "arbor.db".to_string(),
            busy_timeout_ms: 5_000,
            max_tree_depth: 4_096,
            history_limit: 500,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.db_file_name.trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid("db_file_name must not be empty"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ConfigError::Invalid("db_file_name must be a bare file name"));
        }
        if self.max_tree_depth == 0 {
            return Err(ConfigError::Invalid("max_tree_depth must be positive"));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("history_limit must be positive"));
        }
        Ok(())
    }
}
