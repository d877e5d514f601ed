use std::path::Path;

use serde::{Deserialize, Serialize};

use sdfs_types::{Limits, DEFAULT_MAX_FILE_SIZE};

use crate::error::ConfigError;

/// Configuration for the store engine.
///
/// Every key is optional in TOML; missing keys take the card-format
/// defaults.
///
/// ```toml
/// max_file_size = 1024
///
/// [limits]
/// block_size = 256
/// max_name_len = 8
/// max_entries = 128
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Structural limits of the layout.
    pub limits: Limits,
    /// Largest payload accepted by `create_file`, in bytes.
    /// `None` leaves payload size unchecked.
    pub max_file_size: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }
}

impl EngineConfig {
    /// No payload ceiling; only the structural limits apply.
    pub fn unbounded() -> Self {
        Self {
            max_file_size: None,
            ..Default::default()
        }
    }

    /// Parse and validate a TOML config.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject configs that could never hold a file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        Ok(())
    }
}
