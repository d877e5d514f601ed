use std::path::PathBuf;

use sdfs_store::StoreError;
use sdfs_types::{Limits, LimitsError};
use thiserror::Error;

/// Reasons a file could not be created.
///
/// Validation errors are reported before anything is written, so a failed
/// create never changes the persisted directory.
#[derive(Debug, Error)]
pub enum CreateError {
    /// The name is longer than the format allows.
    #[error("file name too long: {name:?} ({len} characters, limit {max})")]
    NameTooLong { name: String, len: usize, max: usize },

    /// The name is empty.
    #[error("file name must not be empty")]
    EmptyName,

    /// A file with this name already exists.
    #[error("file already exists: {name}")]
    AlreadyExists { name: String },

    /// The root directory has no free entry.
    #[error("directory full ({max} files max)")]
    DirectoryFull { max: usize },

    /// The payload exceeds the configured ceiling.
    #[error("file too large: {size} bytes, limit {max}")]
    FileTooLarge { size: usize, max: usize },

    /// Loading or saving the metadata document failed.
    #[error("storage failure: {0}")]
    Io(#[from] StoreError),
}

/// Reasons a file could not be read.
#[derive(Debug, Error)]
pub enum ReadError {
    /// No file with this name exists.
    #[error("file not found: {name}")]
    NotFound { name: String },

    /// Loading the metadata document failed.
    #[error("storage failure: {0}")]
    Io(#[from] StoreError),
}

/// Errors loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The limits describe an unusable store.
    #[error("invalid limits: {0}")]
    Limits(#[from] LimitsError),

    /// The engine and its store disagree on the layout limits.
    #[error("engine limits {engine:?} do not match store limits {store:?}")]
    LimitsMismatch { engine: Limits, store: Limits },
}
