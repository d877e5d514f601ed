//! Capacity limits of the store.

use serde::{Deserialize, Serialize};

use crate::error::LimitsError;

/// Size of one allocation unit in bytes.
pub const BLOCK_SIZE: usize = 256;

/// Longest file name accepted, in characters.
pub const MAX_NAME_LEN: usize = 8;

/// Most entries the root directory can hold.
pub const MAX_ENTRIES: usize = 128;

/// Default payload ceiling in bytes for a single file.
pub const DEFAULT_MAX_FILE_SIZE: usize = 1024;

/// Structural limits of the store layout.
///
/// Defaults match the on-card format: 256-byte blocks, 8-character names,
/// 128 directory entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Allocation unit in bytes.
    pub block_size: usize,
    /// Longest accepted name, in characters.
    pub max_name_len: usize,
    /// Capacity of the root directory.
    pub max_entries: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
            max_name_len: MAX_NAME_LEN,
            max_entries: MAX_ENTRIES,
        }
    }
}

impl Limits {
    /// Reject limits that could never hold a file.
    pub fn validate(&self) -> Result<(), LimitsError> {
        if self.block_size == 0 {
            return Err(LimitsError::ZeroBlockSize);
        }
        if self.max_name_len == 0 {
            return Err(LimitsError::ZeroNameLength);
        }
        if self.max_entries == 0 {
            return Err(LimitsError::ZeroEntries);
        }
        Ok(())
    }

    /// Number of blocks a payload of `size` bytes occupies.
    ///
    /// An empty payload still occupies one (empty) block.
    pub fn blocks_for(&self, size: usize) -> usize {
        size.div_ceil(self.block_size).max(1)
    }
}
