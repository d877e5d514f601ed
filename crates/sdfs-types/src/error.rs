//! Error types for limit and entry validation.

use thiserror::Error;

/// A [`Limits`](crate::Limits) bundle that cannot describe a usable store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitsError {
    /// Blocks must hold at least one byte.
    #[error("block size must be greater than zero")]
    ZeroBlockSize,

    /// Names must allow at least one character.
    #[error("maximum name length must be greater than zero")]
    ZeroNameLength,

    /// The directory must hold at least one entry.
    #[error("maximum entry count must be greater than zero")]
    ZeroEntries,
}

/// A [`FileEntry`](crate::FileEntry) whose metadata disagrees with its blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The recorded block count does not match the block list.
    #[error("entry {name}: records {declared} blocks but holds {actual}")]
    BlockCountMismatch {
        name: String,
        declared: usize,
        actual: usize,
    },

    /// The recorded size does not match the summed block lengths.
    #[error("entry {name}: records {declared} bytes but blocks hold {actual}")]
    SizeMismatch {
        name: String,
        declared: u64,
        actual: u64,
    },

    /// A block exceeds the allocation unit.
    #[error("entry {name}: block {index} holds {len} bytes, limit is {max}")]
    OversizedBlock {
        name: String,
        index: usize,
        len: usize,
        max: usize,
    },

    /// An entry without any block (even an empty file owns one).
    #[error("entry {name}: has no blocks")]
    NoBlocks { name: String },
}
