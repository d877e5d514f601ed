//! A single stored file.

use serde::Serialize;

use crate::block::{split_into_blocks, Block};
use crate::error::EntryError;

/// Metadata and block sequence for one file in the root directory.
///
/// Entries are immutable once created. `block_count` always equals
/// `blocks.len()` and `size` always equals the summed block lengths for
/// entries built through [`FileEntry::from_payload`] or
/// [`FileEntry::from_blocks`]; entries decoded from elsewhere should be
/// checked with [`FileEntry::verify`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// File name, unique within the directory.
    pub name: String,
    /// Total payload length in bytes.
    pub size: u64,
    /// Number of blocks the payload occupies.
    pub block_count: usize,
    /// Payload chunks in order.
    pub blocks: Vec<Block>,
}

impl FileEntry {
    /// Split `payload` into `block_size` chunks and record it under `name`.
    pub fn from_payload(name: impl Into<String>, payload: &[u8], block_size: usize) -> Self {
        Self::from_blocks(name, split_into_blocks(payload, block_size))
    }

    /// Build an entry from an already split block sequence.
    pub fn from_blocks(name: impl Into<String>, blocks: Vec<Block>) -> Self {
        let size = blocks.iter().map(|b| b.len() as u64).sum();
        Self {
            name: name.into(),
            size,
            block_count: blocks.len(),
            blocks,
        }
    }

    /// Reassemble the original payload.
    pub fn content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size as usize);
        for block in &self.blocks {
            out.extend_from_slice(block.as_bytes());
        }
        out
    }

    /// Length of each block, in order.
    pub fn block_lengths(&self) -> Vec<usize> {
        self.blocks.iter().map(Block::len).collect()
    }

    /// Check that the recorded metadata agrees with the blocks.
    pub fn verify(&self, block_size: usize) -> Result<(), EntryError> {
        if self.blocks.is_empty() {
            return Err(EntryError::NoBlocks {
                name: self.name.clone(),
            });
        }
        if self.block_count != self.blocks.len() {
            return Err(EntryError::BlockCountMismatch {
                name: self.name.clone(),
                declared: self.block_count,
                actual: self.blocks.len(),
            });
        }
        if let Some((index, block)) = self
            .blocks
            .iter()
            .enumerate()
            .find(|(_, b)| b.len() > block_size)
        {
            return Err(EntryError::OversizedBlock {
                name: self.name.clone(),
                index,
                len: block.len(),
                max: block_size,
            });
        }
        let actual: u64 = self.blocks.iter().map(|b| b.len() as u64).sum();
        if self.size != actual {
            return Err(EntryError::SizeMismatch {
                name: self.name.clone(),
                declared: self.size,
                actual,
            });
        }
        Ok(())
    }
}
