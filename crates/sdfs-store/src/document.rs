//! The persisted JSON document.
//!
//! Layout:
//!
//! ```text
//! {
//!   "root": {
//!     "type": "directory",
//!     "block_size": 256,
//!     "files": {
//!       "<name>": { "size": <bytes>, "blocks": <count>, "content": [<block>, ...] }
//!     }
//!   }
//! }
//! ```
//!
//! `files` keeps insertion order. Older documents may store `content` as a
//! single opaque string instead of a block list; those entries are split
//! into blocks on load and written back in block form on the next save.
//! Documents without `block_size` were written with 256-byte blocks.
//!
//! Text-only writers counted `size` and block lengths in characters. An
//! entry that only adds up when measured that way is re-split by bytes.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use sdfs_types::{Block, Directory, FileEntry, Limits, BLOCK_SIZE};

use crate::error::{StoreError, StoreResult};

/// The only kind of root node the format knows.
const DIRECTORY_KIND: &str = "directory";

/// Top-level persisted document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub root: RootRecord,
}

/// The root directory node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootRecord {
    #[serde(rename = "type", default = "directory_kind")]
    pub kind: String,
    #[serde(default = "legacy_block_size")]
    pub block_size: usize,
    #[serde(with = "ordered_files")]
    pub files: Vec<(String, FileRecord)>,
}

/// One file as it appears in the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<usize>,
    pub content: ContentRecord,
}

/// File content: a block list, or a legacy single opaque string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentRecord {
    Blocks(Vec<Block>),
    Opaque(String),
}

fn directory_kind() -> String {
    DIRECTORY_KIND.to_string()
}

fn legacy_block_size() -> usize {
    BLOCK_SIZE
}

impl Document {
    /// Build the document for `directory`, laid out in `block_size` blocks.
    pub fn from_directory(directory: &Directory, block_size: usize) -> Self {
        let files = directory
            .iter()
            .map(|entry| {
                let record = FileRecord {
                    size: entry.size,
                    blocks: Some(entry.block_count),
                    content: ContentRecord::Blocks(entry.blocks.clone()),
                };
                (entry.name.clone(), record)
            })
            .collect();
        Self {
            root: RootRecord {
                kind: directory_kind(),
                block_size,
                files,
            },
        }
    }

    /// Rebuild the directory, checking every entry against `limits`.
    ///
    /// A document that holds files is only readable with the block size it
    /// was written with. A file name that appears twice is `Corrupt`.
    pub fn into_directory(self, limits: &Limits) -> StoreResult<Directory> {
        if self.root.kind != DIRECTORY_KIND {
            return Err(StoreError::Corrupt(format!(
                "root has type {:?}, expected {DIRECTORY_KIND:?}",
                self.root.kind
            )));
        }
        if !self.root.files.is_empty() && self.root.block_size != limits.block_size {
            return Err(StoreError::BlockSizeMismatch {
                document: self.root.block_size,
                configured: limits.block_size,
            });
        }

        let mut directory = Directory::new();
        for (name, record) in self.root.files {
            let entry = match record.content {
                ContentRecord::Blocks(blocks) => {
                    let entry = FileEntry {
                        block_count: record.blocks.unwrap_or(blocks.len()),
                        name,
                        size: record.size,
                        blocks,
                    };
                    match entry.verify(limits.block_size) {
                        Ok(()) => entry,
                        Err(_) if measured_in_chars(&entry, limits.block_size) => {
                            let payload = entry.content();
                            let resplit =
                                FileEntry::from_payload(entry.name, &payload, limits.block_size);
                            warn!(
                                name = %resplit.name,
                                chars = entry.size,
                                bytes = resplit.size,
                                "entry sized in characters; re-split by bytes"
                            );
                            resplit
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                ContentRecord::Opaque(text) => {
                    let entry =
                        FileEntry::from_payload(name, text.as_bytes(), limits.block_size);
                    if entry.size != record.size {
                        warn!(
                            name = %entry.name,
                            recorded = record.size,
                            actual = entry.size,
                            "legacy entry size disagrees with content; using content length"
                        );
                    }
                    entry
                }
            };
            if let Err(dup) = directory.insert(entry) {
                return Err(StoreError::Corrupt(format!(
                    "duplicate file name {:?}",
                    dup.name
                )));
            }
        }
        Ok(directory)
    }
}

/// Whether `entry` adds up when block lengths and `size` are counted in
/// characters instead of bytes.
fn measured_in_chars(entry: &FileEntry, block_size: usize) -> bool {
    if entry.block_count != entry.blocks.len() {
        return false;
    }
    let mut chars = 0u64;
    for block in &entry.blocks {
        let Ok(text) = std::str::from_utf8(block.as_bytes()) else {
            return false;
        };
        let count = text.chars().count();
        if count > block_size {
            return false;
        }
        chars += count as u64;
    }
    chars == entry.size
}

/// Serialize `directory` to document bytes.
pub fn encode(directory: &Directory, limits: &Limits) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(&Document::from_directory(directory, limits.block_size))
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Parse document bytes into a directory.
pub fn decode(bytes: &[u8], limits: &Limits) -> StoreResult<Directory> {
    let document: Document =
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;
    document.into_directory(limits)
}

/// `files` as a JSON object whose key order is the vector order.
mod ordered_files {
    use super::*;

    pub fn serialize<S: Serializer>(
        files: &[(String, FileRecord)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(files.iter().map(|(name, record)| (name, record)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, FileRecord)>, D::Error> {
        deserializer.deserialize_map(FilesVisitor)
    }

    struct FilesVisitor;

    impl<'de> Visitor<'de> for FilesVisitor {
        type Value = Vec<(String, FileRecord)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of file names to file records")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut files: Vec<(String, FileRecord)> =
                Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(file) = access.next_entry::<String, FileRecord>()? {
                files.push(file);
            }
            Ok(files)
        }
    }
}
