//! Fixed-size content blocks and the block splitter.
//!
//! A [`Block`] is an owned chunk of at most one allocation unit. On the
//! wire a block that is valid UTF-8 is written as a plain JSON string, so
//! text files stay readable in the metadata document; anything else is
//! written as `{"hex": "..."}`.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One chunk of file content.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Block(Vec<u8>);

impl Block {
    /// Wrap raw bytes as a block.
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// Raw bytes of this block.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of this block in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a zero-length block.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the block as text, replacing invalid UTF-8 sequences.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<Vec<u8>> for Block {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl From<&[u8]> for Block {
    fn from(data: &[u8]) -> Self {
        Self(data.to_vec())
    }
}

impl From<&str> for Block {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for Block {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("len", &self.0.len())
            .field("data", &self.to_string_lossy())
            .finish()
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(&self.0) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("hex", &hex::encode(&self.0))?;
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BlockRepr {
    Text(String),
    Hex { hex: String },
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match BlockRepr::deserialize(deserializer)? {
            BlockRepr::Text(text) => Ok(Self(text.into_bytes())),
            BlockRepr::Hex { hex } => hex::decode(&hex)
                .map(Self)
                .map_err(|e| de::Error::custom(format!("invalid hex block: {e}"))),
        }
    }
}

/// Split `payload` into blocks of `block_size` bytes.
///
/// Every block is exactly `block_size` bytes except the last, which holds
/// the remainder. An empty payload produces a single empty block, so every
/// file owns at least one block.
///
/// # Panics
///
/// Panics if `block_size` is zero.
///
/// # Examples
///
/// ```
/// use sdfs_types::split_into_blocks;
///
/// let blocks = split_into_blocks(&[b'A'; 300], 256);
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].len(), 256);
/// assert_eq!(blocks[1].len(), 44);
///
/// let empty = split_into_blocks(b"", 256);
/// assert_eq!(empty.len(), 1);
/// assert!(empty[0].is_empty());
/// ```
pub fn split_into_blocks(payload: &[u8], block_size: usize) -> Vec<Block> {
    assert!(block_size > 0, "block size must be greater than zero");
    if payload.is_empty() {
        return vec![Block::default()];
    }
    payload.chunks(block_size).map(Block::from).collect()
}
