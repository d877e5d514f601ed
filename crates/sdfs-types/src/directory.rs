//! The flat root directory.
//!
//! Entries are kept in insertion order so listings are stable. The
//! directory stays small (the card format caps it at 128 entries), so a
//! plain vector with linear lookup is enough.

use serde::Serialize;

use crate::entry::FileEntry;

/// The single root namespace mapping names to file entries.
///
/// The directory itself only guarantees unique names. Capacity and name
/// policy are enforced by the engine before an entry is inserted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory {
    entries: Vec<FileEntry>,
}

/// Space accounting for a directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Usage {
    /// Number of files.
    pub files: usize,
    /// Total payload bytes.
    pub bytes: u64,
    /// Total blocks allocated.
    pub blocks: usize,
}

impl Directory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the directory holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if an entry named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Insert a new entry at the end of the listing.
    ///
    /// Returns the entry back if the name is already taken; the directory
    /// is left unchanged in that case.
    pub fn insert(&mut self, entry: FileEntry) -> Result<(), FileEntry> {
        if self.contains(&entry.name) {
            return Err(entry);
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    /// Summed file count, bytes and blocks.
    pub fn usage(&self) -> Usage {
        self.entries.iter().fold(Usage::default(), |acc, e| Usage {
            files: acc.files + 1,
            bytes: acc.bytes + e.size,
            blocks: acc.blocks + e.block_count,
        })
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
