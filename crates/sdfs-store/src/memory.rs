//! In-memory metadata store for tests and embedding.
//!
//! [`InMemoryMetadataStore`] keeps the encoded document bytes rather than a
//! live [`Directory`], so every load and save goes through the same JSON
//! encoding as the file backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tracing::debug;

use sdfs_types::{Directory, Limits};

use crate::document;
use crate::error::{StoreError, StoreResult};
use crate::traits::MetadataStore;

/// An in-memory implementation of [`MetadataStore`].
///
/// Data is lost when the store is dropped. Writes can be switched off with
/// [`set_read_only`](Self::set_read_only) to simulate a write-protected card.
pub struct InMemoryMetadataStore {
    document: RwLock<Option<Vec<u8>>>,
    read_only: AtomicBool,
    limits: Limits,
}

impl InMemoryMetadataStore {
    /// Create a store with no document yet.
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create a store that validates entries against `limits`.
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            document: RwLock::new(None),
            read_only: AtomicBool::new(false),
            limits,
        }
    }

    /// Refuse (or allow again) all subsequent saves.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// The raw document bytes, if a document has been written.
    pub fn raw_document(&self) -> StoreResult<Option<Vec<u8>>> {
        let doc = self.document.read().map_err(|e| {
            StoreError::Serialization(format!("lock poisoned: {e}"))
        })?;
        Ok(doc.clone())
    }

    /// Replace the raw document bytes, bypassing encoding.
    pub fn set_raw_document(&self, bytes: Vec<u8>) -> StoreResult<()> {
        let mut doc = self.document.write().map_err(|e| {
            StoreError::Serialization(format!("lock poisoned: {e}"))
        })?;
        *doc = Some(bytes);
        Ok(())
    }
}

impl Default for InMemoryMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn load(&self) -> StoreResult<Directory> {
        if let Some(bytes) = self.raw_document()? {
            return document::decode(&bytes, &self.limits);
        }
        debug!("initializing empty in-memory document");
        let directory = Directory::new();
        self.save(&directory)?;
        Ok(directory)
    }

    fn save(&self, directory: &Directory) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::ReadOnly);
        }
        let bytes = document::encode(directory, &self.limits)?;
        self.set_raw_document(bytes)
    }

    fn limits(&self) -> Limits {
        self.limits
    }
}

impl std::fmt::Debug for InMemoryMetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self
            .document
            .read()
            .ok()
            .and_then(|doc| doc.as_ref().map(Vec::len));
        f.debug_struct("InMemoryMetadataStore")
            .field("document_len", &len)
            .field("read_only", &self.read_only.load(Ordering::SeqCst))
            .finish()
    }
}
