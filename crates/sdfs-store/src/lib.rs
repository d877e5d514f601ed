//! Metadata persistence for the SD-card flat store.
//!
//! The whole root [`Directory`](sdfs_types::Directory) is stored as a single
//! JSON document. Every load reads the full document and every save
//! rewrites it; there is no incremental update and no transaction log.
//!
//! # Storage Backends
//!
//! All backends implement the [`MetadataStore`] trait:
//!
//! - [`JsonFileStore`] -- one JSON file on disk, replaced atomically on save
//! - [`InMemoryMetadataStore`] -- the same document held in memory, for tests
//!   and embedding
//!
//! # Design Rules
//!
//! 1. A missing document is created empty on first load.
//! 2. Saves overwrite the whole document; nothing is merged.
//! 3. A load after a successful save returns an equal directory.
//! 4. Decoded entries are checked against their recorded metadata.
//! 5. A document holding files is read only with the block size it was
//!    written with.
//! 6. All I/O errors are propagated, never retried.

pub mod document;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use document::{decode, encode, Document};
pub use error::{StoreError, StoreResult};
pub use file::{JsonFileStore, DEFAULT_CARD_DIR, DOCUMENT_NAME};
pub use memory::InMemoryMetadataStore;
pub use traits::MetadataStore;
