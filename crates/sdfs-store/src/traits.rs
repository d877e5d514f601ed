use sdfs_types::{Directory, Limits};

use crate::error::StoreResult;

/// Whole-document persistence for the root directory.
///
/// All implementations must satisfy these invariants:
/// - `load` on a store that has never been written creates, persists and
///   returns an empty directory.
/// - `save` replaces the entire document; it never merges with what is
///   already stored.
/// - `load` after a successful `save(d)` returns a directory equal to `d`.
/// - All I/O errors are propagated, never retried.
/// - Entries are verified against [`limits`](MetadataStore::limits) on load,
///   and a non-empty document written with another block size is refused.
///
/// Loading and saving are separate calls, so two callers that interleave
/// load/save pairs lose updates. Serialize access externally when more
/// than one caller can reach the same document.
pub trait MetadataStore: Send + Sync {
    /// Read the full directory.
    fn load(&self) -> StoreResult<Directory>;

    /// Replace the persisted directory with `directory`.
    fn save(&self, directory: &Directory) -> StoreResult<()>;

    /// The layout limits this store reads and writes with.
    fn limits(&self) -> Limits;
}

impl<S: MetadataStore + ?Sized> MetadataStore for &S {
    fn load(&self) -> StoreResult<Directory> {
        (**self).load()
    }

    fn save(&self, directory: &Directory) -> StoreResult<()> {
        (**self).save(directory)
    }

    fn limits(&self) -> Limits {
        (**self).limits()
    }
}

impl<S: MetadataStore + ?Sized> MetadataStore for std::sync::Arc<S> {
    fn load(&self) -> StoreResult<Directory> {
        (**self).load()
    }

    fn save(&self, directory: &Directory) -> StoreResult<()> {
        (**self).save(directory)
    }

    fn limits(&self) -> Limits {
        (**self).limits()
    }
}
