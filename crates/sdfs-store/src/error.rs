use sdfs_types::EntryError;

/// Errors from metadata store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage medium.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be encoded or parsed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The document parsed but does not describe a valid directory.
    #[error("corrupt document: {0}")]
    Corrupt(String),

    /// The document was laid out with a different block size than the
    /// store is configured for.
    #[error("document uses {document}-byte blocks, store is configured for {configured}")]
    BlockSizeMismatch { document: usize, configured: usize },

    /// An entry's metadata disagrees with its blocks.
    #[error("corrupt entry: {0}")]
    Entry(#[from] EntryError),

    /// The backing medium refuses writes.
    #[error("store is read-only")]
    ReadOnly,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
