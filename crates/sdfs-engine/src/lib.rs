//! Store engine for the SD-card flat store.
//!
//! The [`StoreEngine`] is the only component that enforces the store's
//! policy: short unique names, a bounded root directory and a bounded
//! payload size. It holds no state of its own; every call reloads the full
//! directory from its [`MetadataStore`](sdfs_store::MetadataStore) and
//! mutating calls save it back in full.
//!
//! Because each call is a separate load/save pair, the engine is not safe
//! to drive from several threads or processes against the same document.
//! Wrap every engine call in a single-writer lock if that can happen.

pub mod config;
pub mod engine;
pub mod error;

pub use config::EngineConfig;
pub use engine::{CreatedFile, StoreEngine};
pub use error::{ConfigError, CreateError, ReadError};
