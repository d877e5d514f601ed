//! Foundation types for the SD-card flat store.
//!
//! The store mimics the layout of a tiny filesystem on microcontroller
//! removable storage: one root directory, short names, and file content
//! cut into fixed-size blocks.
//!
//! # Modules
//!
//! - [`limits`] -- capacity constants and the [`Limits`] bundle
//! - [`block`] -- the [`Block`] chunk type and [`split_into_blocks`]
//! - [`entry`] -- [`FileEntry`], one stored file
//! - [`directory`] -- [`Directory`], the flat root namespace
//! - [`error`] -- error types for limit and entry validation

pub mod block;
pub mod directory;
pub mod entry;
pub mod error;
pub mod limits;

pub use block::{split_into_blocks, Block};
pub use directory::{Directory, Usage};
pub use entry::FileEntry;
pub use error::{EntryError, LimitsError};
pub use limits::{
    Limits, BLOCK_SIZE, DEFAULT_MAX_FILE_SIZE, MAX_ENTRIES, MAX_NAME_LEN,
};
