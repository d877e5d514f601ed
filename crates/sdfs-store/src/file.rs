use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use sdfs_types::{Directory, Limits};

use crate::document;
use crate::error::{StoreError, StoreResult};
use crate::traits::MetadataStore;

/// Directory that stands in for the SD card when none is given.
pub const DEFAULT_CARD_DIR: &str = "ouichefs_sd_card";

/// Name of the metadata document inside the card directory.
pub const DOCUMENT_NAME: &str = "ouichefs_fs.json";

/// Metadata store backed by one JSON file.
///
/// Saves write the new document to a temporary file next to the target and
/// rename it into place, so readers see either the old or the new document
/// and never a partially written one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    limits: Limits,
}

impl JsonFileStore {
    /// Store the document at `path`.
    pub fn new(path: impl Into<PathBuf>, limits: Limits) -> Self {
        Self {
            path: path.into(),
            limits,
        }
    }

    /// Store the document as [`DOCUMENT_NAME`] inside `card_dir`.
    pub fn in_dir(card_dir: impl AsRef<Path>, limits: Limits) -> Self {
        Self::new(card_dir.as_ref().join(DOCUMENT_NAME), limits)
    }

    /// Path of the metadata document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the document has been created.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl MetadataStore for JsonFileStore {
    fn load(&self) -> StoreResult<Directory> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let directory = document::decode(&bytes, &self.limits)?;
                debug!(
                    path = %self.path.display(),
                    files = directory.len(),
                    "loaded metadata document"
                );
                Ok(directory)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "initializing empty metadata document");
                let directory = Directory::new();
                self.save(&directory)?;
                Ok(directory)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, directory: &Directory) -> StoreResult<()> {
        let bytes = document::encode(directory, &self.limits)?;
        let parent = self.parent_dir();
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;

        debug!(
            path = %self.path.display(),
            files = directory.len(),
            bytes = bytes.len(),
            "saved metadata document"
        );
        Ok(())
    }

    fn limits(&self) -> Limits {
        self.limits
    }
}
