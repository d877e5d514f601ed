//! The store engine: create, read and list over a [`MetadataStore`].

use tracing::{debug, info};

use sdfs_store::{MetadataStore, StoreResult};
use sdfs_types::{Block, Directory, FileEntry, Usage};

use crate::config::EngineConfig;
use crate::error::{ConfigError, CreateError, ReadError};

/// The outcome of a successful [`StoreEngine::create_file`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedFile {
    /// The entry as stored.
    pub entry: FileEntry,
    /// The block sequence the payload was split into, for display.
    pub blocks: Vec<Block>,
}

/// Policy layer over a whole-document metadata store.
///
/// The engine keeps no directory state between calls. Each operation loads
/// the full directory, validates, and (for `create_file`) saves it back.
/// Two engines sharing a store, or one engine used from several threads,
/// can lose updates when their load/save pairs interleave; callers in that
/// situation must hold a single-writer lock around every call.
#[derive(Debug)]
pub struct StoreEngine<S> {
    store: S,
    config: EngineConfig,
}

impl<S: MetadataStore> StoreEngine<S> {
    /// Create an engine with the default payload ceiling and the store's
    /// own limits.
    pub fn new(store: S) -> Self {
        let config = EngineConfig {
            limits: store.limits(),
            ..EngineConfig::default()
        };
        Self { store, config }
    }

    /// Create an engine with a custom configuration.
    ///
    /// `config.limits` must equal the store's limits, otherwise files the
    /// engine splits would not load back.
    pub fn with_config(store: S, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store_limits = store.limits();
        if config.limits != store_limits {
            return Err(ConfigError::LimitsMismatch {
                engine: config.limits,
                store: store_limits,
            });
        }
        Ok(Self { store, config })
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying metadata store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store `payload` as a new file called `name`.
    ///
    /// Checks run in this order and the first failure is returned:
    ///
    /// 1. name longer than `max_name_len` characters ([`CreateError::NameTooLong`]),
    ///    or empty ([`CreateError::EmptyName`])
    /// 2. name already taken ([`CreateError::AlreadyExists`])
    /// 3. directory at `max_entries` ([`CreateError::DirectoryFull`])
    /// 4. payload over `max_file_size` bytes ([`CreateError::FileTooLarge`])
    ///
    /// Nothing is written unless every check passes.
    pub fn create_file(&self, name: &str, payload: &[u8]) -> Result<CreatedFile, CreateError> {
        let mut directory = self.store.load()?;

        if let Err(e) = self.check_create(&directory, name, payload.len()) {
            debug!(name, size = payload.len(), reason = %e, "create rejected");
            return Err(e);
        }

        let entry = FileEntry::from_payload(name, payload, self.config.limits.block_size);
        if directory.insert(entry.clone()).is_err() {
            return Err(CreateError::AlreadyExists {
                name: name.to_string(),
            });
        }
        self.store.save(&directory)?;

        info!(
            name,
            size = entry.size,
            blocks = entry.block_count,
            files = directory.len(),
            "file created"
        );
        let blocks = entry.blocks.clone();
        Ok(CreatedFile { entry, blocks })
    }

    fn check_create(
        &self,
        directory: &Directory,
        name: &str,
        size: usize,
    ) -> Result<(), CreateError> {
        let limits = &self.config.limits;

        let len = name.chars().count();
        if len > limits.max_name_len {
            return Err(CreateError::NameTooLong {
                name: name.to_string(),
                len,
                max: limits.max_name_len,
            });
        }
        if len == 0 {
            return Err(CreateError::EmptyName);
        }
        if directory.contains(name) {
            return Err(CreateError::AlreadyExists {
                name: name.to_string(),
            });
        }
        if directory.len() >= limits.max_entries {
            return Err(CreateError::DirectoryFull {
                max: limits.max_entries,
            });
        }
        match self.config.max_file_size {
            Some(max) if size > max => Err(CreateError::FileTooLarge { size, max }),
            _ => Ok(()),
        }
    }

    /// Return the stored blocks of `name`, unchanged and in order.
    pub fn read_file(&self, name: &str) -> Result<Vec<Block>, ReadError> {
        self.stat_file(name).map(|entry| entry.blocks)
    }

    /// Return the full entry (metadata and blocks) of `name`.
    pub fn stat_file(&self, name: &str) -> Result<FileEntry, ReadError> {
        let directory = self.store.load()?;
        match directory.get(name) {
            Some(entry) => Ok(entry.clone()),
            None => {
                debug!(name, "file not found");
                Err(ReadError::NotFound {
                    name: name.to_string(),
                })
            }
        }
    }

    /// Names of all files, in creation order.
    pub fn list_files(&self) -> StoreResult<Vec<String>> {
        Ok(self.store.load()?.names())
    }

    /// File count, bytes and blocks currently used.
    pub fn usage(&self) -> StoreResult<Usage> {
        Ok(self.store.load()?.usage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdfs_store::{InMemoryMetadataStore, JsonFileStore, StoreError};
    use sdfs_types::Limits;

    fn engine() -> StoreEngine<InMemoryMetadataStore> {
        StoreEngine::new(InMemoryMetadataStore::new())
    }

    fn fill(engine: &StoreEngine<InMemoryMetadataStore>, count: usize) {
        for i in 0..count {
            engine.create_file(&format!("f{i}"), b"x").unwrap();
        }
    }

    // -----------------------------------------------------------------------
    // create_file
    // -----------------------------------------------------------------------

    #[test]
    fn create_returns_entry_and_blocks() {
        let engine = engine();
        let created = engine.create_file("data", "A".repeat(300).as_bytes()).unwrap();
        assert_eq!(created.entry.name, "data");
        assert_eq!(created.entry.size, 300);
        assert_eq!(created.entry.block_count, 2);
        assert_eq!(created.blocks, created.entry.blocks);
        assert_eq!(created.entry.block_lengths(), vec![256, 44]);
    }

    #[test]
    fn create_empty_payload_stores_one_empty_block() {
        let engine = engine();
        let created = engine.create_file("empty", b"").unwrap();
        assert_eq!(created.entry.size, 0);
        assert_eq!(created.blocks.len(), 1);
        assert!(created.blocks[0].is_empty());
    }

    #[test]
    fn nine_character_name_is_too_long() {
        let engine = engine();
        engine.create_file("keep", b"k").unwrap();
        let before = engine.store().raw_document().unwrap();

        let err = engine.create_file("ninechars", b"x").unwrap_err();
        assert!(matches!(err, CreateError::NameTooLong { len: 9, max: 8, .. }));
        assert_eq!(engine.store().raw_document().unwrap(), before);
        assert_eq!(engine.list_files().unwrap(), vec!["keep"]);
    }

    #[test]
    fn eight_character_name_is_accepted() {
        let engine = engine();
        assert!(engine.create_file("eightchr", b"x").is_ok());
    }

    #[test]
    fn name_length_counts_characters() {
        let engine = engine();
        // Eight characters, sixteen bytes.
        assert!(engine.create_file("éééééééé", b"x").is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let engine = engine();
        assert!(matches!(
            engine.create_file("", b"x"),
            Err(CreateError::EmptyName)
        ));
        assert!(engine.list_files().unwrap().is_empty());
    }

    #[test]
    fn duplicate_name_already_exists() {
        let engine = engine();
        engine.create_file("abc", b"first").unwrap();
        let err = engine.create_file("abc", b"second").unwrap_err();
        assert!(matches!(err, CreateError::AlreadyExists { ref name } if name == "abc"));

        assert_eq!(engine.list_files().unwrap(), vec!["abc"]);
        let blocks = engine.read_file("abc").unwrap();
        assert_eq!(blocks[0].as_bytes(), b"first");
    }

    #[test]
    fn one_hundred_twenty_ninth_file_is_rejected() {
        let engine = engine();
        fill(&engine, 128);
        assert_eq!(engine.list_files().unwrap().len(), 128);

        let err = engine.create_file("extra", b"x").unwrap_err();
        assert!(matches!(err, CreateError::DirectoryFull { max: 128 }));
        assert_eq!(engine.list_files().unwrap().len(), 128);
    }

    #[test]
    fn payload_over_ceiling_is_rejected() {
        let engine = engine();
        assert!(engine.create_file("max", &[b'a'; 1024]).is_ok());
        let err = engine.create_file("over", &[b'a'; 1025]).unwrap_err();
        assert!(matches!(err, CreateError::FileTooLarge { size: 1025, max: 1024 }));
    }

    #[test]
    fn unbounded_config_accepts_large_payload() {
        let engine =
            StoreEngine::with_config(InMemoryMetadataStore::new(), EngineConfig::unbounded())
                .unwrap();
        let created = engine.create_file("big", &[0u8; 5000]).unwrap();
        assert_eq!(created.entry.block_count, 20);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.limits.block_size = 0;
        assert!(matches!(
            StoreEngine::with_config(InMemoryMetadataStore::new(), config),
            Err(ConfigError::Limits(_))
        ));
    }

    #[test]
    fn config_limits_must_match_store() {
        let mut config = EngineConfig::default();
        config.limits.block_size = 512;
        let err = StoreEngine::with_config(InMemoryMetadataStore::new(), config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::LimitsMismatch { engine, store }
                if engine.block_size == 512 && store.block_size == 256
        ));
    }

    #[test]
    fn new_adopts_store_limits() {
        let limits = Limits {
            block_size: 512,
            ..Limits::default()
        };
        let engine = StoreEngine::new(InMemoryMetadataStore::with_limits(limits));
        assert_eq!(engine.config().limits, limits);

        let created = engine.create_file("big", &[b'a'; 600]).unwrap();
        assert_eq!(created.entry.block_lengths(), vec![512, 88]);
        assert_eq!(engine.list_files().unwrap(), vec!["big"]);
        assert_eq!(engine.read_file("big").unwrap(), created.blocks);
    }

    // -----------------------------------------------------------------------
    // Validation precedence
    // -----------------------------------------------------------------------

    #[test]
    fn long_name_wins_over_full_directory() {
        let engine = engine();
        fill(&engine, 128);
        assert!(matches!(
            engine.create_file("waytoolongname", b"x"),
            Err(CreateError::NameTooLong { .. })
        ));
    }

    #[test]
    fn existing_name_wins_over_full_directory() {
        let engine = engine();
        fill(&engine, 128);
        assert!(matches!(
            engine.create_file("f0", b"x"),
            Err(CreateError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn full_directory_wins_over_oversized_payload() {
        let engine = engine();
        fill(&engine, 128);
        assert!(matches!(
            engine.create_file("new", &[0u8; 2000]),
            Err(CreateError::DirectoryFull { .. })
        ));
    }

    #[test]
    fn long_name_wins_over_oversized_payload() {
        let engine = engine();
        assert!(matches!(
            engine.create_file("ninechars", &[0u8; 2000]),
            Err(CreateError::NameTooLong { .. })
        ));
    }

    #[test]
    fn custom_limits_apply() {
        let config = EngineConfig {
            limits: Limits {
                block_size: 4,
                max_name_len: 3,
                max_entries: 2,
            },
            max_file_size: Some(10),
        };
        let store = InMemoryMetadataStore::with_limits(config.limits);
        let engine = StoreEngine::with_config(store, config).unwrap();

        let created = engine.create_file("abc", b"0123456789").unwrap();
        assert_eq!(created.entry.block_lengths(), vec![4, 4, 2]);
        assert!(matches!(
            engine.create_file("abcd", b""),
            Err(CreateError::NameTooLong { max: 3, .. })
        ));
        engine.create_file("b", b"").unwrap();
        assert!(matches!(
            engine.create_file("c", b""),
            Err(CreateError::DirectoryFull { max: 2 })
        ));
    }

    // -----------------------------------------------------------------------
    // read_file / stat_file / list_files / usage
    // -----------------------------------------------------------------------

    #[test]
    fn read_missing_on_empty_directory() {
        let engine = engine();
        let err = engine.read_file("missing").unwrap_err();
        assert!(matches!(err, ReadError::NotFound { ref name } if name == "missing"));
    }

    #[test]
    fn read_returns_stored_blocks() {
        let engine = engine();
        engine.create_file("data", "A".repeat(300).as_bytes()).unwrap();
        let blocks = engine.read_file("data").unwrap();
        let lens: Vec<usize> = blocks.iter().map(Block::len).collect();
        assert_eq!(lens, vec![256, 44]);
        assert_eq!(engine.list_files().unwrap(), vec!["data"]);
    }

    #[test]
    fn stat_returns_full_entry() {
        let engine = engine();
        engine.create_file("note", b"hello").unwrap();
        let entry = engine.stat_file("note").unwrap();
        assert_eq!(entry.size, 5);
        assert_eq!(entry.content(), b"hello");
        assert!(matches!(
            engine.stat_file("nope"),
            Err(ReadError::NotFound { .. })
        ));
    }

    #[test]
    fn list_empty_directory() {
        assert!(engine().list_files().unwrap().is_empty());
    }

    #[test]
    fn list_preserves_creation_order() {
        let engine = engine();
        for name in ["zz", "aa", "mm"] {
            engine.create_file(name, b"x").unwrap();
        }
        assert_eq!(engine.list_files().unwrap(), vec!["zz", "aa", "mm"]);
        assert_eq!(engine.list_files().unwrap(), vec!["zz", "aa", "mm"]);
    }

    #[test]
    fn usage_tracks_creates() {
        let engine = engine();
        engine.create_file("a", &[1u8; 600]).unwrap();
        engine.create_file("b", b"").unwrap();
        let usage = engine.usage().unwrap();
        assert_eq!(usage.files, 2);
        assert_eq!(usage.bytes, 600);
        assert_eq!(usage.blocks, 4);
    }

    // -----------------------------------------------------------------------
    // Storage failures
    // -----------------------------------------------------------------------

    #[test]
    fn save_failure_surfaces_as_io() {
        let engine = engine();
        engine.create_file("a", b"a").unwrap();
        engine.store().set_read_only(true);

        let err = engine.create_file("b", b"b").unwrap_err();
        assert!(matches!(err, CreateError::Io(StoreError::ReadOnly)));
        assert_eq!(engine.list_files().unwrap(), vec!["a"]);
    }

    #[test]
    fn corrupt_document_surfaces_on_every_operation() {
        let store = InMemoryMetadataStore::new();
        store.set_raw_document(b"not json".to_vec()).unwrap();
        let engine = StoreEngine::new(store);

        assert!(matches!(engine.create_file("a", b"a"), Err(CreateError::Io(_))));
        assert!(matches!(engine.read_file("a"), Err(ReadError::Io(_))));
        assert!(engine.list_files().is_err());
    }

    // -----------------------------------------------------------------------
    // File-backed end to end
    // -----------------------------------------------------------------------

    #[test]
    fn file_store_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let engine = StoreEngine::new(JsonFileStore::in_dir(dir.path(), Limits::default()));

        engine.create_file("data", "A".repeat(300).as_bytes()).unwrap();
        let blocks = engine.read_file("data").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].len(), 256);
        assert_eq!(blocks[1].len(), 44);
        assert_eq!(engine.list_files().unwrap(), vec!["data"]);

        // A fresh engine over the same document sees the same state.
        let reopened = StoreEngine::new(JsonFileStore::in_dir(dir.path(), Limits::default()));
        assert_eq!(reopened.list_files().unwrap(), vec!["data"]);
        assert!(matches!(
            reopened.create_file("data", b"again"),
            Err(CreateError::AlreadyExists { .. })
        ));
    }
}
