//! LMDB Store
//!
//! Dataset store in the LMDB environment layout (`data.mdb` + `lock.mdb`)
//! that text-recognition training loaders read directly.

use std::fs;
use std::path::{Path, PathBuf};

use heed::types::Bytes as RawBytes;
use heed::{Database, Env, EnvFlags, EnvOpenOptions};

use crate::config::{Config, SyncStrategy};
use crate::error::{DatasetError, Result};

use super::{KvStore, Value};

/// LMDB-backed key-value store
///
/// Each `commit` runs in one write transaction: every entry lands or none
/// does. Keys and values go into the unnamed main database as raw bytes.
pub struct LmdbStore {
    /// Environment directory
    dir: PathBuf,

    env: Env,

    db: Database<RawBytes, RawBytes>,

    sync_strategy: SyncStrategy,

    /// Opened for inspection only
    read_only: bool,
}

impl LmdbStore {
    const DATA_FILENAME: &'static str = "data.mdb";

    /// Open or create an environment in `config.output_dir`
    ///
    /// The memory map is sized to `config.map_size`; a commit that would
    /// grow the environment past it fails.
    pub fn open(config: &Config) -> Result<Self> {
        let map_size = map_size(config.map_size)?;

        fs::create_dir_all(&config.output_dir)?;

        let mut options = EnvOpenOptions::new();
        options.map_size(map_size);
        if config.sync_strategy == SyncStrategy::OnClose {
            // SAFETY: `close` forces a sync before the environment is dropped.
            unsafe {
                options.flags(EnvFlags::NO_SYNC);
            }
        }

        // SAFETY: the environment directory is opened once per store and
        // the memory map is never handed out past a transaction.
        let env = unsafe { options.open(&config.output_dir)? };

        let mut wtxn = env.write_txn()?;
        let db: Database<RawBytes, RawBytes> = env.create_database(&mut wtxn, None)?;
        wtxn.commit()?;

        tracing::debug!(
            path = %config.output_dir.display(),
            map_size,
            "opened lmdb environment"
        );

        Ok(Self {
            dir: config.output_dir.clone(),
            env,
            db,
            sync_strategy: config.sync_strategy,
            read_only: false,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified output directory
    pub fn open_path(dir: &Path) -> Result<Self> {
        let config = Config::builder().output_dir(dir).build();
        Self::open(&config)
    }

    /// Open an existing environment in `dir` without writing to it
    pub fn open_read_only(dir: &Path) -> Result<Self> {
        let config = Config::default();

        let mut options = EnvOpenOptions::new();
        options.map_size(map_size(config.map_size)?);
        // SAFETY: read-only environments never modify the data file.
        unsafe {
            options.flags(EnvFlags::READ_ONLY);
        }

        // SAFETY: see `open`.
        let env = unsafe { options.open(dir)? };

        let rtxn = env.read_txn()?;
        let db: Database<RawBytes, RawBytes> = env
            .open_database(&rtxn, None)?
            .ok_or_else(|| {
                DatasetError::Storage(format!("{} has no main database", dir.display()))
            })?;
        rtxn.commit()?;

        Ok(Self {
            dir: dir.to_path_buf(),
            env,
            db,
            sync_strategy: config.sync_strategy,
            read_only: true,
        })
    }

    /// Path of the LMDB data file inside `dir`
    pub fn data_path(dir: &Path) -> PathBuf {
        dir.join(Self::DATA_FILENAME)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        if !self.read_only {
            self.env.force_sync()?;
        }
        Ok(())
    }

    /// Close the store, syncing any unsynced commits
    pub fn close(mut self) -> Result<()> {
        self.sync()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Environment directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the LMDB data file
    pub fn path(&self) -> PathBuf {
        Self::data_path(&self.dir)
    }

    pub fn sync_strategy(&self) -> SyncStrategy {
        self.sync_strategy
    }

    /// Whether the store was opened with `open_read_only`
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

impl KvStore for LmdbStore {
    fn commit(&mut self, entries: &[(String, Value)]) -> Result<()> {
        if self.read_only {
            return Err(DatasetError::Storage(format!(
                "store at {} is open read-only",
                self.dir.display()
            )));
        }

        // Dropping the transaction on error aborts it
        let mut wtxn = self.env.write_txn()?;
        for (key, value) in entries {
            self.db.put(&mut wtxn, key.as_bytes(), value.as_bytes())?;
        }
        wtxn.commit()?;

        tracing::debug!(entries = entries.len(), "committed batch");
        Ok(())
    }

    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let rtxn = self.env.read_txn()?;
        let value = self.db.get(&rtxn, key)?.map(|v| v.to_vec());
        Ok(value)
    }

    fn len(&self) -> usize {
        let count = self
            .env
            .read_txn()
            .and_then(|rtxn| self.db.len(&rtxn));

        match count {
            Ok(count) => count as usize,
            Err(e) => {
                tracing::warn!(error = %e, "failed to count lmdb entries");
                0
            }
        }
    }
}

fn map_size(bytes: u64) -> Result<usize> {
    match usize::try_from(bytes) {
        Ok(0) => Err(DatasetError::Config(
            "map_size must be greater than zero".to_string(),
        )),
        Ok(size) => Ok(size),
        Err(_) => Err(DatasetError::Config(format!(
            "map_size {} does not fit in the address space",
            bytes
        ))),
    }
}
