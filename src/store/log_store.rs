//! Log Store
//!
//! Directory-backed, append-only store where every commit is one frame.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, SyncStrategy};
use crate::error::{DatasetError, Result};

use super::frame::{append_frame, decode_payload, encode_frame, file_header, FRAME_HEADER_SIZE};
use super::recovery::{Recovery, RecoveryResult, StoreIndex, ValueLocation};
use super::{KvStore, Value};

/// File-backed key-value store
///
/// ## Durability
/// - A commit appends exactly one frame with a single write
/// - A frame counts only if it is complete and its CRC matches
/// - A failed write or sync is rolled back by truncating to the previous length
///
/// Keys live in an in-memory index; values are read from disk on demand.
///
/// A store opened with [`LogStore::open_read_only`] never writes to the file:
/// a torn tail is skipped rather than truncated, and commits are refused.
pub struct LogStore {
    /// Directory holding the store file
    dir: PathBuf,

    /// Path of the store file
    path: PathBuf,

    /// Read/write handle on the store file
    file: File,

    /// Key → value location, rebuilt on open
    index: StoreIndex,

    /// Current file length (end of last committed frame)
    len: u64,

    /// Sequence number for the next commit
    next_seq: u64,

    /// Upper bound on file length
    map_size: u64,

    sync_strategy: SyncStrategy,

    /// What recovery found when the store was opened
    recovery: RecoveryResult,

    /// Opened for inspection only
    read_only: bool,
}

impl LogStore {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const DATA_FILENAME: &'static str = "data.crkv";

    /// Open or create a store in `config.output_dir`
    ///
    /// On open:
    /// 1. Create the directory if it doesn't exist
    /// 2. Recover the index from an existing store file
    /// 3. Write a fresh file header if the file is empty
    pub fn open(config: &Config) -> Result<Self> {
        if config.map_size == 0 {
            return Err(DatasetError::Config(
                "map_size must be greater than zero".to_string(),
            ));
        }

        fs::create_dir_all(&config.output_dir)?;
        let path = Self::data_path(&config.output_dir);

        let (index, recovery) = if path.exists() {
            Recovery::recover(&path)?
        } else {
            (StoreIndex::new(), RecoveryResult::default())
        };

        if recovery.frames_recovered > 0 || recovery.was_truncated {
            tracing::info!(
                path = %path.display(),
                frames = recovery.frames_recovered,
                corrupted = recovery.frames_corrupted,
                last_seq = recovery.last_seq,
                "recovered existing store"
            );
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let mut len = file.metadata()?.len();
        if len == 0 {
            let header = file_header();
            file.write_all(&header)?;
            file.sync_all()?;
            len = header.len() as u64;
        }

        Ok(Self {
            dir: config.output_dir.clone(),
            path,
            file,
            index,
            len,
            next_seq: recovery.last_seq + 1,
            map_size: config.map_size,
            sync_strategy: config.sync_strategy,
            recovery,
            read_only: false,
        })
    }

    /// Open an existing store in `dir` without modifying it
    ///
    /// The index covers the frames before any torn or corrupted tail; the
    /// tail stays on disk untouched.
    pub fn open_read_only(dir: &Path) -> Result<Self> {
        let path = Self::data_path(dir);
        let (index, recovery) = Recovery::scan(&path)?;

        if recovery.was_truncated {
            tracing::warn!(
                path = %path.display(),
                valid_len = recovery.valid_len,
                frames_corrupted = recovery.frames_corrupted,
                "store has an incomplete batch at its tail"
            );
        }

        let file = File::open(&path)?;
        let config = Config::default();

        Ok(Self {
            dir: dir.to_path_buf(),
            path,
            file,
            index,
            len: recovery.valid_len,
            next_seq: recovery.last_seq + 1,
            map_size: config.map_size,
            sync_strategy: config.sync_strategy,
            recovery,
            read_only: true,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified output directory
    pub fn open_path(dir: &Path) -> Result<Self> {
        let config = Config::builder().output_dir(dir).build();
        Self::open(&config)
    }

    /// Path of the store file inside `dir`
    pub fn data_path(dir: &Path) -> PathBuf {
        dir.join(Self::DATA_FILENAME)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        if !self.read_only {
            self.file.sync_all()?;
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

    /// Directory holding the store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current store file size in bytes
    pub fn file_size(&self) -> u64 {
        self.len
    }

    /// Number of batches committed over the store's lifetime
    pub fn commit_count(&self) -> u64 {
        self.next_seq - 1
    }

    /// Whether the store was opened with `open_read_only`
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Recovery stats from open
    pub fn recovery(&self) -> &RecoveryResult {
        &self.recovery
    }

    /// All live keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.index.keys().map(|k| k.as_slice())
    }

    fn read_value(&mut self, location: ValueLocation) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(location.offset))?;
        let mut value = vec![0u8; location.len as usize];
        self.file.read_exact(&mut value)?;
        Ok(value)
    }
}

impl KvStore for LogStore {
    fn commit(&mut self, entries: &[(String, Value)]) -> Result<()> {
        if self.read_only {
            return Err(DatasetError::Storage(format!(
                "store at {} is open read-only",
                self.path.display()
            )));
        }

        let seq = self.next_seq;
        let frame = encode_frame(seq, entries)?;

        let required = self.len + frame.len() as u64;
        if required > self.map_size {
            return Err(DatasetError::StoreFull {
                required,
                map_size: self.map_size,
            });
        }

        let frame_start = self.len;
        let sync = self.sync_strategy == SyncStrategy::EveryCommit;
        append_frame(&mut self.file, frame_start, &frame, sync)?;

        let payload_start = frame_start + FRAME_HEADER_SIZE as u64;
        for entry in decode_payload(&frame[FRAME_HEADER_SIZE..])? {
            self.index.insert(
                entry.key,
                ValueLocation {
                    offset: payload_start + entry.value_offset as u64,
                    len: entry.value_len,
                },
            );
        }

        self.len = required;
        self.next_seq += 1;

        tracing::debug!(seq, entries = entries.len(), bytes = frame.len(), "committed batch");
        Ok(())
    }

    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.index.get(key).copied() {
            Some(location) => self.read_value(location).map(Some),
            None => Ok(None),
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
