//! Configuration for crnnkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{DatasetError, Result};

/// Default number of accepted records per committed batch
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default store size budget: 1 TiB
pub const DEFAULT_MAP_SIZE: u64 = 1 << 40;

/// Main configuration for a dataset build
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the store files
    /// Internal structure:
    ///   {output_dir}/
    ///     └── data.crkv        (append-only batch log)
    pub output_dir: PathBuf,

    /// Upper bound on the store file size (in bytes)
    pub map_size: u64,

    /// Sync strategy: when to fsync committed batches
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Builder Configuration
    // -------------------------------------------------------------------------
    /// Accepted records per atomic commit
    pub batch_size: usize,

    /// Decode every image before accepting it
    pub check_valid: bool,

    /// Optional lexicon lists. Only the first list is ever written.
    pub lexicon: Option<Vec<Vec<String>>>,
}

/// Store sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every committed batch
    EveryCommit,

    /// fsync only when the store is closed
    OnClose,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./"),
            map_size: DEFAULT_MAP_SIZE,
            sync_strategy: SyncStrategy::EveryCommit,
            batch_size: DEFAULT_BATCH_SIZE,
            check_valid: true,
            lexicon: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the builder cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DatasetError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.map_size == 0 {
            return Err(DatasetError::Config(
                "map_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the output directory of the store
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    /// Set the maximum store size (in bytes)
    pub fn map_size(mut self, bytes: u64) -> Self {
        self.config.map_size = bytes;
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the number of accepted records per commit
    pub fn batch_size(mut self, records: usize) -> Self {
        self.config.batch_size = records;
        self
    }

    /// Enable or disable image validation
    pub fn check_valid(mut self, enabled: bool) -> Self {
        self.config.check_valid = enabled;
        self
    }

    /// Set the lexicon lists
    pub fn lexicon(mut self, lexicon: Vec<Vec<String>>) -> Self {
        self.config.lexicon = Some(lexicon);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
