//! Store Module
//!
//! The transactional key-value collaborator the dataset builder writes to.
//!
//! ## Responsibilities
//! - Atomic multi-key commits (all entries of a batch or none)
//! - Point lookups for reading a dataset back
//! - Crash recovery: only fully committed batches survive
//!
//! ## Backends
//! - `LmdbStore`: LMDB environment, the layout training loaders read
//! - `LogStore`: single append-only frame log with its own recovery
//! - `MemoryStore`: in-memory, for tests
//!
//! ## File Format (`LogStore`)
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Header: Magic "CRKV" (4) | Version (2)  │
//! ├─────────────────────────────────────────┤
//! │ Frame 1 (one committed batch)           │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ Seq (8) │ CRC (4) │Len (4) │Payload │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Frame 2                                 │
//! │ ...                                     │
//! └─────────────────────────────────────────┘
//! ```

pub mod frame;
mod lmdb;
mod log_store;
mod memory;
mod recovery;
mod value;

pub use lmdb::LmdbStore;
pub use log_store::LogStore;
pub use memory::MemoryStore;
pub use recovery::{Recovery, RecoveryResult, StoreIndex, ValueLocation};
pub use value::Value;

use crate::error::Result;

/// A key-value store with atomic batch commits
pub trait KvStore {
    /// Write every entry, or none of them
    ///
    /// Later entries for the same key win over earlier ones.
    fn commit(&mut self, entries: &[(String, Value)]) -> Result<()>;

    /// Get a value by key
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Number of live keys
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
