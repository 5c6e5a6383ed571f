//! Record Batch
//!
//! Bounded, append-only buffer of pending entries. The batching policy lives
//! here so the row loop only pushes and asks `is_full()`.

use crate::error::Result;
use crate::store::{KvStore, Value};

/// Pending entries for the next atomic commit
#[derive(Debug, Clone)]
pub struct RecordBatch {
    /// Entries in insertion order
    entries: Vec<(String, Value)>,

    /// Accepted records since the last flush
    records: usize,

    /// Records per batch before `is_full()` trips
    capacity: usize,
}

impl RecordBatch {
    /// Create a batch that fills after `capacity` records (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            records: 0,
            capacity: capacity.max(1),
        }
    }

    /// Append an entry
    pub fn push(&mut self, key: String, value: impl Into<Value>) {
        self.entries.push((key, value.into()));
    }

    /// Mark one accepted record as complete
    pub fn finish_record(&mut self) {
        self.records += 1;
    }

    /// Whether the batch holds `capacity` records
    pub fn is_full(&self) -> bool {
        self.records >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of buffered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of records since the last flush
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Buffered entries in insertion order
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Drop all buffered entries
    pub fn clear(&mut self) {
        self.entries.clear();
        self.records = 0;
    }
}

/// Commit everything in `batch` as one atomic write, then clear it
///
/// Returns `true` if a commit happened. An empty batch is left alone. On
/// error the batch keeps its entries.
pub fn flush<S: KvStore + ?Sized>(store: &mut S, batch: &mut RecordBatch) -> Result<bool> {
    if batch.is_empty() {
        return Ok(false);
    }

    store.commit(batch.entries())?;
    tracing::debug!(
        entries = batch.len(),
        records = batch.records(),
        "flushed batch"
    );
    batch.clear();
    Ok(true)
}
