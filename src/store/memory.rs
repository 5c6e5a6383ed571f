//! In-memory store
//!
//! BTreeMap-backed `KvStore` with the same all-or-none commit semantics as
//! the log store. Used for tests and dry runs.

use std::collections::BTreeMap;

use crate::error::Result;

use super::{KvStore, Value};

/// In-memory key-value store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    commits: u64,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commits applied
    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    /// Borrow the full contents, sorted by key
    pub fn entries(&self) -> &BTreeMap<Vec<u8>, Vec<u8>> {
        &self.data
    }

    /// Consume the store, returning its contents
    pub fn into_entries(self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.data
    }
}

impl KvStore for MemoryStore {
    fn commit(&mut self, entries: &[(String, Value)]) -> Result<()> {
        for (key, value) in entries {
            self.data
                .insert(key.as_bytes().to_vec(), value.as_bytes().to_vec());
        }
        self.commits += 1;
        Ok(())
    }

    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
