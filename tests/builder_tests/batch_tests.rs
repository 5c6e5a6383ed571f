//! Tests for RecordBatch and flush
//!
//! These tests verify:
//! - Capacity is counted in records, not entries
//! - flush commits once and clears the batch
//! - Empty batches are never committed

use crnnkv::batch::{flush, RecordBatch};
use crnnkv::store::{KvStore, MemoryStore, Value};

fn push_record(batch: &mut RecordBatch, index: u64) {
    batch.push(format!("image-{:09}", index), vec![index as u8]);
    batch.push(format!("label-{:09}", index), format!("label{}", index));
    batch.finish_record();
}

#[test]
fn test_capacity_counts_records() {
    let mut batch = RecordBatch::with_capacity(2);

    push_record(&mut batch, 1);
    assert!(!batch.is_full());
    assert_eq!(batch.len(), 2);

    push_record(&mut batch, 2);
    assert!(batch.is_full());
    assert_eq!(batch.len(), 4);
    assert_eq!(batch.records(), 2);
}

#[test]
fn test_zero_capacity_is_clamped() {
    let batch = RecordBatch::with_capacity(0);

    assert_eq!(batch.capacity(), 1);
}

#[test]
fn test_entries_keep_insertion_order() {
    let mut batch = RecordBatch::with_capacity(10);
    batch.push("b".to_string(), "2");
    batch.push("a".to_string(), "1");

    let keys: Vec<&str> = batch.entries().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["b", "a"]);
    assert_eq!(batch.entries()[0].1, Value::Text("2".to_string()));
}

#[test]
fn test_flush_commits_and_clears() {
    let mut store = MemoryStore::new();
    let mut batch = RecordBatch::with_capacity(2);
    push_record(&mut batch, 1);
    push_record(&mut batch, 2);

    let committed = flush(&mut store, &mut batch).unwrap();

    assert!(committed);
    assert!(batch.is_empty());
    assert_eq!(batch.records(), 0);
    assert_eq!(store.commit_count(), 1);
    assert_eq!(store.len(), 4);
    assert_eq!(store.get(b"label-000000002").unwrap(), Some(b"label2".to_vec()));
}

#[test]
fn test_flush_empty_batch_is_noop() {
    let mut store = MemoryStore::new();
    let mut batch = RecordBatch::with_capacity(5);

    let committed = flush(&mut store, &mut batch).unwrap();

    assert!(!committed);
    assert_eq!(store.commit_count(), 0);
}
