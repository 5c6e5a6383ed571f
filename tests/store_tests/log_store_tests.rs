//! Tests for LogStore
//!
//! These tests verify:
//! - Atomic batch commits and point lookups
//! - Persistence across reopen
//! - Overwrite semantics (later commits win)
//! - Map size enforcement
//! - Sync strategies

use crnnkv::config::{Config, SyncStrategy};
use crnnkv::store::{KvStore, LogStore, Value};
use crnnkv::DatasetError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, LogStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = LogStore::open_path(temp_dir.path()).unwrap();
    (temp_dir, store)
}

fn entries(pairs: &[(&str, &str)]) -> Vec<(String, Value)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_open_creates_directory_and_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("nested").join("dataset");

    let store = LogStore::open_path(&dir).unwrap();

    assert!(dir.exists());
    assert!(LogStore::data_path(&dir).exists());
    assert_eq!(store.len(), 0);
    assert_eq!(store.commit_count(), 0);
}

#[test]
fn test_commit_and_get() {
    let (_temp, mut store) = setup_temp_store();

    store
        .commit(&entries(&[("label-000000001", "hello"), ("num-samples", "1")]))
        .unwrap();

    assert_eq!(store.get(b"label-000000001").unwrap(), Some(b"hello".to_vec()));
    assert_eq!(store.get(b"num-samples").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.len(), 2);
    assert_eq!(store.commit_count(), 1);
}

#[test]
fn test_get_nonexistent_key() {
    let (_temp, mut store) = setup_temp_store();

    assert_eq!(store.get(b"image-000000001").unwrap(), None);
}

#[test]
fn test_binary_values_round_trip() {
    let (_temp, mut store) = setup_temp_store();
    let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    store
        .commit(&[("image-000000001".to_string(), Value::from(payload.clone()))])
        .unwrap();

    assert_eq!(store.get(b"image-000000001").unwrap(), Some(payload));
}

#[test]
fn test_empty_value() {
    let (_temp, mut store) = setup_temp_store();

    store.commit(&entries(&[("label-000000001", "")])).unwrap();

    assert_eq!(store.get(b"label-000000001").unwrap(), Some(Vec::new()));
}

#[test]
fn test_empty_commit_is_recorded() {
    let (_temp, mut store) = setup_temp_store();

    store.commit(&[]).unwrap();

    assert_eq!(store.commit_count(), 1);
    assert!(store.is_empty());
}

#[test]
fn test_later_commit_overwrites() {
    let (_temp, mut store) = setup_temp_store();

    store.commit(&entries(&[("num-samples", "1000")])).unwrap();
    store.commit(&entries(&[("num-samples", "1500")])).unwrap();

    assert_eq!(store.get(b"num-samples").unwrap(), Some(b"1500".to_vec()));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_keys_sorted() {
    let (_temp, mut store) = setup_temp_store();

    store
        .commit(&entries(&[("label-000000002", "b"), ("image-000000001", "x"), ("label-000000001", "a")]))
        .unwrap();

    let keys: Vec<&[u8]> = store.keys().collect();
    assert_eq!(
        keys,
        vec![
            b"image-000000001".as_slice(),
            b"label-000000001".as_slice(),
            b"label-000000002".as_slice(),
        ]
    );
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_reopen_preserves_data() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut store = LogStore::open_path(temp_dir.path()).unwrap();
        store.commit(&entries(&[("a", "1"), ("b", "2")])).unwrap();
        store.commit(&entries(&[("c", "3")])).unwrap();
        store.close().unwrap();
    }

    let mut store = LogStore::open_path(temp_dir.path()).unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(store.commit_count(), 2);
    assert_eq!(store.recovery().frames_recovered, 2);
    assert!(!store.recovery().was_truncated);
    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.get(b"c").unwrap(), Some(b"3".to_vec()));
}

#[test]
fn test_commit_after_reopen_continues_sequence() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut store = LogStore::open_path(temp_dir.path()).unwrap();
        store.commit(&entries(&[("a", "1")])).unwrap();
    }

    {
        let mut store = LogStore::open_path(temp_dir.path()).unwrap();
        store.commit(&entries(&[("a", "2")])).unwrap();
        assert_eq!(store.commit_count(), 2);
    }

    let mut store = LogStore::open_path(temp_dir.path()).unwrap();
    assert_eq!(store.recovery().last_seq, 2);
    assert_eq!(store.get(b"a").unwrap(), Some(b"2".to_vec()));
}

#[test]
fn test_sync_on_close_strategy() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .output_dir(temp_dir.path())
        .sync_strategy(SyncStrategy::OnClose)
        .build();

    {
        let mut store = LogStore::open(&config).unwrap();
        for i in 0..10 {
            let key = format!("key{}", i);
            store.commit(&entries(&[(key.as_str(), "v")])).unwrap();
        }
        store.close().unwrap();
    }

    let store = LogStore::open(&config).unwrap();
    assert_eq!(store.len(), 10);
}

// =============================================================================
// Map Size Tests
// =============================================================================

#[test]
fn test_store_full_rejects_commit() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .output_dir(temp_dir.path())
        .map_size(64)
        .build();
    let mut store = LogStore::open(&config).unwrap();

    let big = vec![0u8; 128];
    let result = store.commit(&[("image-000000001".to_string(), Value::from(big))]);

    assert!(matches!(result, Err(DatasetError::StoreFull { map_size: 64, .. })));
    assert!(store.is_empty());
    assert_eq!(store.commit_count(), 0);
}

#[test]
fn test_store_full_leaves_earlier_commits() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .output_dir(temp_dir.path())
        .map_size(100)
        .build();

    {
        let mut store = LogStore::open(&config).unwrap();
        store.commit(&entries(&[("a", "1")])).unwrap();
        let size_before = store.file_size();

        let result = store.commit(&[("b".to_string(), Value::from(vec![1u8; 200]))]);
        assert!(result.is_err());
        assert_eq!(store.file_size(), size_before);
    }

    let mut store = LogStore::open(&config).unwrap();
    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.get(b"b").unwrap(), None);
}

#[test]
fn test_zero_map_size_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .output_dir(temp_dir.path())
        .map_size(0)
        .build();

    assert!(matches!(LogStore::open(&config), Err(DatasetError::Config(_))));
}
