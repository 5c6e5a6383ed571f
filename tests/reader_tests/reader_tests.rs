//! Tests for DatasetReader
//!
//! These tests verify:
//! - num-samples parsing
//! - Sample lookup by 1-based index
//! - verify() catching holes in a dataset

use crnnkv::reader::DatasetReader;
use crnnkv::store::{KvStore, MemoryStore, Value};
use crnnkv::DatasetError;

fn store_with(pairs: &[(&str, Value)]) -> MemoryStore {
    let mut store = MemoryStore::new();
    let entries: Vec<(String, Value)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    store.commit(&entries).unwrap();
    store
}

#[test]
fn test_num_samples() {
    let store = store_with(&[("num-samples", Value::from("12"))]);
    let mut reader = DatasetReader::new(store);

    assert_eq!(reader.num_samples().unwrap(), 12);
}

#[test]
fn test_num_samples_missing() {
    let mut reader = DatasetReader::new(MemoryStore::new());

    assert!(matches!(reader.num_samples(), Err(DatasetError::MissingSample(_))));
}

#[test]
fn test_num_samples_not_a_number() {
    let store = store_with(&[("num-samples", Value::from("many"))]);
    let mut reader = DatasetReader::new(store);

    assert!(matches!(reader.num_samples(), Err(DatasetError::Corruption(_))));
}

#[test]
fn test_sample_lookup() {
    let store = store_with(&[
        ("image-000000001", Value::from(vec![1u8, 2, 3])),
        ("label-000000001", Value::from("abc")),
        ("lexicon-000000001", Value::from("abc abd")),
        ("num-samples", Value::from("1")),
    ]);
    let mut reader = DatasetReader::new(store);

    let sample = reader.sample(1).unwrap().unwrap();

    assert_eq!(sample.index, 1);
    assert_eq!(sample.image, vec![1, 2, 3]);
    assert_eq!(sample.label, "abc");
    assert_eq!(sample.lexicon.as_deref(), Some("abc abd"));
    assert!(reader.sample(2).unwrap().is_none());
}

#[test]
fn test_sample_without_label_is_absent() {
    let store = store_with(&[("image-000000001", Value::from(vec![1u8]))]);
    let mut reader = DatasetReader::new(store);

    assert!(reader.sample(1).unwrap().is_none());
}

#[test]
fn test_verify_reports_first_hole() {
    let store = store_with(&[
        ("image-000000001", Value::from(vec![1u8])),
        ("label-000000001", Value::from("a")),
        ("image-000000002", Value::from(vec![2u8])),
        ("num-samples", Value::from("2")),
    ]);
    let mut reader = DatasetReader::new(store);

    match reader.verify() {
        Err(DatasetError::MissingSample(key)) => assert_eq!(key, "label-000000002"),
        other => panic!("expected missing label, got {:?}", other),
    }
}

#[test]
fn test_verify_empty_dataset() {
    let store = store_with(&[("num-samples", Value::from("0"))]);
    let mut reader = DatasetReader::new(store);

    assert_eq!(reader.verify().unwrap(), 0);
}
