//! Error types for crnnkv
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using DatasetError
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Unified error type for dataset operations
#[derive(Debug, Error)]
pub enum DatasetError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Manifest Errors
    // -------------------------------------------------------------------------
    #[error("Manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Manifest error at line {line}: {message}")]
    Manifest { line: usize, message: String },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Store corruption detected: {0}")]
    Corruption(String),

    #[error("Store full: commit needs {required} bytes but map size is {map_size}")]
    StoreFull { required: u64, map_size: u64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] heed::Error),

    // -------------------------------------------------------------------------
    // Dataset Errors
    // -------------------------------------------------------------------------
    #[error("Missing sample entry: {0}")]
    MissingSample(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
