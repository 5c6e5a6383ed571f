//! # crnnkv
//!
//! Builds key-value datasets for training text-recognition models:
//! - Tab-delimited manifest of `<image_path>\t<label>` rows
//! - Image validation (decodes to a non-empty grayscale raster)
//! - Deterministic `image-%09d` / `label-%09d` keys
//! - Atomic, bounded-size batch commits to a persistent store
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Manifest Reader                         │
//! │                  (one row per line)                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Dataset Builder                          │
//! │        (validate → assign key → push to batch)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Validator  │          │ RecordBatch │
//!   │   (image)   │          │  (bounded)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │ flush (atomic commit)
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   KvStore   │
//!                           │   (LMDB)    │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod logging;

pub mod keys;
pub mod manifest;
pub mod validator;
pub mod batch;
pub mod builder;
pub mod store;
pub mod reader;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DatasetError, Result};
pub use config::Config;
pub use builder::{create_dataset, BuildSummary};
pub use reader::DatasetReader;
pub use store::{KvStore, LmdbStore, LogStore, MemoryStore, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of crnnkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
