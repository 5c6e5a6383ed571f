//! Dataset Builder
//!
//! Turns a manifest into a key-value dataset.
//!
//! ## Row Pipeline
//! ```text
//! row → normalize label → read image → (validate) → assign index → batch
//!                                                              │
//!                                        every N records ──────┴──→ commit
//! ```
//! Skipped rows never consume an index, so sample keys stay contiguous.

use std::fs;
use std::path::Path;

use bytes::Bytes;

use crate::batch::{flush, RecordBatch};
use crate::config::Config;
use crate::error::Result;
use crate::keys::{image_key, label_key, lexicon_key, NUM_SAMPLES_KEY};
use crate::manifest::{Manifest, ManifestRow};
use crate::store::KvStore;
use crate::validator::is_valid_image;

/// Counts reported at the end of a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Accepted samples (the value written under `num-samples`)
    pub samples: u64,

    /// Rows whose image file was missing or unreadable
    pub skipped_missing: u64,

    /// Rows whose image failed validation
    pub skipped_invalid: u64,

    /// Atomic commits issued, including the final one
    pub batches_committed: u64,
}

/// Why a row was left out of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Image path does not name a readable file
    Missing,

    /// Image bytes did not decode to a non-empty raster
    InvalidImage,
}

/// What happened to a single manifest row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Row stored under the given 1-based index
    Accepted(u64),

    /// Row skipped; the index was not used
    Skipped(SkipReason),
}

/// Build a dataset from the manifest at `manifest_path` into `store`
///
/// A missing or unparseable manifest and store failures are fatal. Missing
/// and invalid images are skipped with a warning.
pub fn create_dataset<S: KvStore + ?Sized>(
    manifest_path: &Path,
    store: &mut S,
    config: &Config,
) -> Result<BuildSummary> {
    config.validate()?;

    let manifest = Manifest::open(manifest_path)?;
    let lexicon = first_lexicon(config.lexicon.as_deref());

    let mut batch = RecordBatch::with_capacity(config.batch_size);
    let mut summary = BuildSummary::default();
    let mut next_index: u64 = 1;

    for row in manifest {
        let row = row?;

        next_index = match process_row(
            &row,
            next_index,
            config.check_valid,
            lexicon.as_deref(),
            &mut batch,
        ) {
            RowOutcome::Accepted(index) => {
                if batch.is_full() && flush(store, &mut batch)? {
                    summary.batches_committed += 1;
                }
                index + 1
            }
            RowOutcome::Skipped(SkipReason::Missing) => {
                summary.skipped_missing += 1;
                next_index
            }
            RowOutcome::Skipped(SkipReason::InvalidImage) => {
                summary.skipped_invalid += 1;
                next_index
            }
        };
    }

    let samples = next_index - 1;
    batch.push(NUM_SAMPLES_KEY.to_string(), samples.to_string());
    if flush(store, &mut batch)? {
        summary.batches_committed += 1;
    }
    summary.samples = samples;

    tracing::debug!(
        samples = summary.samples,
        skipped_missing = summary.skipped_missing,
        skipped_invalid = summary.skipped_invalid,
        batches = summary.batches_committed,
        "dataset build complete"
    );

    Ok(summary)
}

/// Process one manifest row against the next free index
///
/// On acceptance the row's entries are pushed to `batch` under `index` and
/// the caller advances to `index + 1`. A skipped row leaves both untouched.
pub fn process_row(
    row: &ManifestRow,
    index: u64,
    check_valid: bool,
    lexicon: Option<&str>,
    batch: &mut RecordBatch,
) -> RowOutcome {
    let label = row.normalized_label();
    let path = &row.image_path;

    let image = match fs::read(path) {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            tracing::debug!(line = row.line, error = %e, "image read failed");
            tracing::warn!("{} does not exist", path.display());
            return RowOutcome::Skipped(SkipReason::Missing);
        }
    };

    if check_valid && !is_valid_image(&image) {
        tracing::debug!(line = row.line, "image failed validation");
        tracing::warn!("{} is not a valid image", path.display());
        return RowOutcome::Skipped(SkipReason::InvalidImage);
    }

    batch.push(image_key(index), image);
    batch.push(label_key(index), label);
    if let Some(words) = lexicon {
        batch.push(lexicon_key(index), words);
    }
    batch.finish_record();

    RowOutcome::Accepted(index)
}

/// Space-joined first lexicon list, written for every record
fn first_lexicon(lexicon: Option<&[Vec<String>]>) -> Option<String> {
    lexicon
        .and_then(|lists| lists.first())
        .map(|words| words.join(" "))
}
