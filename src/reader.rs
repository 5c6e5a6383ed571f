//! Dataset Reader
//!
//! Reads samples back out of a built dataset.

use crate::error::{DatasetError, Result};
use crate::keys::{image_key, label_key, lexicon_key, NUM_SAMPLES_KEY};
use crate::store::KvStore;

/// One stored sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub index: u64,
    pub image: Vec<u8>,
    pub label: String,
    pub lexicon: Option<String>,
}

/// Read-side view over a dataset store
pub struct DatasetReader<S: KvStore> {
    store: S,
}

impl<S: KvStore> DatasetReader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Parsed value of the `num-samples` entry
    pub fn num_samples(&mut self) -> Result<u64> {
        let raw = self
            .store
            .get(NUM_SAMPLES_KEY.as_bytes())?
            .ok_or_else(|| DatasetError::MissingSample(NUM_SAMPLES_KEY.to_string()))?;

        let text = String::from_utf8(raw).map_err(|e| {
            DatasetError::Corruption(format!("{} is not UTF-8: {}", NUM_SAMPLES_KEY, e))
        })?;
        text.trim().parse().map_err(|e| {
            DatasetError::Corruption(format!("{} = {:?} is not a count: {}", NUM_SAMPLES_KEY, text, e))
        })
    }

    /// Get the sample at a 1-based index
    ///
    /// Returns `Ok(None)` if either the image or the label is absent.
    pub fn sample(&mut self, index: u64) -> Result<Option<Sample>> {
        let image = match self.store.get(image_key(index).as_bytes())? {
            Some(image) => image,
            None => return Ok(None),
        };
        let label = match self.store.get(label_key(index).as_bytes())? {
            Some(label) => decode_text(&label_key(index), label)?,
            None => return Ok(None),
        };
        let lexicon = match self.store.get(lexicon_key(index).as_bytes())? {
            Some(lexicon) => Some(decode_text(&lexicon_key(index), lexicon)?),
            None => None,
        };

        Ok(Some(Sample {
            index,
            image,
            label,
            lexicon,
        }))
    }

    /// Check that every index up to `num-samples` has an image and a label
    ///
    /// Returns the sample count on success.
    pub fn verify(&mut self) -> Result<u64> {
        let count = self.num_samples()?;
        for index in 1..=count {
            for key in [image_key(index), label_key(index)] {
                if self.store.get(key.as_bytes())?.is_none() {
                    return Err(DatasetError::MissingSample(key));
                }
            }
        }
        Ok(count)
    }

    /// Give back the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }
}

fn decode_text(key: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| DatasetError::Corruption(format!("{} is not UTF-8: {}", key, e)))
}
