//! Dataset key layout
//!
//! Sample keys carry a 1-based, zero-padded 9-digit index.

/// Key holding the decimal count of samples in the dataset
pub const NUM_SAMPLES_KEY: &str = "num-samples";

pub fn image_key(index: u64) -> String {
    format!("image-{:09}", index)
}

pub fn label_key(index: u64) -> String {
    format!("label-{:09}", index)
}

pub fn lexicon_key(index: u64) -> String {
    format!("lexicon-{:09}", index)
}
