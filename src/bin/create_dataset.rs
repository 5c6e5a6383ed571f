//! create-dataset
//!
//! Builds a key-value dataset from a tab-delimited manifest of
//! `<image_path>\t<label>` rows.

use std::path::PathBuf;

use clap::Parser;
use crnnkv::logging::{console_subscriber, env_filter};
use crnnkv::{create_dataset, Config, KvStore, LmdbStore};
use tracing_subscriber::util::SubscriberInitExt;

/// Create a key-value dataset for text-recognition training
#[derive(Parser, Debug)]
#[command(name = "create-dataset")]
#[command(about = "Create a key-value dataset for text-recognition training")]
#[command(version)]
struct Args {
    /// Path to the tab-delimited file of image paths and labels
    input: PathBuf,

    /// Directory that receives the dataset store
    #[arg(long, default_value = "./")]
    output: PathBuf,
}

fn main() {
    console_subscriber(std::io::stdout, env_filter("info")).init();

    let args = Args::parse();

    tracing::debug!("create-dataset v{}", crnnkv::VERSION);

    let config = Config::builder().output_dir(&args.output).build();

    if let Err(e) = run(&args, &config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args, config: &Config) -> crnnkv::Result<()> {
    let mut store = LmdbStore::open(config)?;
    let summary = create_dataset(&args.input, &mut store, config)?;

    tracing::debug!(
        keys = store.len(),
        samples = summary.samples,
        skipped_missing = summary.skipped_missing,
        skipped_invalid = summary.skipped_invalid,
        path = %store.path().display(),
        "store written"
    );
    store.close()?;

    println!("Created dataset with {} samples", summary.samples);
    Ok(())
}
