//! inspect-dataset
//!
//! Read-only inspection of a dataset store. Works on both the LMDB layout
//! (`data.mdb`) and the frame log (`data.crkv`); neither is ever written.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crnnkv::logging::{console_subscriber, env_filter};
use crnnkv::{DatasetError, DatasetReader, KvStore, LmdbStore, LogStore};
use tracing_subscriber::util::SubscriberInitExt;

/// Inspect a dataset store
#[derive(Parser, Debug)]
#[command(name = "inspect-dataset")]
#[command(about = "Inspect a key-value dataset for text-recognition training")]
#[command(version)]
struct Args {
    /// Directory holding the dataset store
    dataset: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the number of samples
    Count,

    /// Print the label (and lexicon) of one sample
    Sample {
        /// 1-based sample index
        index: u64,
    },

    /// Check that every sample has an image and a label
    Verify,
}

fn main() {
    console_subscriber(std::io::stderr, env_filter("warn")).init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> crnnkv::Result<()> {
    if LmdbStore::data_path(&args.dataset).is_file() {
        let store = LmdbStore::open_read_only(&args.dataset)?;
        report(DatasetReader::new(store), &args.command)
    } else if LogStore::data_path(&args.dataset).is_file() {
        let store = LogStore::open_read_only(&args.dataset)?;
        report(DatasetReader::new(store), &args.command)
    } else {
        Err(DatasetError::Config(format!(
            "{} does not contain a dataset",
            args.dataset.display()
        )))
    }
}

fn report<S: KvStore>(mut reader: DatasetReader<S>, command: &Commands) -> crnnkv::Result<()> {
    match *command {
        Commands::Count => {
            println!("{}", reader.num_samples()?);
        }
        Commands::Sample { index } => match reader.sample(index)? {
            Some(sample) => {
                println!("index:   {}", sample.index);
                println!("label:   {}", sample.label);
                println!("bytes:   {}", sample.image.len());
                if let Some(lexicon) = sample.lexicon {
                    println!("lexicon: {}", lexicon);
                }
            }
            None => {
                return Err(DatasetError::MissingSample(format!("sample {}", index)));
            }
        },
        Commands::Verify => {
            let count = reader.verify()?;
            println!("OK: {} samples", count);
        }
    }

    Ok(())
}
