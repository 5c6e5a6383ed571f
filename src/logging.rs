//! Console Logging
//!
//! Subscriber used by the command-line tools. Events print as their bare
//! message, one per line, so per-row skip notices read
//! `<path> does not exist`. Structured fields on debug events still show
//! when `RUST_LOG` enables them.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Build a plain-text subscriber writing to `make_writer`
pub fn console_subscriber<W>(
    make_writer: W,
    filter: EnvFilter,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(make_writer)
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_ansi(false)
        .finish()
}

/// Filter from `RUST_LOG`, falling back to `default`
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
