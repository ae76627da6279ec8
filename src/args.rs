use clap::Parser;
use std::path::PathBuf;

/// Bulk-fetches Wiktionary entries for a word list.
///
/// The list is split across a fixed pool of workers. Each word is stored as
/// its own JSON record, words that already have a record are skipped, and
/// rate-limited requests are retried until they succeed.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// File with one word per line.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory that receives one `<word>.json` record per word.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of concurrent workers.
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Wait before retrying a failed or empty fetch, in milliseconds.
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Language code of the section to keep (e.g. "nl", "en").
    #[arg(short, long)]
    pub language: Option<String>,

    /// Base URL of the definition endpoint.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Maximum requests per second across all workers.
    #[arg(long)]
    pub rate_limit: Option<u32>,

    /// Settings file to read instead of `wiktfetch.toml`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log status lines instead of drawing a progress bar.
    #[arg(short, long)]
    pub quiet: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long)]
    pub log_level: Option<String>,
}
