use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use wiktfetch::observer::ConsoleObserver;
use wiktfetch::retry::{RetryPolicy, RetryingFetcher};
use wiktfetch::store::FileRecordStore;
use wiktfetch::{Coordinator, WiktionaryClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration
    let words: Vec<String> = ["echt", "kat", "klaar"].iter().map(|w| w.to_string()).collect();
    let workers = 2;
    let output_dir = "./demo-output";

    println!("Fetching {} Dutch words into {}", words.len(), output_dir);

    // 1. Client pointed at the public definition endpoint
    let base = url::Url::parse(wiktfetch::client::DEFAULT_BASE_URL)?;
    let client = WiktionaryClient::new(WiktionaryClient::http_client()?, base);

    // 2. Retry throttled or empty responses every 2s, forever
    let fetcher = RetryingFetcher::new(Arc::new(client), "nl", RetryPolicy::forever(Duration::from_secs(2)));

    // 3. Progress bar for the whole list
    let pb = ProgressBar::new(words.len() as u64);
    pb.set_style(ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")?.progress_chars("=>-"));
    let observer = Arc::new(ConsoleObserver { pb });

    // 4. Run; records land in ./demo-output/<word>.json
    let store = Arc::new(FileRecordStore::new(output_dir));
    let summary = Coordinator::new(workers, fetcher, store, observer).run(words).await?;

    println!(
        "Fetched {} words ({} already on disk, {} retries)",
        summary.fetched, summary.skipped, summary.retries
    );
    Ok(())
}
