use anyhow::Result;
use clap::Parser;
use governor::{Quota, RateLimiter};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wiktfetch::observer::{ConsoleObserver, ProgressObserver, TracingObserver};
use wiktfetch::{Args, Coordinator, FetcherConfig, RunError, Settings, WiktionaryClient, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // With a progress bar on screen, only warnings should reach the log.
    let default_level = if args.quiet { "info" } else { "warn" };
    let default_filter = args.log_level.clone().unwrap_or_else(|| default_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    let config = FetcherConfig::resolve(&args, settings)?;

    let words = utils::load_word_list(&config.input_path).await?;
    println!(
        "🚀 Fetching {} words from {} with {} workers",
        words.len(),
        config.input_path.display(),
        config.worker_count
    );

    let mut client = WiktionaryClient::new(WiktionaryClient::http_client()?, config.base_url.clone());
    if let Some(per_second) = config.rate_limit {
        client = client.with_rate_limiter(Arc::new(RateLimiter::direct(Quota::per_second(per_second))));
    }

    let observer: Arc<dyn ProgressObserver> = if args.quiet {
        Arc::new(TracingObserver)
    } else {
        let pb = ProgressBar::new(words.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("=>-"),
        );
        pb.set_message("Fetching");
        Arc::new(ConsoleObserver { pb })
    };

    let coordinator = Coordinator::from_config(&config, Arc::new(client), observer);

    let signal_token = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n🛑 Received Ctrl+C. Stopping workers...");
            signal_token.cancel();
        }
    });

    match coordinator.run(words).await {
        Ok(summary) => {
            println!(
                "✅ Done: {} fetched, {} already present, {} retries",
                summary.fetched, summary.skipped, summary.retries
            );
            Ok(())
        }
        Err(RunError::Cancelled { summary }) => {
            println!(
                "Stopped after {}/{} words. Run again to resume.",
                summary.completed(),
                summary.total
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
