use anyhow::Context;
use clap::Parser;
use sources_scraper::{Args, BatchScraper, ExplorerFetcher, OutputDir, Settings};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings =
        Settings::new(Some(args.config_path.as_path())).context("failed to read config")?;

    let listing = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .context(format!("reading listing {}", path.display()))?,
        None => {
            let mut listing = String::new();
            tokio::io::stdin()
                .read_to_string(&mut listing)
                .await
                .context("reading listing from stdin")?;
            listing
        }
    };

    let fetcher = ExplorerFetcher::new(&settings.explorer).context("explorer initialization")?;
    let output = OutputDir::prepare(&settings.output)?;
    let scraper = BatchScraper::new(fetcher, output, settings.listing.min_line_length);

    let report = scraper.run(&listing).await;
    for failure in &report.failures {
        log::info!(
            "line {} ({}): {}",
            failure.line,
            failure.name.as_deref().unwrap_or("-"),
            failure.reason
        );
    }
    Ok(())
}
