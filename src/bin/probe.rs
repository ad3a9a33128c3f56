//! One-off scrape against the live site, without touching storage.
//!
//! Useful to check whether the marker classes still match the markup:
//!
//! ```text
//! probe "iPhone 14 Pro Max" --region Москва --top
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use listing_monitor::models::NewQuery;
use listing_monitor::scrapers::{HttpFetcher, ListingExtractor};
use listing_monitor::{Config, Pipeline};
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "probe", about = "Scrape one search page and print what was extracted")]
struct Args {
    /// Search phrase, e.g. "iPhone 14 Pro Max"
    search_phrase: String,

    /// Region name in Cyrillic or Latin script
    #[arg(short, long)]
    region: String,

    /// Print the top listings instead of the total count
    #[arg(long)]
    top: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let fetcher = HttpFetcher::with_timeout(config.fetch_timeout)?;
    let extractor =
        ListingExtractor::new(&config.markers).context("Invalid marker class configuration")?;
    let pipeline = Pipeline::new(Arc::new(fetcher), extractor).with_domain(&config.target_domain);

    let query = NewQuery::new(args.search_phrase, args.region).into_query();
    info!("URL: {}", pipeline.search_url(&query));

    if args.top {
        let listings = pipeline.run_top_listings(&query).await?;
        info!("✅ Extracted {} listings\n", listings.len());

        for (i, listing) in listings.iter().enumerate() {
            println!("{}. {} ({})", i + 1, listing.title, listing.price);
            println!("   {}", listing.place);
            println!("   {}", listing.posted_at);
            println!("   {}", listing.description);
            println!();
        }
    } else {
        let record = pipeline.run_count(&query).await?;
        println!("{} listings", record.quantity);
    }

    Ok(())
}
