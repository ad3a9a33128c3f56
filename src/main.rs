use anyhow::{Context, Result};
use listing_monitor::api::{build_router, AppState};
use listing_monitor::scrapers::{HttpFetcher, ListingExtractor};
use listing_monitor::store::{MemoryStore, Store};
use listing_monitor::{refresh, Config, Pipeline};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,listing_monitor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("📈 Listing Monitor");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        target_domain = %config.target_domain,
        timeout_secs = config.fetch_timeout.as_secs(),
        "Configuration loaded"
    );

    let store: Arc<dyn Store> = match &config.data_file {
        Some(path) => Arc::new(
            MemoryStore::open(path)
                .await
                .with_context(|| format!("Failed to open data file {}", path.display()))?,
        ),
        None => {
            info!("DATA_FILE not set, counts are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let fetcher = HttpFetcher::with_timeout(config.fetch_timeout)?;
    let extractor =
        ListingExtractor::new(&config.markers).context("Invalid marker class configuration")?;
    let pipeline =
        Arc::new(Pipeline::new(Arc::new(fetcher), extractor).with_domain(&config.target_domain));

    if let Some(interval) = config.refresh_interval {
        refresh::spawn(store.clone(), pipeline.clone(), interval);
    }

    let app = build_router(AppState::new(store, pipeline));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
