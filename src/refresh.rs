//! Periodic re-measurement of every stored query.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::pipeline::Pipeline;
use crate::store::{Store, StoreError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStats {
    pub succeeded: usize,
    pub failed: usize,
}

impl fmt::Display for RefreshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} captured, {} failed", self.succeeded, self.failed)
    }
}

/// Run the count pipeline once for every stored query, one at a time.
///
/// A failed scrape only bumps `failed`; store errors abort the cycle.
pub async fn run_cycle(store: &dyn Store, pipeline: &Pipeline) -> Result<RefreshStats, StoreError> {
    let queries = store.list_queries().await?;
    let mut stats = RefreshStats::default();

    for query in &queries {
        match pipeline.run_count(query).await {
            Ok(record) => {
                store.insert_count(record).await?;
                stats.succeeded += 1;
            }
            // the pipeline already logged the failing stage
            Err(_) => stats.failed += 1,
        }
    }

    Ok(stats)
}

/// Start a background loop running [`run_cycle`] every `interval`.
///
/// The first cycle starts after one full interval.
pub fn spawn(store: Arc<dyn Store>, pipeline: Arc<Pipeline>, interval: Duration) -> JoinHandle<()> {
    info!(
        interval_minutes = interval.as_secs() / 60,
        "Starting periodic refresh loop"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match run_cycle(store.as_ref(), &pipeline).await {
                Ok(stats) => info!("Refresh cycle complete: {}", stats),
                Err(e) => error!(error = %e, "Refresh cycle aborted"),
            }
        }
    })
}
