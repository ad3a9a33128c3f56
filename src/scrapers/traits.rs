use async_trait::async_trait;

use crate::scrapers::types::FetchOutcome;

/// Outbound page fetch, the only blocking step of a pipeline run.
///
/// Implementations never panic or return early with an error: every
/// failure is folded into a [`FetchOutcome`] variant.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue a single GET for `url`
    async fn fetch(&self, url: &str) -> FetchOutcome;

    /// Name used in logs
    fn source_name(&self) -> &'static str;
}
