//! URL -> fetch -> extract, run once per request.
//!
//! Each stage short-circuits on failure; nothing is retried. A run owns no
//! state beyond the shared, read-only fetcher and extractor.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{FetchError, PipelineError};
use crate::models::{CountRecord, ListingSummary, Query};
use crate::scrapers::types::AVITO_DOMAIN;
use crate::scrapers::url::build_search_url_for;
use crate::scrapers::{ListingExtractor, PageFetcher};

pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    extractor: ListingExtractor,
    domain: String,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, extractor: ListingExtractor) -> Self {
        Self {
            fetcher,
            extractor,
            domain: AVITO_DOMAIN.to_string(),
        }
    }

    /// Point search URLs at another host (mirrors, local fixtures)
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn search_url(&self, query: &Query) -> String {
        build_search_url_for(&self.domain, &query.search_phrase, &query.region)
    }

    async fn fetch_page(&self, query: &Query) -> Result<String, FetchError> {
        let url = self.search_url(query);
        info!(
            query_id = %query.id,
            source = self.fetcher.source_name(),
            "Scraping {}",
            url
        );
        self.fetcher.fetch(&url).await.into_result()
    }

    /// Measure the current listing count for `query`
    pub async fn run_count(&self, query: &Query) -> Result<CountRecord, PipelineError> {
        let body = self.fetch_page(query).await.map_err(|e| {
            warn!(query_id = %query.id, error = %e, "Count scrape failed at fetch");
            e
        })?;

        let quantity = self.extractor.extract_count(&body).map_err(|e| {
            warn!(
                query_id = %query.id,
                error = %e,
                "Count scrape failed at extraction, check the marker classes"
            );
            e
        })?;

        info!(query_id = %query.id, quantity, "Listing count captured");
        Ok(CountRecord::build(query.id, quantity, Utc::now()))
    }

    /// Scrape the first listing cards for `query`. Nothing is stored.
    ///
    /// An empty result is a valid outcome; only a failed fetch is an error.
    pub async fn run_top_listings(
        &self,
        query: &Query,
    ) -> Result<Vec<ListingSummary>, PipelineError> {
        let body = self.fetch_page(query).await.map_err(|e| {
            warn!(query_id = %query.id, error = %e, "Top listings scrape failed at fetch");
            e
        })?;

        let listings = self.extractor.extract_top_listings(&body);
        info!(query_id = %query.id, "Extracted {} listing summaries", listings.len());
        Ok(listings)
    }
}
