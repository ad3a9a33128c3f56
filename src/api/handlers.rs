use axum::{
    extract::{rejection::JsonRejection, Path, Query as QueryParams, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;
use crate::models::{CountView, ListingSummary, NewQuery, Query};
use crate::store::CountFilter;

#[derive(Debug, Deserialize)]
pub struct CountersParams {
    query_id: Option<Uuid>,
}

pub async fn health() -> &'static str {
    "ok"
}

/// Register a query (or reuse the stored one with the same phrase) and
/// capture its first count.
///
/// The query stays stored even when the scrape fails.
pub async fn add_query(
    State(state): State<AppState>,
    payload: Result<Json<NewQuery>, JsonRejection>,
) -> Result<(StatusCode, Json<Query>), ApiError> {
    let Json(body) = payload?;
    if body.search_phrase.trim().is_empty() {
        return Err(ApiError::BadRequest("search_phrase must not be empty".to_string()));
    }
    if body.region.trim().is_empty() {
        return Err(ApiError::BadRequest("region must not be empty".to_string()));
    }

    let query = state.store.insert_query(body).await?;
    let record = state.pipeline.run_count(&query).await?;
    state.store.insert_count(record).await?;

    info!(query_id = %query.id, "Query added");
    Ok((StatusCode::CREATED, Json(query)))
}

pub async fn list_queries(State(state): State<AppState>) -> Result<Json<Vec<Query>>, ApiError> {
    Ok(Json(state.store.list_queries().await?))
}

pub async fn list_counters(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<CountersParams>,
) -> Result<Json<Vec<CountView>>, ApiError> {
    let filter = CountFilter {
        query_id: params.query_id,
        captured_after: None,
    };
    let records = state.store.find_counts(&filter).await?;
    Ok(Json(records.iter().map(CountView::from).collect()))
}

/// Counts of one query captured within the last `hours`
pub async fn stat_counters(
    State(state): State<AppState>,
    Path((query_id, hours)): Path<(Uuid, u32)>,
) -> Result<Json<Vec<CountView>>, ApiError> {
    let mut filter = CountFilter::for_query(query_id);
    // a window reaching past the representable range means "everything"
    if let Some(since) = Utc::now().checked_sub_signed(Duration::hours(i64::from(hours))) {
        filter = filter.captured_after(since);
    }

    let records = state.store.find_counts(&filter).await?;
    Ok(Json(records.iter().map(CountView::from).collect()))
}

pub async fn top_listings(
    State(state): State<AppState>,
    Path(query_id): Path<Uuid>,
) -> Result<Json<Vec<ListingSummary>>, ApiError> {
    let query = state
        .store
        .find_query_by_id(query_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Query with id {} not found.", query_id)))?;

    let listings = state.pipeline.run_top_listings(&query).await?;
    Ok(Json(listings))
}
