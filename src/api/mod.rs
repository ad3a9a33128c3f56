//! HTTP API.
//!
//! Route map:
//!   POST /api/add                      register a query, capture its count
//!   GET  /api/queries                  all stored queries
//!   GET  /api/counters?query_id=       stored counts
//!   GET  /api/stat/:query_id/:hours    counts from the last `hours`
//!   GET  /api/top/:query_id            live top listings, not stored
//!   GET  /health

mod error;
mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::pipeline::Pipeline;
use crate::store::Store;

pub use error::ApiError;

/// Handles built once at startup and shared by every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, pipeline: Arc<Pipeline>) -> Self {
        Self { store, pipeline }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/add", post(handlers::add_query))
        .route("/queries", get(handlers::list_queries))
        .route("/counters", get(handlers::list_counters))
        .route("/stat/:query_id/:hours", get(handlers::stat_counters))
        .route("/top/:query_id", get(handlers::top_listings));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
