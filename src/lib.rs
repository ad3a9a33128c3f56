//! Tracks how many classified-ad listings a marketplace shows for a
//! (search phrase, region) pair over time.
//!
//! ```text
//! POST /api/add ─► Store::insert_query ─► Pipeline::run_count ─► Store::insert_count
//!                                            │
//!                          build_search_url ─► PageFetcher ─► ListingExtractor
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod refresh;
pub mod scrapers;
pub mod store;

pub use config::Config;
pub use error::{ExtractError, FetchError, PipelineError};
pub use pipeline::Pipeline;
