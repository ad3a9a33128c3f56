pub mod extract;
pub mod http;
pub mod traits;
pub mod types;
pub mod url;

pub use extract::ListingExtractor;
pub use http::HttpFetcher;
pub use traits::PageFetcher;
pub use types::{FetchOutcome, Markers};
pub use url::build_search_url;
