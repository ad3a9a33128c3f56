use thiserror::Error;

/// Classified failure of a single page fetch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("remote client error: HTTP {status}")]
    RemoteClient { status: u16 },

    #[error("remote server error: HTTP {status}")]
    RemoteServer { status: u16 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("marker element not found: .{marker}")]
    MarkerNotFound { marker: String },

    #[error("count text is not a number: {text:?}")]
    MalformedNumber { text: String },

    #[error("invalid marker class {marker:?}: {reason}")]
    InvalidMarker { marker: String, reason: String },
}

/// Failure of one URL -> fetch -> extract run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}
