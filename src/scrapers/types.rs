use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Marketplace the search URLs point at
pub const AVITO_DOMAIN: &str = "https://www.avito.ru";

/// Maximum number of listing cards returned by top-listings extraction
pub const TOP_LISTINGS_LIMIT: usize = 5;

/// CSS class names the extractor relies on.
///
/// These are generated by the site's build and change without notice,
/// so every one of them can be overridden from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Markers {
    /// Element holding the total listing count
    pub count: String,
    /// Listing card container
    pub card: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub place: String,
    pub posted_at: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            count: "page-title-count-wQ7pG".to_string(),
            card: "iva-item-content-rejJg".to_string(),
            title: "iva-item-titleStep-pdebR".to_string(),
            description: "iva-item-descriptionStep-C0ty1".to_string(),
            price: "iva-item-priceStep-uq2CQ".to_string(),
            place: "geo-root-zPwRk".to_string(),
            posted_at: "iva-item-dateInfoStep-_acjp".to_string(),
        }
    }
}

/// Result of one outbound page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success { body: String },
    RemoteClientError { status: u16 },
    RemoteServerError { status: u16 },
    TransportError { message: String },
}

impl FetchOutcome {
    /// Failure outcome for a 4xx/5xx status; `None` means read the body
    pub fn failure_for_status(status: u16) -> Option<Self> {
        match status {
            500..=599 => Some(Self::RemoteServerError { status }),
            400..=499 => Some(Self::RemoteClientError { status }),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn into_result(self) -> Result<String, FetchError> {
        match self {
            Self::Success { body } => Ok(body),
            Self::RemoteClientError { status } => Err(FetchError::RemoteClient { status }),
            Self::RemoteServerError { status } => Err(FetchError::RemoteServer { status }),
            Self::TransportError { message } => Err(FetchError::Transport(message)),
        }
    }
}
