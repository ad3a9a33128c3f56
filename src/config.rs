use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::scrapers::types::{Markers, AVITO_DOMAIN};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub target_domain: String,
    pub fetch_timeout: Duration,
    /// JSON snapshot of the store; volatile store when unset
    pub data_file: Option<PathBuf>,
    pub refresh_interval: Option<Duration>,
    pub markers: Markers,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            target_domain: AVITO_DOMAIN.to_string(),
            fetch_timeout: Duration::from_secs(30),
            data_file: None,
            refresh_interval: None,
            markers: Markers::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let fetch_timeout_secs: u64 = parse_var(&lookup, "FETCH_TIMEOUT_SECS")?.unwrap_or(30);
        if fetch_timeout_secs == 0 {
            bail!("FETCH_TIMEOUT_SECS must be greater than zero");
        }

        let refresh_interval = match parse_var::<u64>(&lookup, "REFRESH_INTERVAL_MINUTES")? {
            Some(0) => bail!("REFRESH_INTERVAL_MINUTES must be greater than zero"),
            Some(minutes) => match minutes.checked_mul(60) {
                Some(secs) => Some(Duration::from_secs(secs)),
                None => bail!("REFRESH_INTERVAL_MINUTES is too large, got {}", minutes),
            },
            None => None,
        };

        let marker = |key: &str, default: String| lookup(key).unwrap_or(default);
        let markers = Markers {
            count: marker("MARKER_COUNT", defaults.markers.count),
            card: marker("MARKER_CARD", defaults.markers.card),
            title: marker("MARKER_TITLE", defaults.markers.title),
            description: marker("MARKER_DESCRIPTION", defaults.markers.description),
            price: marker("MARKER_PRICE", defaults.markers.price),
            place: marker("MARKER_PLACE", defaults.markers.place),
            posted_at: marker("MARKER_POSTED_AT", defaults.markers.posted_at),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            target_domain: lookup("TARGET_DOMAIN").unwrap_or(defaults.target_domain),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            data_file: lookup("DATA_FILE").map(PathBuf::from),
            refresh_interval,
            markers,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{} must be a valid number, got {:?}", key, raw))
        })
        .transpose()
}
