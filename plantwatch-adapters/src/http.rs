//! Telemetry adapter for an HTTP JSON endpoint.
//!
//! The endpoint is treated as opaque: one GET returns the whole feed. Each
//! request carries a `t=<unix ms>` query parameter and `Cache-Control:
//! no-cache` so intermediate caches never serve a stale snapshot.
//!
//! ## Example
//!
//! ```rust,no_run
//! use plantwatch_adapters::http::TelemetryApi;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = TelemetryApi::builder()
//!         .endpoint("https://telemetry.example.com/stage")
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     for record in api.fetch().await? {
//!         println!("{} / {}: {}", record.asset_id, record.node_id, record.node_status);
//!     }
//!     Ok(())
//! }
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Url};
use tracing::debug;

use plantwatch_types::TelemetryFeed;

use crate::envelope::decode_feed;
use crate::AdapterError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for an external telemetry feed endpoint.
#[derive(Debug, Clone)]
pub struct TelemetryApi {
    client: Client,
    endpoint: Url,
}

impl TelemetryApi {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> TelemetryApiBuilder {
        TelemetryApiBuilder::default()
    }

    /// The endpoint being polled.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Fetch the current feed snapshot.
    pub async fn fetch(&self) -> Result<TelemetryFeed, AdapterError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("t", cache_buster())])
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        let feed = decode_feed(&bytes)?;
        debug!(records = feed.len(), endpoint = %self.endpoint, "fetched telemetry feed");
        Ok(feed)
    }
}

/// Builder for [`TelemetryApi`].
#[derive(Debug, Default)]
pub struct TelemetryApiBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl TelemetryApiBuilder {
    /// Set the feed endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<TelemetryApi, AdapterError> {
        let raw = self
            .endpoint
            .ok_or_else(|| AdapterError::InvalidEndpoint("no endpoint configured".to_string()))?;
        let endpoint =
            Url::parse(&raw).map_err(|e| AdapterError::InvalidEndpoint(format!("{}: {}", raw, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AdapterError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(TelemetryApi { client, endpoint })
    }
}

fn cache_buster() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_endpoint() {
        let err = TelemetryApi::builder().build().unwrap_err();
        assert!(matches!(err, AdapterError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_builder_rejects_bad_urls() {
        assert!(TelemetryApi::builder().endpoint("not a url").build().is_err());
        assert!(TelemetryApi::builder()
            .endpoint("ftp://telemetry.local/feed")
            .build()
            .is_err());
    }

    #[test]
    fn test_builder_custom() {
        let api = TelemetryApi::builder()
            .endpoint("https://telemetry.local/stage")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        assert_eq!(api.endpoint(), "https://telemetry.local/stage");
    }

    #[test]
    fn test_cache_buster_is_numeric() {
        assert!(cache_buster().parse::<u128>().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_endpoint() {
        // Port 9 (discard) on localhost is almost never listening
        let api = TelemetryApi::builder()
            .endpoint("http://127.0.0.1:9/feed")
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();

        let err = api.fetch().await.unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Connection(_) | AdapterError::Timeout | AdapterError::Http(_)
        ));
    }
}
