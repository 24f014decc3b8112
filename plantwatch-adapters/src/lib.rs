//! # plantwatch-adapters
//!
//! Adapters that fetch a plant telemetry feed from an external system and
//! return it as a [`TelemetryFeed`].
//!
//! ## Supported Systems
//!
//! - **HTTP JSON API** (`http` feature) - Polls an endpoint that returns the
//!   feed either as a bare array or wrapped in a gateway envelope
//!   (`{"statusCode": 200, "body": "[...]"}`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "http")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use plantwatch_adapters::http::TelemetryApi;
//!
//! let api = TelemetryApi::builder()
//!     .endpoint("https://telemetry.example.com/stage")
//!     .build()?;
//!
//! let feed = api.fetch().await?;
//! println!("Fetched {} records", feed.len());
//! # Ok(())
//! # }
//! ```

pub mod envelope;
pub mod error;

#[cfg(feature = "http")]
pub mod http;

pub use error::AdapterError;

// Re-export types for convenience
pub use plantwatch_types::{TelemetryFeed, TelemetryRecord};
