//! # plantwatch-types
//!
//! Core types shared by the plantwatch feed sources, the aggregation core,
//! and anything else that produces or consumes plant telemetry.
//!
//! A feed is a flat list of [`TelemetryRecord`]s, one per (asset, node)
//! pairing. Summaries ([`AssetSummary`], [`SubplantSummary`]) are derived
//! from a feed and never stored.
//!
//! ## Features
//!
//! - `std` (default): Standard library support (`std::error::Error` impls)
//! - `serde`: JSON serialization via serde, using the feed's wire names
//!
//! ## Example
//!
//! ```rust
//! use plantwatch_types::{FeedBuilder, HealthStatus};
//!
//! let feed = FeedBuilder::new()
//!     .subplant("Bravo Bay", |s| {
//!         s.asset("Press-01", |a| {
//!             a.node("N1", HealthStatus::Healthy)
//!              .node("N2", HealthStatus::Critical)
//!         })
//!     })
//!     .build();
//!
//! assert_eq!(feed.len(), 2);
//! assert_eq!(feed[1].node_health(), Ok(HealthStatus::Critical));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod record;
mod status;
mod summary;

pub use record::*;
pub use status::*;
pub use summary::*;
