//! # plantwatch
//!
//! A terminal dashboard and library for watching the health of an
//! industrial plant as a subplant → asset → sensor-node hierarchy.
//!
//! Telemetry arrives as a flat list of records, one per node. Each refresh
//! rolls those records up into per-asset and per-subplant summaries, derives
//! alerts from unhealthy nodes, and renders the result grouped by process
//! stage.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(roll-up) │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── File | Stream | Channel | Mock | HTTP poller│
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: application state, filters, alert actions and navigation
//! - **[`source`]**: the [`DataSource`] trait and its implementations
//! - **[`data`]**: the health aggregator, filter resolver, alert book,
//!   stage layout and history
//! - **[`ui`]**: ratatui rendering for the subplant, asset and alert views
//! - **[`settings`]**: layered TOML and environment configuration
//! - **[`export`]**: one-shot JSON reports
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a JSON feed file
//! plantwatch --file feed.json
//!
//! # Poll a telemetry API every 10 seconds
//! plantwatch --endpoint https://telemetry.example.com/stage --refresh 10s
//!
//! # Random data for demos
//! plantwatch --mock --seed 7
//! ```
//!
//! ### Aggregating a feed
//!
//! ```
//! use plantwatch::types::{FeedBuilder, HealthStatus};
//!
//! let feed = FeedBuilder::new()
//!     .subplant("Bravo Bay", |s| {
//!         s.asset("Press-01", |a| {
//!             a.node("N1", HealthStatus::Healthy).node("N2", HealthStatus::Critical)
//!         })
//!     })
//!     .build();
//!
//! let result = plantwatch::aggregate(&feed).unwrap();
//! assert_eq!(result.assets[0].status, HealthStatus::Critical);
//! assert_eq!(result.subplants[0].critical_assets, 1);
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use plantwatch::{App, FileSource, StageLayout};
//!
//! let source = Box::new(FileSource::new("feed.json"));
//! let app = App::new(source, StageLayout::default());
//! ```
//!
//! ### With a channel source
//!
//! ```
//! use plantwatch::{App, ChannelSource, StageLayout};
//!
//! let (tx, source) = ChannelSource::create("bridge");
//! let mut app = App::new(Box::new(source), StageLayout::default());
//! tx.send(Vec::new()).unwrap();
//! assert!(app.reload_data());
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod export;
pub mod logging;
pub mod settings;
pub mod source;
pub mod ui;

/// Record, status and summary types shared with the adapters.
pub use plantwatch_types as types;

pub use app::{App, View};
pub use data::{
    aggregate, resolve, Aggregate, AggregateError, Alert, AlertBook, AlertSeverity, AlertStatus,
    FilterState, Selection, StageLayout,
};
pub use export::Report;
pub use settings::Settings;
pub use source::{ChannelSource, DataSource, FileSource, MockSource, StreamSource};
