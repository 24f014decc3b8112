//! Health roll-ups and everything derived from a feed snapshot.
//!
//! ## Submodules
//!
//! - [`aggregate`]: Asset and subplant summaries ([`Aggregate`])
//! - [`filter`]: Subplant/asset filter resolution ([`resolve`])
//! - [`alerts`]: Alerts raised from unhealthy nodes and their lifecycle
//! - [`layout`]: Grouping of subplants into process stages
//! - [`history`]: Unhealthy-node trend per subplant for sparklines
//! - [`duration`]: Interval parsing and age formatting
//!
//! ## Data Flow
//!
//! ```text
//! TelemetryFeed (JSON records)
//!        │
//!        ├──▶ aggregate() ──▶ AssetSummary / SubplantSummary
//!        │                          │
//!        │                          ├──▶ StageLayout::group()
//!        │                          └──▶ History::record()
//!        │
//!        ├──▶ resolve() (filter options)
//!        │
//!        └──▶ alerts::simulate() ──▶ AlertBook::replace_feed()
//! ```

pub mod aggregate;
pub mod alerts;
pub mod duration;
pub mod filter;
pub mod history;
pub mod layout;

pub use aggregate::{aggregate, Aggregate, AggregateError, StatusField};
pub use alerts::{Alert, AlertBook, AlertCounts, AlertError, AlertFilter, AlertSeverity, AlertStatus};
pub use filter::{resolve, resolve_state, FilterState, Resolved, Selection};
pub use history::History;
pub use layout::{Stage, StageGroup, StageLayout, SubplantSlot};
