//! Flat telemetry records as delivered by the feed.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{HealthStatus, ParseStatusError};

/// A complete feed snapshot: every (asset, node) row currently reported.
///
/// No ordering guarantee is assumed. Consumers that present lists derive
/// their order from first appearance in this vector.
pub type TelemetryFeed = Vec<TelemetryRecord>;

/// One row per (asset, node) pairing observed by the feed.
///
/// Statuses are kept as the raw strings the feed sent so that rejecting an
/// unrecognised value is an explicit step for the consumer rather than a
/// decode failure. Use [`node_health`](Self::node_health) and
/// [`asset_health`](Self::asset_health) to read them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryRecord {
    /// Facility the asset belongs to.
    pub subplant: String,
    /// Asset identifier. Treated as globally unique.
    pub asset_id: String,
    /// Sensor/node identifier, unique within its asset.
    pub node_id: String,
    /// Status last reported for the asset as a whole. Advisory only.
    pub asset_status: String,
    /// Status last reported for this node.
    pub node_status: String,
}

impl TelemetryRecord {
    /// Create a record from typed statuses.
    pub fn new(
        subplant: impl Into<String>,
        asset_id: impl Into<String>,
        node_id: impl Into<String>,
        asset_status: HealthStatus,
        node_status: HealthStatus,
    ) -> Self {
        Self {
            subplant: subplant.into(),
            asset_id: asset_id.into(),
            node_id: node_id.into(),
            asset_status: String::from(asset_status.as_str()),
            node_status: String::from(node_status.as_str()),
        }
    }

    /// Parse the node's reported status.
    pub fn node_health(&self) -> Result<HealthStatus, ParseStatusError> {
        self.node_status.parse()
    }

    /// Parse the asset's reported status.
    pub fn asset_health(&self) -> Result<HealthStatus, ParseStatusError> {
        self.asset_status.parse()
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builder for a [`TelemetryFeed`].
///
/// Records are emitted in the order subplants, assets and nodes are added.
#[derive(Debug, Default)]
pub struct FeedBuilder {
    records: Vec<TelemetryRecord>,
}

impl FeedBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the assets of one subplant.
    pub fn subplant<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(SubplantBuilder) -> SubplantBuilder,
    {
        let built = f(SubplantBuilder::new(name.into()));
        self.records.extend(built.records);
        self
    }

    /// Add a single pre-built record.
    pub fn record(mut self, record: TelemetryRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Build the feed.
    pub fn build(self) -> TelemetryFeed {
        self.records
    }
}

/// Builder for the assets of one subplant.
#[derive(Debug)]
pub struct SubplantBuilder {
    name: String,
    records: Vec<TelemetryRecord>,
}

impl SubplantBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            records: Vec::new(),
        }
    }

    /// Add an asset and its nodes.
    ///
    /// The asset's reported status defaults to the worst of its nodes,
    /// which is what a well-behaved feed sends.
    pub fn asset<F>(mut self, asset_id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(AssetBuilder) -> AssetBuilder,
    {
        let asset = f(AssetBuilder::default());
        let asset_id = asset_id.into();
        let reported = asset
            .reported
            .or_else(|| asset.nodes.iter().map(|(_, s)| *s).max())
            .unwrap_or_default();

        for (node_id, status) in asset.nodes {
            self.records.push(TelemetryRecord::new(
                self.name.clone(),
                asset_id.clone(),
                node_id,
                reported,
                status,
            ));
        }
        self
    }
}

/// Builder for the nodes of one asset.
#[derive(Debug, Default)]
pub struct AssetBuilder {
    reported: Option<HealthStatus>,
    nodes: Vec<(String, HealthStatus)>,
}

impl AssetBuilder {
    /// Override the status the feed reports for the asset itself.
    pub fn reported(mut self, status: HealthStatus) -> Self {
        self.reported = Some(status);
        self
    }

    /// Add a node with its status.
    pub fn node(mut self, node_id: impl Into<String>, status: HealthStatus) -> Self {
        self.nodes.push((node_id.into(), status));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_insertion_order() {
        let feed = FeedBuilder::new()
            .subplant("A", |s| {
                s.asset("X1", |a| {
                    a.node("N1", HealthStatus::Critical).node("N2", HealthStatus::Healthy)
                })
            })
            .subplant("B", |s| s.asset("Y1", |a| a.node("M1", HealthStatus::Offline)))
            .build();

        let ids: Vec<&str> = feed.iter().map(|r| r.node_id.as_str()).collect();
        assert_eq!(ids, ["N1", "N2", "M1"]);
        assert_eq!(feed[2].subplant, "B");
        assert_eq!(feed[0].asset_status, "Critical");
    }

    #[test]
    fn test_reported_override() {
        let feed = FeedBuilder::new()
            .subplant("A", |s| {
                s.asset("X1", |a| a.reported(HealthStatus::Healthy).node("N1", HealthStatus::Warning))
            })
            .build();

        assert_eq!(feed[0].asset_health(), Ok(HealthStatus::Healthy));
        assert_eq!(feed[0].node_health(), Ok(HealthStatus::Warning));
    }

    #[test]
    fn test_unrecognised_node_status() {
        let mut record = TelemetryRecord::new("A", "X1", "N1", HealthStatus::Healthy, HealthStatus::Healthy);
        record.node_status = String::from("Unknown");
        assert_eq!(record.node_health().unwrap_err().value, "Unknown");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_feed() {
        let json = r#"[
            {"subplant":"A","asset_id":"X1","node_id":"N1","asset_status":"Healthy","node_status":"Critical"},
            {"subplant":"A","asset_id":"X1","node_id":"N2","asset_status":"Healthy","node_status":"Unknown"}
        ]"#;

        let feed: TelemetryFeed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].node_health(), Ok(HealthStatus::Critical));
        // unknown values survive decoding and are only rejected on use
        assert!(feed[1].node_health().is_err());
    }
}
