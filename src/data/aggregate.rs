//! Asset and subplant health roll-ups.
//!
//! [`aggregate`] turns a flat feed into one [`AssetSummary`] per asset and
//! one [`SubplantSummary`] per subplant. An asset's status is always
//! derived from its nodes; the feed's own `asset_status` is validated but
//! never used for the roll-up.

use std::collections::HashMap;

use thiserror::Error;

use plantwatch_types::{AssetSummary, HealthStatus, SubplantSummary, TelemetryRecord};

/// Which status field of a record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    Asset,
    Node,
}

impl std::fmt::Display for StatusField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusField::Asset => f.write_str("asset_status"),
            StatusField::Node => f.write_str("node_status"),
        }
    }
}

/// Errors produced while aggregating a feed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// A record carries a status outside the four recognised values.
    #[error("invalid {field} {value:?} for asset '{asset_id}' node '{node_id}'")]
    InvalidStatusValue {
        asset_id: String,
        node_id: String,
        field: StatusField,
        value: String,
    },
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregate {
    /// One entry per distinct asset_id, in first-seen order.
    pub assets: Vec<AssetSummary>,
    /// One entry per distinct subplant, in first-seen order.
    pub subplants: Vec<SubplantSummary>,
}

/// Label used for the fleet-wide roll-up.
pub const ALL_SUBPLANTS: &str = "all";

/// Aggregate a feed snapshot.
///
/// Every record is validated before anything is computed, so either the
/// full summary set is returned or an error is.
pub fn aggregate(records: &[TelemetryRecord]) -> Result<Aggregate, AggregateError> {
    let node_statuses = validate(records)?;

    // asset_id -> index into `assets`
    let mut asset_index: HashMap<&str, usize> = HashMap::new();
    let mut assets: Vec<AssetSummary> = Vec::new();

    for (record, &status) in records.iter().zip(&node_statuses) {
        match asset_index.get(record.asset_id.as_str()) {
            Some(&idx) => {
                let asset = &mut assets[idx];
                asset.status = asset.status.max(status);
                if !asset.node_ids.contains(&record.node_id) {
                    asset.node_ids.push(record.node_id.clone());
                }
            }
            None => {
                asset_index.insert(&record.asset_id, assets.len());
                assets.push(AssetSummary {
                    asset_id: record.asset_id.clone(),
                    subplant: record.subplant.clone(),
                    status,
                    node_ids: vec![record.node_id.clone()],
                });
            }
        }
    }

    let mut subplant_index: HashMap<&str, usize> = HashMap::new();
    let mut subplants: Vec<SubplantSummary> = Vec::new();
    // (subplant idx, asset idx) pairs already counted
    let mut counted: std::collections::HashSet<(usize, usize)> = std::collections::HashSet::new();

    for (record, &status) in records.iter().zip(&node_statuses) {
        let sp = *subplant_index.entry(record.subplant.as_str()).or_insert_with(|| {
            subplants.push(SubplantSummary::empty(record.subplant.clone()));
            subplants.len() - 1
        });
        let summary = &mut subplants[sp];
        summary.add_node(status);

        let asset = asset_index[record.asset_id.as_str()];
        if counted.insert((sp, asset)) {
            summary.add_asset(assets[asset].status);
        }
    }

    Ok(Aggregate { assets, subplants })
}

/// Parse every status in the feed, failing on the first bad one.
pub(crate) fn validate(records: &[TelemetryRecord]) -> Result<Vec<HealthStatus>, AggregateError> {
    records
        .iter()
        .map(|record| {
            record.asset_health().map_err(|e| invalid(record, StatusField::Asset, e.value))?;
            record.node_health().map_err(|e| invalid(record, StatusField::Node, e.value))
        })
        .collect()
}

fn invalid(record: &TelemetryRecord, field: StatusField, value: String) -> AggregateError {
    AggregateError::InvalidStatusValue {
        asset_id: record.asset_id.clone(),
        node_id: record.node_id.clone(),
        field,
        value,
    }
}

impl Aggregate {
    /// Whether the feed had no records.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty() && self.subplants.is_empty()
    }

    /// Look up an asset by id.
    pub fn asset(&self, asset_id: &str) -> Option<&AssetSummary> {
        self.assets.iter().find(|a| a.asset_id == asset_id)
    }

    /// Look up a subplant by name.
    pub fn subplant(&self, name: &str) -> Option<&SubplantSummary> {
        self.subplants.iter().find(|s| s.subplant == name)
    }

    /// Assets whose first record was in the given subplant.
    pub fn assets_in<'a>(&'a self, subplant: &'a str) -> impl Iterator<Item = &'a AssetSummary> + 'a {
        self.assets.iter().filter(move |a| a.subplant == subplant)
    }

    /// Fleet-wide counts across every subplant.
    pub fn totals(&self) -> SubplantSummary {
        let mut totals = SubplantSummary::empty(ALL_SUBPLANTS);
        for summary in &self.subplants {
            totals.absorb(summary);
        }
        totals
    }

    /// Assets ordered Critical, Warning, Offline, Healthy, then by id.
    pub fn sorted_by_health(&self) -> Vec<&AssetSummary> {
        let mut sorted: Vec<&AssetSummary> = self.assets.iter().collect();
        sorted.sort_by(|a, b| b.status.cmp(&a.status).then_with(|| a.asset_id.cmp(&b.asset_id)));
        sorted
    }
}
