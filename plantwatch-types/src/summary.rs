//! Derived health summaries.
//!
//! These are produced fresh on every aggregation pass and carry no link
//! back to the records they were computed from.

use alloc::string::String;
use alloc::vec::Vec;

use crate::HealthStatus;

/// Roll-up for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AssetSummary {
    #[cfg_attr(feature = "serde", serde(rename = "asset_id"))]
    pub asset_id: String,
    pub subplant: String,
    /// Most severe status among the asset's nodes.
    pub status: HealthStatus,
    /// Node ids in first-seen order, without duplicates.
    pub node_ids: Vec<String>,
}

/// Asset and node counts by status for one subplant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SubplantSummary {
    pub subplant: String,
    pub total_assets: usize,
    pub total_nodes: usize,
    pub healthy_assets: usize,
    pub warning_assets: usize,
    pub critical_assets: usize,
    pub offline_assets: usize,
    pub healthy_nodes: usize,
    pub warning_nodes: usize,
    pub critical_nodes: usize,
    pub offline_nodes: usize,
}

/// Share of critical assets at which a subplant is flagged as a hotspot.
pub const HOTSPOT_RATIO: f64 = 0.5;

impl SubplantSummary {
    /// Create an all-zero summary for a subplant.
    pub fn empty(subplant: impl Into<String>) -> Self {
        Self {
            subplant: subplant.into(),
            ..Default::default()
        }
    }

    /// Count one asset under its derived status.
    pub fn add_asset(&mut self, status: HealthStatus) {
        self.total_assets += 1;
        *self.asset_slot(status) += 1;
    }

    /// Count one node record under its status.
    pub fn add_node(&mut self, status: HealthStatus) {
        self.total_nodes += 1;
        *self.node_slot(status) += 1;
    }

    /// Number of assets with the given derived status.
    pub fn assets_with(&self, status: HealthStatus) -> usize {
        match status {
            HealthStatus::Healthy => self.healthy_assets,
            HealthStatus::Warning => self.warning_assets,
            HealthStatus::Critical => self.critical_assets,
            HealthStatus::Offline => self.offline_assets,
        }
    }

    /// Number of node records with the given status.
    pub fn nodes_with(&self, status: HealthStatus) -> usize {
        match status {
            HealthStatus::Healthy => self.healthy_nodes,
            HealthStatus::Warning => self.warning_nodes,
            HealthStatus::Critical => self.critical_nodes,
            HealthStatus::Offline => self.offline_nodes,
        }
    }

    /// Nodes that are not healthy.
    pub fn unhealthy_nodes(&self) -> usize {
        self.total_nodes - self.healthy_nodes
    }

    /// Fraction of assets that are critical, `0.0` when there are none.
    pub fn critical_ratio(&self) -> f64 {
        if self.total_assets == 0 {
            0.0
        } else {
            self.critical_assets as f64 / self.total_assets as f64
        }
    }

    /// At least half of the subplant's assets are critical.
    pub fn is_hotspot(&self) -> bool {
        self.total_assets > 0 && self.critical_ratio() >= HOTSPOT_RATIO
    }

    /// Worst derived asset status present, `Healthy` when empty.
    pub fn worst_status(&self) -> HealthStatus {
        HealthStatus::BY_SEVERITY
            .into_iter()
            .find(|s| self.assets_with(*s) > 0)
            .unwrap_or_default()
    }

    /// Fold another summary's counts into this one.
    pub fn absorb(&mut self, other: &SubplantSummary) {
        self.total_assets += other.total_assets;
        self.total_nodes += other.total_nodes;
        self.healthy_assets += other.healthy_assets;
        self.warning_assets += other.warning_assets;
        self.critical_assets += other.critical_assets;
        self.offline_assets += other.offline_assets;
        self.healthy_nodes += other.healthy_nodes;
        self.warning_nodes += other.warning_nodes;
        self.critical_nodes += other.critical_nodes;
        self.offline_nodes += other.offline_nodes;
    }

    fn asset_slot(&mut self, status: HealthStatus) -> &mut usize {
        match status {
            HealthStatus::Healthy => &mut self.healthy_assets,
            HealthStatus::Warning => &mut self.warning_assets,
            HealthStatus::Critical => &mut self.critical_assets,
            HealthStatus::Offline => &mut self.offline_assets,
        }
    }

    fn node_slot(&mut self, status: HealthStatus) -> &mut usize {
        match status {
            HealthStatus::Healthy => &mut self.healthy_nodes,
            HealthStatus::Warning => &mut self.warning_nodes,
            HealthStatus::Critical => &mut self.critical_nodes,
            HealthStatus::Offline => &mut self.offline_nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_status() {
        let mut s = SubplantSummary::empty("A");
        s.add_asset(HealthStatus::Critical);
        s.add_asset(HealthStatus::Healthy);
        s.add_node(HealthStatus::Critical);
        s.add_node(HealthStatus::Offline);
        s.add_node(HealthStatus::Healthy);

        assert_eq!(s.total_assets, 2);
        assert_eq!(s.total_nodes, 3);
        assert_eq!(s.assets_with(HealthStatus::Critical), 1);
        assert_eq!(s.nodes_with(HealthStatus::Offline), 1);
        assert_eq!(s.unhealthy_nodes(), 2);
        assert_eq!(s.worst_status(), HealthStatus::Critical);
    }

    #[test]
    fn test_hotspot_threshold() {
        let mut s = SubplantSummary::empty("A");
        assert!(!s.is_hotspot());
        assert_eq!(s.critical_ratio(), 0.0);

        s.add_asset(HealthStatus::Critical);
        s.add_asset(HealthStatus::Warning);
        assert!(s.is_hotspot());

        s.add_asset(HealthStatus::Healthy);
        assert!(!s.is_hotspot());
    }

    #[test]
    fn test_absorb() {
        let mut a = SubplantSummary::empty("all");
        let mut b = SubplantSummary::empty("B");
        b.add_asset(HealthStatus::Offline);
        b.add_node(HealthStatus::Offline);
        a.absorb(&b);
        a.absorb(&b);
        assert_eq!(a.offline_assets, 2);
        assert_eq!(a.total_nodes, 2);
        assert_eq!(a.subplant, "all");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_camel_case() {
        let s = SubplantSummary::empty("A");
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("totalAssets").is_some());
        assert!(json.get("criticalNodes").is_some());

        let asset = AssetSummary {
            asset_id: "X1".into(),
            subplant: "A".into(),
            status: HealthStatus::Critical,
            node_ids: vec!["N1".into()],
        };
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["asset_id"], "X1");
        assert_eq!(json["nodeIds"][0], "N1");
        assert_eq!(json["status"], "Critical");
    }
}
