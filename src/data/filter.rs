//! Subplant/asset filter resolution.
//!
//! Given the current filter selection, [`resolve`] computes which asset and
//! node ids should be offered as options. All lists keep the first-seen
//! order of the feed so that UI lists stay stable between refreshes.

use std::collections::HashSet;

use plantwatch_types::TelemetryRecord;

/// Wire value meaning "no restriction".
pub const ALL: &str = "all";

/// A filter selection: everything, or one named value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Parse the wire form. `"all"` and the empty string both mean [`Selection::All`].
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == ALL {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }

    /// The selected value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v),
        }
    }

    /// Whether `candidate` passes this selection.
    pub fn admits(&self, candidate: &str) -> bool {
        self.value().is_none_or(|v| v == candidate)
    }

    /// Display label; `"all"` for the wildcard.
    pub fn label(&self) -> &str {
        self.value().unwrap_or(ALL)
    }

    /// Step to the next option: All → first → ... → last → All.
    ///
    /// A selection no longer present in `options` restarts from All.
    pub fn cycle_next(&self, options: &[String]) -> Self {
        let next = match self.value() {
            None => options.first(),
            Some(cur) => match options.iter().position(|o| o == cur) {
                Some(idx) => options.get(idx + 1),
                None => None,
            },
        };
        next.map_or(Selection::All, |v| Selection::Only(v.clone()))
    }

    /// Step to the previous option: All → last → ... → first → All.
    pub fn cycle_prev(&self, options: &[String]) -> Self {
        let prev = match self.value() {
            None => options.last(),
            Some(cur) => match options.iter().position(|o| o == cur) {
                Some(0) | None => None,
                Some(idx) => options.get(idx - 1),
            },
        };
        prev.map_or(Selection::All, |v| Selection::Only(v.clone()))
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Selection::parse(value)
    }
}

/// The subplant and asset filters shown together in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub subplant: Selection,
    pub asset: Selection,
}

impl FilterState {
    /// Change the subplant. The asset choice is reset because it may not
    /// belong to the new subplant.
    pub fn set_subplant(&mut self, subplant: Selection) {
        if self.subplant != subplant {
            self.subplant = subplant;
            self.asset = Selection::All;
        }
    }

    /// Change the asset.
    pub fn set_asset(&mut self, asset: Selection) {
        self.asset = asset;
    }

    /// Back to showing everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether anything is being filtered.
    pub fn is_active(&self) -> bool {
        self.subplant != Selection::All || self.asset != Selection::All
    }
}

/// Selectable asset and node ids for a filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolved {
    pub assets: Vec<String>,
    pub nodes: Vec<String>,
}

/// Compute the asset and node options for a subplant/asset selection.
///
/// - subplant `All`: every asset and node. The asset selection is ignored.
/// - subplant `Only(s)`: assets in `s`. Nodes come from the selected asset
///   when there is one, otherwise from all of `s`.
///
/// An unknown subplant yields empty lists.
pub fn resolve(records: &[TelemetryRecord], subplant: &Selection, asset: &Selection) -> Resolved {
    let Some(subplant) = subplant.value() else {
        return Resolved {
            assets: distinct(records.iter().map(|r| r.asset_id.as_str())),
            nodes: distinct(records.iter().map(|r| r.node_id.as_str())),
        };
    };

    let in_subplant = || records.iter().filter(move |r| r.subplant == subplant);
    let assets = distinct(in_subplant().map(|r| r.asset_id.as_str()));

    let nodes = match asset.value() {
        // Asset narrowing takes priority over subplant for nodes.
        Some(asset) => distinct(
            records
                .iter()
                .filter(|r| r.asset_id == asset)
                .map(|r| r.node_id.as_str()),
        ),
        None => distinct(in_subplant().map(|r| r.node_id.as_str())),
    };

    Resolved { assets, nodes }
}

/// [`resolve`] driven by a [`FilterState`].
pub fn resolve_state(records: &[TelemetryRecord], state: &FilterState) -> Resolved {
    resolve(records, &state.subplant, &state.asset)
}

/// Distinct subplant names, first-seen order.
pub fn subplants(records: &[TelemetryRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.subplant.as_str()))
}

/// Case-insensitive substring match on a record's asset or node id.
///
/// An empty query matches everything.
pub fn matches_search(record: &TelemetryRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    record.asset_id.to_lowercase().contains(&query) || record.node_id.to_lowercase().contains(&query)
}

/// Order-preserving dedup.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    values.filter(|v| seen.insert(v)).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantwatch_types::{FeedBuilder, HealthStatus};

    fn scenario_feed() -> Vec<TelemetryRecord> {
        FeedBuilder::new()
            .subplant("A", |s| {
                s.asset("X1", |a| {
                    a.reported(HealthStatus::Healthy)
                        .node("N1", HealthStatus::Critical)
                        .node("N2", HealthStatus::Healthy)
                })
            })
            .build()
    }

    fn plant_feed() -> Vec<TelemetryRecord> {
        FeedBuilder::new()
            .subplant("A", |s| {
                s.asset("X2", |a| a.node("N3", HealthStatus::Healthy))
                    .asset("X1", |a| a.node("N1", HealthStatus::Healthy).node("N2", HealthStatus::Warning))
            })
            .subplant("B", |s| s.asset("Y1", |a| a.node("M1", HealthStatus::Offline)))
            .subplant("A", |s| s.asset("X2", |a| a.node("N4", HealthStatus::Healthy)))
            .build()
    }

    #[test]
    fn test_scenario_subplant_all_assets() {
        let resolved = resolve(&scenario_feed(), &"A".into(), &"all".into());
        assert_eq!(resolved.assets, ["X1"]);
        assert_eq!(resolved.nodes, ["N1", "N2"]);
    }

    #[test]
    fn test_unknown_subplant_is_empty() {
        let resolved = resolve(&scenario_feed(), &"B".into(), &"all".into());
        assert!(resolved.assets.is_empty());
        assert!(resolved.nodes.is_empty());
    }

    #[test]
    fn test_all_subplants_first_seen_order() {
        let resolved = resolve(&plant_feed(), &Selection::All, &Selection::All);
        assert_eq!(resolved.assets, ["X2", "X1", "Y1"]);
        assert_eq!(resolved.nodes, ["N3", "N1", "N2", "M1", "N4"]);
    }

    #[test]
    fn test_all_subplants_ignores_asset() {
        let feed = plant_feed();
        let with_asset = resolve(&feed, &Selection::All, &"Y1".into());
        let without = resolve(&feed, &Selection::All, &Selection::All);
        assert_eq!(with_asset, without);
    }

    #[test]
    fn test_asset_narrows_nodes() {
        let resolved = resolve(&plant_feed(), &"A".into(), &"X2".into());
        assert_eq!(resolved.assets, ["X2", "X1"]);
        assert_eq!(resolved.nodes, ["N3", "N4"]);
    }

    #[test]
    fn test_asset_priority_over_subplant() {
        // Nodes follow the asset even when it sits in another subplant.
        let resolved = resolve(&plant_feed(), &"A".into(), &"Y1".into());
        assert_eq!(resolved.assets, ["X2", "X1"]);
        assert_eq!(resolved.nodes, ["M1"]);
    }

    #[test]
    fn test_empty_asset_means_all() {
        let feed = plant_feed();
        let resolved = resolve(&feed, &"A".into(), &"".into());
        assert_eq!(resolved.nodes, ["N3", "N1", "N2", "N4"]);
    }

    #[test]
    fn test_filter_state_resets_asset() {
        let mut state = FilterState::default();
        assert!(!state.is_active());

        state.set_subplant("A".into());
        state.set_asset("X1".into());
        assert_eq!(resolve_state(&plant_feed(), &state).nodes, ["N1", "N2"]);

        state.set_subplant("A".into());
        assert_eq!(state.asset, Selection::Only("X1".to_string()));

        state.set_subplant("B".into());
        assert_eq!(state.asset, Selection::All);

        state.clear();
        assert!(!state.is_active());
    }

    #[test]
    fn test_selection_cycle() {
        let options = vec!["A".to_string(), "B".to_string()];
        let s = Selection::All.cycle_next(&options);
        assert_eq!(s.label(), "A");
        let s = s.cycle_next(&options);
        assert_eq!(s.label(), "B");
        let s = s.cycle_next(&options);
        assert_eq!(s, Selection::All);

        assert_eq!(Selection::All.cycle_prev(&options).label(), "B");
        assert_eq!(Selection::from("A").cycle_prev(&options), Selection::All);
        assert_eq!(Selection::from("gone").cycle_next(&options), Selection::All);
        assert_eq!(Selection::All.cycle_next(&[]), Selection::All);
    }

    #[test]
    fn test_subplants_and_search() {
        let feed = plant_feed();
        assert_eq!(subplants(&feed), ["A", "B"]);

        let hits: Vec<&str> = feed
            .iter()
            .filter(|r| matches_search(r, "x2"))
            .map(|r| r.node_id.as_str())
            .collect();
        assert_eq!(hits, ["N3", "N4"]);
        assert!(feed.iter().all(|r| matches_search(r, "")));
        assert!(matches_search(&feed[3], "m1"));
    }
}
