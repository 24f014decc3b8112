//! Grouping of subplants into process stages.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use plantwatch_types::SubplantSummary;

/// Name of the trailing group for subplants no stage claims.
pub const UNASSIGNED: &str = "Unassigned";

/// A subplant's place in the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubplantSlot {
    pub name: String,
    #[serde(default)]
    pub area: String,
}

/// One process stage and the subplants it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    #[serde(default)]
    pub subplants: Vec<SubplantSlot>,
}

/// Ordered list of stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageLayout {
    pub stages: Vec<Stage>,
}

/// A stage populated with the subplants present in the current feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageGroup {
    pub stage: String,
    pub subplants: Vec<StageMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageMember {
    pub area: String,
    pub summary: SubplantSummary,
}

impl StageGroup {
    /// Counts summed over the group's subplants.
    pub fn totals(&self) -> SubplantSummary {
        let mut totals = SubplantSummary::empty(self.stage.clone());
        for member in &self.subplants {
            totals.absorb(&member.summary);
        }
        totals
    }
}

fn stage(name: &str, slots: &[(&str, &str)]) -> Stage {
    Stage {
        name: name.to_string(),
        subplants: slots
            .iter()
            .map(|(name, area)| SubplantSlot {
                name: name.to_string(),
                area: area.to_string(),
            })
            .collect(),
    }
}

impl Default for StageLayout {
    fn default() -> Self {
        Self {
            stages: vec![
                stage(
                    "Manufacturing",
                    &[
                        ("Bravo Bay", "Fabrication"),
                        ("Hotel Sector", "Molding"),
                        ("Charlie Works", "Finishing"),
                    ],
                ),
                stage(
                    "Assembly & QC",
                    &[("Alpha Station", "Assembly"), ("Delta Point", "QC & Testing")],
                ),
                stage(
                    "Logistics & Shipping",
                    &[
                        ("India Complex", "Packaging"),
                        ("Foxtrot Factory", "Logistics"),
                        ("Echo Yard", "Warehouse"),
                        ("Gamma Plant", "Shipping"),
                    ],
                ),
            ],
        }
    }
}

impl StageLayout {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Every subplant name in layout order.
    pub fn subplant_names(&self) -> impl Iterator<Item = &str> {
        self.stages
            .iter()
            .flat_map(|s| s.subplants.iter().map(|slot| slot.name.as_str()))
    }

    /// Area label for a subplant, if the layout knows it.
    pub fn area_of(&self, subplant: &str) -> Option<&str> {
        self.stages
            .iter()
            .flat_map(|s| &s.subplants)
            .find(|slot| slot.name == subplant)
            .map(|slot| slot.area.as_str())
    }

    /// Arrange summaries by stage.
    ///
    /// Stages without any subplant in the feed are left out. Subplants not
    /// named in the layout are collected, in feed order, under
    /// [`UNASSIGNED`]. A subplant listed under two stages shows up only in
    /// the first.
    pub fn group(&self, summaries: &[SubplantSummary]) -> Vec<StageGroup> {
        let mut placed: HashSet<&str> = HashSet::new();
        let mut groups = Vec::new();

        for stage in &self.stages {
            let members: Vec<StageMember> = stage
                .subplants
                .iter()
                .filter_map(|slot| {
                    let summary = summaries.iter().find(|s| s.subplant == slot.name)?;
                    placed.insert(summary.subplant.as_str()).then(|| StageMember {
                        area: slot.area.clone(),
                        summary: summary.clone(),
                    })
                })
                .collect();
            if !members.is_empty() {
                groups.push(StageGroup {
                    stage: stage.name.clone(),
                    subplants: members,
                });
            }
        }

        let leftovers: Vec<StageMember> = summaries
            .iter()
            .filter(|s| !placed.contains(s.subplant.as_str()))
            .map(|s| StageMember {
                area: String::new(),
                summary: s.clone(),
            })
            .collect();
        if !leftovers.is_empty() {
            groups.push(StageGroup {
                stage: UNASSIGNED.to_string(),
                subplants: leftovers,
            });
        }

        groups
    }
}
