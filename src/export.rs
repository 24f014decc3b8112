//! One-shot JSON report of a feed snapshot.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use plantwatch_types::{AssetSummary, SubplantSummary, TelemetryRecord};

use crate::data::alerts::{self, Alert};
use crate::data::layout::{StageGroup, StageLayout};
use crate::data::{aggregate, AggregateError};

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub totals: SubplantSummary,
    pub subplants: Vec<SubplantSummary>,
    pub assets: Vec<AssetSummary>,
    pub stages: Vec<StageGroup>,
    pub alerts: Vec<Alert>,
}

impl Report {
    pub fn build(
        records: &[TelemetryRecord],
        layout: &StageLayout,
        now: DateTime<Utc>,
    ) -> Result<Self, AggregateError> {
        let result = aggregate(records)?;
        let alerts = alerts::simulate(records, now)?;
        Ok(Self {
            totals: result.totals(),
            stages: layout.group(&result.subplants),
            subplants: result.subplants,
            assets: result.assets,
            alerts,
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
