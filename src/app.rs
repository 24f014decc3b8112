//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};

use plantwatch_types::{AssetSummary, HealthStatus, TelemetryFeed, TelemetryRecord};

use crate::data::alerts::{self, Alert};
use crate::data::filter::{self, matches_search};
use crate::data::layout::{StageLayout, StageMember};
use crate::data::{
    aggregate, resolve_state, Aggregate, AlertBook, AlertFilter, FilterState, History, Resolved,
    Selection,
};
use crate::export::Report;
use crate::source::DataSource;
use crate::ui::Theme;

/// File written by the in-app export key.
pub const EXPORT_FILE: &str = "plantwatch_export.json";

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Subplants grouped by stage with health counts.
    Subplants,
    /// Assets narrowed by the subplant/asset filter.
    Assets,
    /// Alerts raised from unhealthy nodes.
    Alerts,
}

impl View {
    pub const ALL: [View; 3] = [View::Subplants, View::Assets, View::Alerts];

    pub fn next(self) -> Self {
        match self {
            View::Subplants => View::Assets,
            View::Assets => View::Alerts,
            View::Alerts => View::Subplants,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            View::Subplants => View::Alerts,
            View::Assets => View::Subplants,
            View::Alerts => View::Assets,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Subplants => "Subplants",
            View::Assets => "Assets",
            View::Alerts => "Alerts",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::Subplants => 0,
            View::Assets => 1,
            View::Alerts => 2,
        }
    }
}

/// One row of the Subplants view.
#[derive(Debug, Clone)]
pub struct SubplantRow {
    pub stage: String,
    pub member: StageMember,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    source: Box<dyn DataSource>,
    /// Current snapshot. Replaced wholesale on every successful refresh.
    pub records: TelemetryFeed,
    pub data: Option<Aggregate>,
    pub alerts: AlertBook,
    pub history: History,
    pub layout: StageLayout,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,

    pub filters: FilterState,
    pub alert_filter: AlertFilter,

    // Per-view selection
    pub selected_subplant_index: usize,
    pub selected_asset_index: usize,
    pub selected_alert_index: usize,

    // Search
    pub filter_text: String,
    pub filter_active: bool,

    pub theme: Theme,

    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(source: Box<dyn DataSource>, layout: StageLayout) -> Self {
        Self::with_theme(source, layout, Theme::auto_detect())
    }

    /// Same as [`App::new`] without probing the terminal.
    pub fn with_theme(source: Box<dyn DataSource>, layout: StageLayout, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Subplants,
            show_help: false,
            source,
            records: TelemetryFeed::new(),
            data: None,
            alerts: AlertBook::new(),
            history: History::new(),
            layout,
            load_error: None,
            last_updated: None,
            filters: FilterState::default(),
            alert_filter: AlertFilter::default(),
            selected_subplant_index: 0,
            selected_asset_index: 0,
            selected_alert_index: 0,
            filter_text: String::new(),
            filter_active: false,
            theme,
            status_message: None,
        }
    }

    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Current status message, if shown less than 3 seconds ago.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < Duration::from_secs(3) => Some(msg),
            _ => None,
        }
    }

    /// Time since the last accepted snapshot.
    pub fn data_age(&self) -> Option<Duration> {
        self.last_updated.map(|t| t.elapsed())
    }

    /// Poll the data source.
    ///
    /// Returns true when a new snapshot was accepted. A snapshot that fails
    /// validation is dropped and the previous one stays on screen with the
    /// error shown.
    pub fn reload_data(&mut self) -> bool {
        let Some(feed) = self.source.poll() else {
            if let Some(err) = self.source.error() {
                self.load_error = Some(err);
            }
            return false;
        };

        match self.accept(feed) {
            Ok(()) => {
                self.load_error = None;
                true
            }
            Err(e) => {
                warn!(error = %e, "rejected feed snapshot");
                self.load_error = Some(format!("Rejected feed: {}", e));
                false
            }
        }
    }

    /// Replace the current snapshot with `feed`.
    pub fn accept(&mut self, feed: TelemetryFeed) -> Result<()> {
        let data = aggregate(&feed)?;
        let raised = alerts::simulate(&feed, Utc::now())?;

        debug!(
            records = feed.len(),
            assets = data.assets.len(),
            alerts = raised.len(),
            "accepted feed snapshot"
        );

        self.history.record(&data.subplants);
        self.alerts.replace_feed(raised);
        self.records = feed;
        self.data = Some(data);
        self.last_updated = Some(Instant::now());
        self.clamp_selection();
        Ok(())
    }

    fn clamp_selection(&mut self) {
        self.selected_subplant_index = clamp(self.selected_subplant_index, self.row_count(View::Subplants));
        self.selected_asset_index = clamp(self.selected_asset_index, self.row_count(View::Assets));
        self.selected_alert_index = clamp(self.selected_alert_index, self.row_count(View::Alerts));
    }

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    // --- rows per view -----------------------------------------------------

    /// Subplants in stage order, flattened for the table.
    pub fn subplant_rows(&self) -> Vec<SubplantRow> {
        let Some(data) = &self.data else {
            return Vec::new();
        };
        let mut rows = Vec::new();
        for group in self.layout.group(&data.subplants) {
            for member in group.subplants {
                if self.matches_filter(&member.summary.subplant) {
                    rows.push(SubplantRow {
                        stage: group.stage.clone(),
                        member,
                    });
                }
            }
        }
        rows
    }

    /// Options for the current subplant/asset filter.
    pub fn resolved(&self) -> Resolved {
        resolve_state(&self.records, &self.filters)
    }

    /// Assets passing the filter and search, worst first.
    pub fn asset_rows(&self) -> Vec<&AssetSummary> {
        let Some(data) = &self.data else {
            return Vec::new();
        };
        let resolved = self.resolved();
        data.sorted_by_health()
            .into_iter()
            .filter(|a| resolved.assets.contains(&a.asset_id))
            .filter(|a| self.filters.asset.admits(&a.asset_id))
            .filter(|a| self.asset_matches_search(a))
            .collect()
    }

    /// Node records in scope of the filter, same rules as [`resolve_state`].
    pub fn node_rows(&self) -> Vec<&TelemetryRecord> {
        let in_scope = |r: &TelemetryRecord| match (self.filters.subplant.value(), self.filters.asset.value()) {
            (None, _) => true,
            (Some(_), Some(asset)) => r.asset_id == asset,
            (Some(subplant), None) => r.subplant == subplant,
        };
        self.records
            .iter()
            .filter(|r| in_scope(r))
            .filter(|r| matches_search(r, &self.filter_text))
            .collect()
    }

    /// Alerts passing the alert filter and search.
    pub fn alert_rows(&self) -> Vec<&Alert> {
        let search = self.filter_text.to_lowercase();
        self.alerts
            .filtered(&self.alert_filter)
            .filter(|a| search.is_empty() || a.device.to_lowercase().contains(&search))
            .collect()
    }

    fn row_count(&self, view: View) -> usize {
        match view {
            View::Subplants => self.subplant_rows().len(),
            View::Assets => self.asset_rows().len(),
            View::Alerts => self.alert_rows().len(),
        }
    }

    fn asset_matches_search(&self, asset: &AssetSummary) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let search = self.filter_text.to_lowercase();
        asset.asset_id.to_lowercase().contains(&search)
            || asset.node_ids.iter().any(|n| n.to_lowercase().contains(&search))
    }

    // --- selection ---------------------------------------------------------

    fn selected_mut(&mut self) -> &mut usize {
        match self.current_view {
            View::Subplants => &mut self.selected_subplant_index,
            View::Assets => &mut self.selected_asset_index,
            View::Alerts => &mut self.selected_alert_index,
        }
    }

    pub fn selected_index(&self) -> usize {
        match self.current_view {
            View::Subplants => self.selected_subplant_index,
            View::Assets => self.selected_asset_index,
            View::Alerts => self.selected_alert_index,
        }
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_next_n(&mut self, n: usize) {
        let max = self.row_count(self.current_view).saturating_sub(1);
        let selected = self.selected_mut();
        *selected = (*selected + n).min(max);
    }

    pub fn select_prev_n(&mut self, n: usize) {
        let selected = self.selected_mut();
        *selected = selected.saturating_sub(n);
    }

    pub fn select_first(&mut self) {
        *self.selected_mut() = 0;
    }

    pub fn select_last(&mut self) {
        let last = self.row_count(self.current_view).saturating_sub(1);
        *self.selected_mut() = last;
    }

    /// Select a row by its position, ignoring positions past the end.
    pub fn select_row(&mut self, row: usize) {
        if row < self.row_count(self.current_view) {
            *self.selected_mut() = row;
        }
    }

    // --- drill-down and filters -------------------------------------------

    /// From the Subplants view, open the selected subplant's assets.
    pub fn enter_selected(&mut self) {
        if self.current_view != View::Subplants {
            return;
        }
        let rows = self.subplant_rows();
        let Some(row) = rows.get(self.selected_subplant_index) else {
            return;
        };
        let subplant = row.member.summary.subplant.clone();
        self.filters.set_subplant(Selection::Only(subplant));
        self.selected_asset_index = 0;
        self.current_view = View::Assets;
    }

    /// Esc: close search, then clear filters, then return to Subplants.
    pub fn go_back(&mut self) {
        if !self.filter_text.is_empty() {
            self.clear_filter();
        } else if self.current_view == View::Assets && self.filters.is_active() {
            self.filters.clear();
        } else if self.current_view != View::Subplants {
            self.current_view = View::Subplants;
        }
    }

    pub fn cycle_subplant_filter(&mut self, forward: bool) {
        let options = filter::subplants(&self.records);
        let next = if forward {
            self.filters.subplant.cycle_next(&options)
        } else {
            self.filters.subplant.cycle_prev(&options)
        };
        self.filters.set_subplant(next);
        self.selected_asset_index = 0;
    }

    /// Step the asset filter through the assets of the selected subplant.
    pub fn cycle_asset_filter(&mut self, forward: bool) {
        if self.filters.subplant == Selection::All {
            self.set_status_message("Pick a subplant first (f)".to_string());
            return;
        }
        let options = self.resolved().assets;
        let next = if forward {
            self.filters.asset.cycle_next(&options)
        } else {
            self.filters.asset.cycle_prev(&options)
        };
        self.filters.set_asset(next);
        self.selected_asset_index = 0;
    }

    pub fn clear_view_filters(&mut self) {
        match self.current_view {
            View::Assets => self.filters.clear(),
            View::Alerts => self.alert_filter = AlertFilter::default(),
            View::Subplants => {}
        }
        self.clamp_selection();
    }

    pub fn cycle_alert_severity(&mut self) {
        self.alert_filter.cycle_severity();
        self.selected_alert_index = 0;
    }

    pub fn cycle_alert_status(&mut self) {
        self.alert_filter.cycle_status();
        self.selected_alert_index = 0;
    }

    // --- alert lifecycle ---------------------------------------------------

    fn selected_alert_id(&self) -> Option<String> {
        self.alert_rows()
            .get(self.selected_alert_index)
            .map(|a| a.id.clone())
    }

    pub fn acknowledge_selected(&mut self) {
        self.apply_to_selected_alert("Acknowledged", |book, id| book.acknowledge(id).map(|_| ()));
    }

    pub fn resolve_selected(&mut self) {
        self.apply_to_selected_alert("Resolved", |book, id| book.resolve(id).map(|_| ()));
    }

    pub fn reopen_selected(&mut self) {
        self.apply_to_selected_alert("Reopened", |book, id| book.reopen(id).map(|_| ()));
    }

    fn apply_to_selected_alert<F>(&mut self, verb: &str, op: F)
    where
        F: FnOnce(&mut AlertBook, &str) -> Result<(), crate::data::AlertError>,
    {
        let Some(id) = self.selected_alert_id() else {
            return;
        };
        let message = match op(&mut self.alerts, &id) {
            Ok(()) => {
                info!(alert = %id, action = verb, "alert updated");
                format!("{} {}", verb, id)
            }
            Err(e) => e.to_string(),
        };
        self.set_status_message(message);
        self.clamp_selection();
    }

    // --- search ------------------------------------------------------------

    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        *self.selected_mut() = 0;
    }

    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Case-insensitive substring match against the search text.
    pub fn matches_filter(&self, name: &str) -> bool {
        self.filter_text.is_empty() || name.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Count of currently unhealthy nodes fleet-wide.
    pub fn unhealthy_nodes(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.totals().unhealthy_nodes())
    }

    /// Status of a node record, `None` when the value is not a known status.
    pub fn node_status(record: &TelemetryRecord) -> Option<HealthStatus> {
        record.node_health().ok()
    }

    /// Write the current snapshot's report to `path`.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        if self.data.is_none() {
            anyhow::bail!("No data to export");
        }
        let mut report = Report::build(&self.records, &self.layout, Utc::now())?;
        // keep the lifecycle state the user has applied
        report.alerts = self.alerts.alerts().to_vec();
        report.write(path)
    }
}

fn clamp(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}
