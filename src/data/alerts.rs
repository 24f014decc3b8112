//! Alerts raised from non-healthy nodes and their lifecycle.
//!
//! [`simulate`] derives one alert per non-healthy node record. An
//! [`AlertBook`] owns the current alerts and enforces the
//! New → Acknowledged → Resolved lifecycle across refreshes.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use plantwatch_types::{HealthStatus, TelemetryRecord};

use super::aggregate::{validate, AggregateError};

/// How urgent an alert is. Ordered from `Low` to `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// All severities, most urgent first.
    pub const ALL: [AlertSeverity; 4] = [
        AlertSeverity::Critical,
        AlertSeverity::High,
        AlertSeverity::Medium,
        AlertSeverity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Critical => "Critical",
            AlertSeverity::High => "High",
            AlertSeverity::Medium => "Medium",
            AlertSeverity::Low => "Low",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an alert is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertStatus {
    /// Raised and not yet looked at.
    New,
    /// Someone is on it.
    Acknowledged,
    /// Closed. Can be reopened.
    Resolved,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 3] = [
        AlertStatus::New,
        AlertStatus::Acknowledged,
        AlertStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::New => "New",
            AlertStatus::Acknowledged => "Acknowledged",
            AlertStatus::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    pub timestamp: DateTime<Utc>,
    /// `"<asset_id>/<node_id>"`
    pub device: String,
    pub subplant: String,
}

/// Errors from [`AlertBook`] lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    /// No alert in the book has this id.
    #[error("no alert with id '{0}'")]
    NotFound(String),
    /// The alert's current status does not allow the requested move.
    #[error("alert '{id}' cannot go from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: AlertStatus,
        to: AlertStatus,
    },
}

fn alert_id(n: usize) -> String {
    format!("ALERT-{:03}", n)
}

/// Severity and description for a node status, `None` when healthy.
pub fn classify(status: HealthStatus) -> Option<(AlertSeverity, &'static str)> {
    match status {
        HealthStatus::Critical => Some((
            AlertSeverity::Critical,
            "Critical alert triggered. Immediate attention required.",
        )),
        HealthStatus::Offline => Some((
            AlertSeverity::High,
            "No connection detected. Last check-in over 24 hours ago.",
        )),
        HealthStatus::Warning => Some((AlertSeverity::Medium, "Operating outside of normal parameters.")),
        HealthStatus::Healthy => None,
    }
}

/// Raise one alert per non-healthy node, in feed order.
pub fn simulate(records: &[TelemetryRecord], now: DateTime<Utc>) -> Result<Vec<Alert>, AggregateError> {
    let statuses = validate(records)?;
    let mut alerts = Vec::new();
    for (record, status) in records.iter().zip(statuses) {
        if let Some((severity, description)) = classify(status) {
            alerts.push(Alert {
                id: alert_id(alerts.len() + 1),
                description: description.to_string(),
                severity,
                status: AlertStatus::New,
                timestamp: now,
                device: format!("{}/{}", record.asset_id, record.node_id),
                subplant: record.subplant.clone(),
            });
        }
    }
    Ok(alerts)
}

/// Exact-match alert filter. `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub severity: Option<AlertSeverity>,
    pub status: Option<AlertStatus>,
    pub device: Option<String>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        self.severity.is_none_or(|s| s == alert.severity)
            && self.status.is_none_or(|s| s == alert.status)
            && self.device.as_deref().is_none_or(|d| d == alert.device)
    }

    /// Cycle the severity filter: any → Critical → ... → Low → any.
    pub fn cycle_severity(&mut self) {
        self.severity = cycle(self.severity, &AlertSeverity::ALL);
    }

    /// Cycle the status filter: any → New → Acknowledged → Resolved → any.
    pub fn cycle_status(&mut self) {
        self.status = cycle(self.status, &AlertStatus::ALL);
    }
}

fn cycle<T: Copy + PartialEq>(current: Option<T>, options: &[T]) -> Option<T> {
    match current {
        None => options.first().copied(),
        Some(cur) => {
            let idx = options.iter().position(|o| *o == cur)?;
            options.get(idx + 1).copied()
        }
    }
}

/// Alert tallies by severity and by lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertCounts {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub new: usize,
    pub acknowledged: usize,
    pub resolved: usize,
}

impl AlertCounts {
    fn add(&mut self, alert: &Alert) {
        self.total += 1;
        match alert.severity {
            AlertSeverity::Critical => self.critical += 1,
            AlertSeverity::High => self.high += 1,
            AlertSeverity::Medium => self.medium += 1,
            AlertSeverity::Low => self.low += 1,
        }
        match alert.status {
            AlertStatus::New => self.new += 1,
            AlertStatus::Acknowledged => self.acknowledged += 1,
            AlertStatus::Resolved => self.resolved += 1,
        }
    }

    /// Alerts nobody has resolved yet.
    pub fn open(&self) -> usize {
        self.new + self.acknowledged
    }
}

/// Owns the current alerts.
#[derive(Debug, Clone, Default)]
pub struct AlertBook {
    alerts: Vec<Alert>,
    next_id: usize,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from a fresh simulation.
    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        let mut book = Self::new();
        book.replace_feed(alerts);
        book
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// New → Acknowledged.
    pub fn acknowledge(&mut self, id: &str) -> Result<&Alert, AlertError> {
        self.transition(id, AlertStatus::Acknowledged, &[AlertStatus::New])
    }

    /// New or Acknowledged → Resolved.
    pub fn resolve(&mut self, id: &str) -> Result<&Alert, AlertError> {
        self.transition(
            id,
            AlertStatus::Resolved,
            &[AlertStatus::New, AlertStatus::Acknowledged],
        )
    }

    /// Resolved → New.
    pub fn reopen(&mut self, id: &str) -> Result<&Alert, AlertError> {
        self.transition(id, AlertStatus::New, &[AlertStatus::Resolved])
    }

    fn transition(
        &mut self,
        id: &str,
        to: AlertStatus,
        allowed_from: &[AlertStatus],
    ) -> Result<&Alert, AlertError> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AlertError::NotFound(id.to_string()))?;
        if !allowed_from.contains(&alert.status) {
            return Err(AlertError::InvalidTransition {
                id: id.to_string(),
                from: alert.status,
                to,
            });
        }
        alert.status = to;
        Ok(&*alert)
    }

    /// Swap in a fresh simulation.
    ///
    /// A device still alerting at the same severity keeps its id, timestamp
    /// and lifecycle status. Anything else is a new alert with a new id.
    pub fn replace_feed(&mut self, fresh: Vec<Alert>) {
        let mut previous: HashMap<(String, AlertSeverity), Alert> = self
            .alerts
            .drain(..)
            .map(|a| ((a.device.clone(), a.severity), a))
            .collect();

        let mut merged = Vec::with_capacity(fresh.len());
        for alert in fresh {
            match previous.remove(&(alert.device.clone(), alert.severity)) {
                Some(kept) => merged.push(Alert {
                    description: alert.description,
                    subplant: alert.subplant,
                    ..kept
                }),
                None => {
                    self.next_id += 1;
                    merged.push(Alert {
                        id: alert_id(self.next_id),
                        ..alert
                    });
                }
            }
        }
        self.alerts = merged;
    }

    /// Alerts passing `filter`, in book order.
    pub fn filtered<'a>(&'a self, filter: &'a AlertFilter) -> impl Iterator<Item = &'a Alert> + 'a {
        self.alerts.iter().filter(move |a| filter.matches(a))
    }

    /// Counts over the alerts passing `filter`.
    pub fn counts(&self, filter: &AlertFilter) -> AlertCounts {
        let mut counts = AlertCounts::default();
        for alert in self.filtered(filter) {
            counts.add(alert);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::StatusField;
    use plantwatch_types::FeedBuilder;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn feed() -> Vec<TelemetryRecord> {
        FeedBuilder::new()
            .subplant("Bravo Bay", |s| {
                s.asset("Press-01", |a| {
                    a.node("N1", HealthStatus::Critical)
                        .node("N2", HealthStatus::Healthy)
                        .node("N3", HealthStatus::Warning)
                })
            })
            .subplant("Echo Yard", |s| s.asset("Crane-01", |a| a.node("N4", HealthStatus::Offline)))
            .build()
    }

    #[test]
    fn test_simulate_one_per_unhealthy_node() {
        let alerts = simulate(&feed(), now()).unwrap();
        assert_eq!(alerts.len(), 3);

        assert_eq!(alerts[0].id, "ALERT-001");
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(alerts[0].device, "Press-01/N1");
        assert_eq!(
            alerts[0].description,
            "Critical alert triggered. Immediate attention required."
        );

        assert_eq!(alerts[1].id, "ALERT-002");
        assert_eq!(alerts[1].severity, AlertSeverity::Medium);
        assert_eq!(alerts[1].device, "Press-01/N3");

        assert_eq!(alerts[2].severity, AlertSeverity::High);
        assert_eq!(alerts[2].subplant, "Echo Yard");
        assert!(alerts[2].description.starts_with("No connection detected"));

        assert!(alerts.iter().all(|a| a.status == AlertStatus::New && a.timestamp == now()));
    }

    #[test]
    fn test_simulate_rejects_unknown_status() {
        let mut records = feed();
        records[1].node_status = "Unknown".to_string();
        let err = simulate(&records, now()).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::InvalidStatusValue { field: StatusField::Node, ref value, .. } if value == "Unknown"
        ));
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut book = AlertBook::from_alerts(simulate(&feed(), now()).unwrap());

        assert_eq!(book.acknowledge("ALERT-001").unwrap().status, AlertStatus::Acknowledged);
        assert!(matches!(
            book.acknowledge("ALERT-001"),
            Err(AlertError::InvalidTransition { from: AlertStatus::Acknowledged, .. })
        ));
        assert_eq!(book.resolve("ALERT-001").unwrap().status, AlertStatus::Resolved);
        assert!(book.resolve("ALERT-001").is_err());
        assert!(book.acknowledge("ALERT-001").is_err());
        assert_eq!(book.reopen("ALERT-001").unwrap().status, AlertStatus::New);

        // New can be resolved directly, but not reopened.
        assert!(matches!(
            book.reopen("ALERT-002"),
            Err(AlertError::InvalidTransition { to: AlertStatus::New, .. })
        ));
        assert!(book.resolve("ALERT-002").is_ok());

        assert_eq!(
            book.acknowledge("ALERT-999").unwrap_err(),
            AlertError::NotFound("ALERT-999".to_string())
        );
    }

    #[test]
    fn test_counts_and_filter() {
        let mut book = AlertBook::from_alerts(simulate(&feed(), now()).unwrap());
        book.acknowledge("ALERT-002").unwrap();

        let all = book.counts(&AlertFilter::default());
        assert_eq!(all.total, 3);
        assert_eq!((all.critical, all.high, all.medium, all.low), (1, 1, 1, 0));
        assert_eq!((all.new, all.acknowledged, all.resolved), (2, 1, 0));
        assert_eq!(all.open(), 3);

        let filter = AlertFilter {
            status: Some(AlertStatus::New),
            ..Default::default()
        };
        let counts = book.counts(&filter);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.medium, 0);

        let filter = AlertFilter {
            device: Some("Crane-01/N4".to_string()),
            ..Default::default()
        };
        let ids: Vec<&str> = book.filtered(&filter).map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["ALERT-003"]);
    }

    #[test]
    fn test_filter_cycling() {
        let mut filter = AlertFilter::default();
        filter.cycle_severity();
        assert_eq!(filter.severity, Some(AlertSeverity::Critical));
        for _ in 0..3 {
            filter.cycle_severity();
        }
        assert_eq!(filter.severity, Some(AlertSeverity::Low));
        filter.cycle_severity();
        assert_eq!(filter.severity, None);

        filter.cycle_status();
        filter.cycle_status();
        assert_eq!(filter.status, Some(AlertStatus::Acknowledged));
    }

    #[test]
    fn test_replace_feed_keeps_lifecycle() {
        let mut book = AlertBook::from_alerts(simulate(&feed(), now()).unwrap());
        book.acknowledge("ALERT-001").unwrap();
        book.resolve("ALERT-003").unwrap();

        // Press-01/N3 recovers, Crane-01/N4 escalates to Critical.
        let mut records = feed();
        records[2].node_status = "Healthy".to_string();
        records[3].node_status = "Critical".to_string();
        let later = now() + chrono::Duration::minutes(10);
        book.replace_feed(simulate(&records, later).unwrap());

        assert_eq!(book.len(), 2);
        let kept = &book.alerts()[0];
        assert_eq!(kept.id, "ALERT-001");
        assert_eq!(kept.status, AlertStatus::Acknowledged);
        assert_eq!(kept.timestamp, now());

        let escalated = &book.alerts()[1];
        assert_eq!(escalated.device, "Crane-01/N4");
        assert_eq!(escalated.id, "ALERT-004");
        assert_eq!(escalated.status, AlertStatus::New);
        assert_eq!(escalated.timestamp, later);
    }

    #[test]
    fn test_empty_feed_has_no_alerts() {
        let book = AlertBook::from_alerts(simulate(&[], now()).unwrap());
        assert!(book.is_empty());
        assert_eq!(book.counts(&AlertFilter::default()), AlertCounts::default());
    }
}
