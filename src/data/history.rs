//! Refresh-over-refresh tracking of unhealthy node counts.

use std::collections::{HashMap, VecDeque};

use plantwatch_types::SubplantSummary;

/// Maximum number of refreshes kept per subplant.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks how many nodes were non-healthy in each subplant over recent
/// refreshes, for sparklines and trend arrows.
#[derive(Debug, Clone, Default)]
pub struct History {
    unhealthy: HashMap<String, VecDeque<usize>>,
    refreshes: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one refresh.
    ///
    /// A subplant missing from this refresh gets a zero sample so every
    /// series stays aligned with the refresh count. A missing subplant whose
    /// kept samples are all zero is dropped.
    pub fn record(&mut self, subplants: &[SubplantSummary]) {
        let depth = self.refreshes.min(MAX_HISTORY_SIZE);
        let current: HashMap<&str, usize> = subplants
            .iter()
            .map(|s| (s.subplant.as_str(), s.unhealthy_nodes()))
            .collect();

        // back-fill so a late subplant lines up with the others
        for name in current.keys() {
            if !self.unhealthy.contains_key(*name) {
                self.unhealthy
                    .insert(name.to_string(), std::iter::repeat_n(0, depth).collect());
            }
        }

        for (name, series) in self.unhealthy.iter_mut() {
            series.push_back(current.get(name.as_str()).copied().unwrap_or(0));
            if series.len() > MAX_HISTORY_SIZE {
                series.pop_front();
            }
        }
        self.unhealthy
            .retain(|name, series| current.contains_key(name.as_str()) || series.iter().any(|&n| n > 0));
        self.refreshes += 1;
    }

    /// Number of refreshes recorded so far.
    pub fn len(&self) -> usize {
        self.refreshes
    }

    pub fn is_empty(&self) -> bool {
        self.refreshes == 0
    }

    /// Unhealthy-node samples for a subplant, oldest first.
    pub fn samples(&self, subplant: &str) -> Vec<usize> {
        self.unhealthy
            .get(subplant)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Samples normalised to 0-7 for an 8-level sparkline.
    ///
    /// Empty until there are at least two samples.
    pub fn sparkline(&self, subplant: &str) -> Vec<u8> {
        let Some(values) = self.unhealthy.get(subplant) else {
            return Vec::new();
        };
        if values.len() < 2 {
            return Vec::new();
        }

        let max = values.iter().copied().max().unwrap_or(0).max(1) as f64;
        values
            .iter()
            .map(|&v| ((v as f64 / max * 7.0).round() as u8).min(7))
            .collect()
    }

    /// Change in unhealthy nodes since the previous refresh.
    pub fn delta(&self, subplant: &str) -> Option<i64> {
        let series = self.unhealthy.get(subplant)?;
        if series.len() < 2 {
            return None;
        }
        let current = *series.back()? as i64;
        let previous = *series.get(series.len() - 2)? as i64;
        Some(current - previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantwatch_types::HealthStatus;

    fn summary(name: &str, unhealthy: usize, healthy: usize) -> SubplantSummary {
        let mut s = SubplantSummary::empty(name);
        for _ in 0..unhealthy {
            s.add_node(HealthStatus::Warning);
        }
        for _ in 0..healthy {
            s.add_node(HealthStatus::Healthy);
        }
        s
    }

    #[test]
    fn test_record_and_delta() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.delta("A"), None);

        history.record(&[summary("A", 1, 3)]);
        assert_eq!(history.delta("A"), None);
        assert!(history.sparkline("A").is_empty());

        history.record(&[summary("A", 4, 0)]);
        assert_eq!(history.delta("A"), Some(3));
        assert_eq!(history.samples("A"), [1, 4]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_sparkline_normalised() {
        let mut history = History::new();
        for n in [0, 2, 4] {
            history.record(&[summary("A", n, 1)]);
        }
        assert_eq!(history.sparkline("A"), [0, 4, 7]);
    }

    #[test]
    fn test_missing_and_late_subplants_stay_aligned() {
        let mut history = History::new();
        history.record(&[summary("A", 2, 0)]);
        history.record(&[summary("B", 5, 0)]);

        assert_eq!(history.samples("A"), [2, 0]);
        assert_eq!(history.samples("B"), [0, 5]);
        assert_eq!(history.delta("A"), Some(-2));
    }

    #[test]
    fn test_departed_subplant_evicted_once_quiet() {
        let mut history = History::new();
        history.record(&[summary("A", 2, 0), summary("B", 0, 1)]);

        for _ in 0..(MAX_HISTORY_SIZE - 1) {
            history.record(&[summary("B", 0, 1)]);
        }
        // the 2 is still inside the window
        assert_eq!(history.samples("A").len(), MAX_HISTORY_SIZE);

        history.record(&[summary("B", 0, 1)]);
        assert!(history.samples("A").is_empty());
        assert!(!history.unhealthy.contains_key("A"));
        // present but healthy series are kept
        assert_eq!(history.samples("B").len(), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_rotating_names_do_not_accumulate() {
        let mut history = History::new();
        for i in 0..500 {
            history.record(&[summary(&format!("S{}", i), 0, 1)]);
        }
        assert_eq!(history.unhealthy.len(), 1);
        assert_eq!(history.len(), 500);
    }

    #[test]
    fn test_capped_at_max() {
        let mut history = History::new();
        for n in 0..(MAX_HISTORY_SIZE + 10) {
            history.record(&[summary("A", n, 0)]);
        }
        let samples = history.samples("A");
        assert_eq!(samples.len(), MAX_HISTORY_SIZE);
        assert_eq!(samples[0], 10);
    }
}
