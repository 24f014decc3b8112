//! Generated feed for demos and offline development.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use plantwatch_types::{HealthStatus, TelemetryFeed, TelemetryRecord};

use super::DataSource;

/// How many assets and nodes to generate per subplant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockShape {
    pub assets_per_subplant: usize,
    pub nodes_per_asset: usize,
}

impl Default for MockShape {
    fn default() -> Self {
        Self {
            assets_per_subplant: 4,
            nodes_per_asset: 3,
        }
    }
}

/// Roll a node status: 10% Offline, 10% Critical, 20% Warning, 60% Healthy.
fn roll_status(rng: &mut impl Rng) -> HealthStatus {
    match rng.gen_range(0..100u8) {
        0..=9 => HealthStatus::Offline,
        10..=19 => HealthStatus::Critical,
        20..=39 => HealthStatus::Warning,
        _ => HealthStatus::Healthy,
    }
}

/// Initials of a subplant name, e.g. `"Bravo Bay"` → `"BB"`.
fn prefix(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "SP".to_string()
    } else {
        initials
    }
}

/// Generate one feed snapshot.
///
/// Asset ids are `<initials>-A<nn>` and node ids `<asset>-N<n>`. Subplants
/// sharing initials get a numeric suffix so asset ids never collide.
pub fn generate_feed(rng: &mut impl Rng, subplants: &[String], shape: MockShape) -> TelemetryFeed {
    let mut used: HashSet<String> = HashSet::new();
    let mut feed = Vec::with_capacity(subplants.len() * shape.assets_per_subplant * shape.nodes_per_asset);

    for (idx, subplant) in subplants.iter().enumerate() {
        let mut tag = prefix(subplant);
        if !used.insert(tag.clone()) {
            tag = format!("{}{}", tag, idx + 1);
            used.insert(tag.clone());
        }

        for a in 1..=shape.assets_per_subplant {
            let asset_id = format!("{}-A{:02}", tag, a);
            let nodes: Vec<HealthStatus> = (0..shape.nodes_per_asset).map(|_| roll_status(rng)).collect();
            let reported = nodes.iter().copied().max().unwrap_or_default();

            for (n, status) in nodes.into_iter().enumerate() {
                feed.push(TelemetryRecord::new(
                    subplant.clone(),
                    asset_id.clone(),
                    format!("{}-N{}", asset_id, n + 1),
                    reported,
                    status,
                ));
            }
        }
    }
    feed
}

/// Produces a fresh random feed on every poll.
#[derive(Debug)]
pub struct MockSource {
    rng: StdRng,
    subplants: Vec<String>,
    shape: MockShape,
    description: String,
}

impl MockSource {
    /// Same seed and subplants give the same sequence of feeds.
    pub fn new(seed: u64, subplants: Vec<String>, shape: MockShape) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            subplants,
            shape,
            description: format!("mock: seed {}", seed),
        }
    }
}

impl DataSource for MockSource {
    fn poll(&mut self) -> Option<TelemetryFeed> {
        Some(generate_feed(&mut self.rng, &self.subplants, self.shape))
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate;
    use crate::data::layout::StageLayout;

    fn default_subplants() -> Vec<String> {
        StageLayout::default().subplant_names().map(str::to_string).collect()
    }

    #[test]
    fn test_same_seed_same_feed() {
        let mut a = MockSource::new(7, default_subplants(), MockShape::default());
        let mut b = MockSource::new(7, default_subplants(), MockShape::default());
        assert_eq!(a.poll(), b.poll());
        assert_eq!(a.poll(), b.poll());
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = MockSource::new(1, default_subplants(), MockShape::default());
        let mut b = MockSource::new(2, default_subplants(), MockShape::default());
        assert_ne!(a.poll(), b.poll());
    }

    #[test]
    fn test_shape_and_ids() {
        let shape = MockShape {
            assets_per_subplant: 2,
            nodes_per_asset: 3,
        };
        let mut rng = StdRng::seed_from_u64(42);
        let feed = generate_feed(&mut rng, &default_subplants(), shape);

        assert_eq!(feed.len(), 9 * 2 * 3);
        assert_eq!(feed[0].subplant, "Bravo Bay");
        assert_eq!(feed[0].asset_id, "BB-A01");
        assert_eq!(feed[0].node_id, "BB-A01-N1");

        let result = aggregate(&feed).unwrap();
        assert_eq!(result.subplants.len(), 9);
        assert_eq!(result.assets.len(), 18);
    }

    #[test]
    fn test_reported_status_matches_nodes() {
        let mut rng = StdRng::seed_from_u64(3);
        let feed = generate_feed(&mut rng, &default_subplants(), MockShape::default());
        let result = aggregate(&feed).unwrap();
        for record in &feed {
            let asset = result.asset(&record.asset_id).unwrap();
            assert_eq!(record.asset_health().unwrap(), asset.status);
        }
    }

    #[test]
    fn test_colliding_initials() {
        let mut rng = StdRng::seed_from_u64(0);
        let subplants = vec!["Alpha Station".to_string(), "Able Shop".to_string()];
        let feed = generate_feed(&mut rng, &subplants, MockShape::default());
        let result = aggregate(&feed).unwrap();
        assert_eq!(result.assets.len(), 8);
        assert!(result.asset("AS2-A01").is_some());
    }

    #[test]
    fn test_status_weights_roughly_hold() {
        let mut rng = StdRng::seed_from_u64(99);
        let shape = MockShape {
            assets_per_subplant: 100,
            nodes_per_asset: 10,
        };
        let feed = generate_feed(&mut rng, &["Big".to_string()], shape);
        let healthy = feed.iter().filter(|r| r.node_status == "Healthy").count();
        let ratio = healthy as f64 / feed.len() as f64;
        assert!((0.55..0.65).contains(&ratio), "healthy ratio {}", ratio);
    }
}
