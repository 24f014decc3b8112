//! Layered configuration.
//!
//! Values come from an optional TOML file, then from `PLANTWATCH_*`
//! environment variables (nested keys joined by `__`, e.g.
//! `PLANTWATCH_FEED__ENDPOINT`), then from command-line flags applied by
//! the binary.
//!
//! ```toml
//! refresh_secs = 5
//!
//! [feed]
//! endpoint = "https://telemetry.example.com/stage"
//! timeout_secs = 10
//!
//! [mock]
//! seed = 42
//!
//! [[stages]]
//! name = "Manufacturing"
//! subplants = [{ name = "Bravo Bay", area = "Fabrication" }]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data::layout::{Stage, StageLayout};
use crate::source::MockShape;

/// File looked for in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "plantwatch.toml";

/// Feed file read when no source is named anywhere.
pub const DEFAULT_FEED_FILE: &str = "feed.json";

/// Feed-related command-line flags, as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFlags {
    pub file: Option<PathBuf>,
    pub connect: Option<String>,
    pub endpoint: Option<String>,
    pub mock: bool,
}

/// The source to read feeds from once flags and config are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedChoice {
    File(PathBuf),
    Tcp(String),
    /// Seed for the generator.
    Mock(u64),
    #[cfg(feature = "http")]
    Http(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds between refreshes.
    pub refresh_secs: u64,
    pub feed: FeedSettings,
    pub mock: MockSettings,
    pub stages: Vec<Stage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    pub seed: u64,
    pub assets_per_subplant: usize,
    pub nodes_per_asset: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_secs: 10,
            feed: FeedSettings::default(),
            mock: MockSettings::default(),
            stages: StageLayout::default().stages,
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
        }
    }
}

impl Default for MockSettings {
    fn default() -> Self {
        let shape = MockShape::default();
        Self {
            seed: 42,
            assets_per_subplant: shape.assets_per_subplant,
            nodes_per_asset: shape.nodes_per_asset,
        }
    }
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("PLANTWATCH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("failed to read configuration")?;

        config
            .try_deserialize()
            .context("invalid configuration")
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed.timeout_secs.max(1))
    }

    pub fn layout(&self) -> StageLayout {
        StageLayout::new(self.stages.clone())
    }

    /// Pick the feed source.
    ///
    /// Any source named on the command line wins. `feed.endpoint` from the
    /// config applies only when no flag names one, and [`DEFAULT_FEED_FILE`]
    /// is the last resort.
    pub fn choose_feed(&self, flags: &FeedFlags) -> FeedChoice {
        if let Some(addr) = &flags.connect {
            return FeedChoice::Tcp(addr.clone());
        }
        if flags.mock {
            return FeedChoice::Mock(self.mock.seed);
        }
        if let Some(path) = &flags.file {
            return FeedChoice::File(path.clone());
        }
        #[cfg(feature = "http")]
        if let Some(endpoint) = flags.endpoint.clone().or_else(|| self.feed.endpoint.clone()) {
            return FeedChoice::Http(endpoint);
        }
        FeedChoice::File(PathBuf::from(DEFAULT_FEED_FILE))
    }

    pub fn mock_shape(&self) -> MockShape {
        MockShape {
            assets_per_subplant: self.mock.assets_per_subplant,
            nodes_per_asset: self.mock.nodes_per_asset,
        }
    }
}
