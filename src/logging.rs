//! Tracing subscriber setup for the binary.
//!
//! The filter comes from `PLANTWATCH_LOG`, then `RUST_LOG`, then `info`.
//! While the TUI owns the terminal, logs go to a file or nowhere.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "PLANTWATCH_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// No subscriber at all.
    Disabled,
    Stderr,
    /// Append to a file.
    File(PathBuf),
}

/// Install the global subscriber.
///
/// Does nothing for [`LogTarget::Disabled`]. Returns an error if the log
/// file can't be opened or a subscriber is already set.
pub fn init(target: &LogTarget) -> Result<()> {
    let filter = build_env_filter(
        std::env::var(LOG_ENV).ok().as_deref(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
    );

    match target {
        LogTarget::Disabled => Ok(()),
        LogTarget::Stderr => {
            let ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_ansi(ansi).compact())
                .try_init()
                .context("failed to install log subscriber")
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .try_init()
                .context("failed to install log subscriber")
        }
    }
}

/// First parseable of the project variable, then `RUST_LOG`, then `info`.
fn build_env_filter(project: Option<&str>, rust_log: Option<&str>) -> EnvFilter {
    [project, rust_log]
        .into_iter()
        .flatten()
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_priority() {
        let filter = build_env_filter(Some("plantwatch=debug"), Some("warn"));
        assert_eq!(filter.to_string(), "plantwatch=debug");

        let filter = build_env_filter(None, Some("warn"));
        assert_eq!(filter.to_string(), "warn");

        let filter = build_env_filter(None, None);
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn test_unparseable_directive_falls_through() {
        let filter = build_env_filter(Some("plantwatch=loudest"), Some("error"));
        assert_eq!(filter.to_string(), "error");
    }

    #[test]
    fn test_disabled_is_noop() {
        assert!(init(&LogTarget::Disabled).is_ok());
    }
}
