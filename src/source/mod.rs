//! Where feed snapshots come from.
//!
//! Every source hands out whole [`TelemetryFeed`] snapshots. A new snapshot
//! replaces the previous one; nothing is merged across refreshes.

mod channel;
mod file;
mod mock;
#[cfg(feature = "http")]
mod poller;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use mock::{generate_feed, MockShape, MockSource};
#[cfg(feature = "http")]
pub use poller::spawn_poller;
pub use stream::StreamSource;

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use plantwatch_types::TelemetryFeed;

/// Trait for receiving feed snapshots from various sources.
///
/// # Example
///
/// ```
/// use plantwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("feed.json");
/// if let Some(feed) = source.poll() {
///     println!("Got {} records", feed.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Latest snapshot if one arrived since the previous call. Never blocks.
    fn poll(&mut self) -> Option<TelemetryFeed>;

    /// Human-readable description, shown in the status bar.
    fn description(&self) -> &str;

    /// Error from the most recent attempt to get data, if it failed.
    fn error(&self) -> Option<String>;
}

/// Last error message, shared between a source and its background task.
#[derive(Debug, Clone, Default)]
pub struct ErrorSlot(Arc<Mutex<Option<String>>>);

impl ErrorSlot {
    pub fn set(&self, message: impl Into<String>) {
        *self.lock() = Some(message.into());
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // a panicked writer leaves a plain Option behind, still usable
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
