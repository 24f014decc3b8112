//! Channel-based data source.
//!
//! Snapshots are pushed through a tokio watch channel, so only the most
//! recent one is ever observed.

use tokio::sync::watch;

use plantwatch_types::TelemetryFeed;

use super::{DataSource, ErrorSlot};

/// A data source that receives feed snapshots via a watch channel.
///
/// # Example
///
/// ```
/// use plantwatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("https://telemetry.local/feed");
/// tx.send(Vec::new()).unwrap();
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<TelemetryFeed>,
    description: String,
    last_error: ErrorSlot,
    initial_returned: bool,
}

impl ChannelSource {
    pub fn new(receiver: watch::Receiver<TelemetryFeed>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            last_error: ErrorSlot::default(),
            initial_returned: false,
        }
    }

    /// Create a channel pair. The source starts out with an empty feed.
    pub fn create(source_description: &str) -> (watch::Sender<TelemetryFeed>, Self) {
        let (tx, rx) = watch::channel(TelemetryFeed::new());
        (tx, Self::new(rx, source_description))
    }

    /// Handle the producer uses to report fetch failures.
    pub fn error_slot(&self) -> ErrorSlot {
        self.last_error.clone()
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<TelemetryFeed> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantwatch_types::{FeedBuilder, HealthStatus};

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");
        assert_eq!(source.description(), "channel: test");

        // initial empty feed
        assert!(source.poll().unwrap().is_empty());
        assert!(source.poll().is_none());

        let feed = FeedBuilder::new()
            .subplant("A", |s| s.asset("X1", |a| a.node("N1", HealthStatus::Healthy)))
            .build();
        tx.send(feed).unwrap();

        assert_eq!(source.poll().unwrap().len(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let (tx, mut source) = ChannelSource::create("test");
        let _ = source.poll();

        for n in 1..=3 {
            let feed = FeedBuilder::new()
                .subplant("A", |s| {
                    (0..n).fold(s, |s, i| s.asset(format!("X{}", i), |a| a.node("N", HealthStatus::Healthy)))
                })
                .build();
            tx.send(feed).unwrap();
        }

        assert_eq!(source.poll().unwrap().len(), 3);
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_error_slot_is_shared() {
        let (_tx, source) = ChannelSource::create("test");
        let slot = source.error_slot();
        slot.set("API returned status 503");
        assert_eq!(source.error().as_deref(), Some("API returned status 503"));
        slot.clear();
        assert!(source.error().is_none());
    }
}
