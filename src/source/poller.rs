//! Background polling of the telemetry HTTP API.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use plantwatch_adapters::http::TelemetryApi;

use super::ChannelSource;

/// Poll `api` every `interval` and publish each feed to a [`ChannelSource`].
///
/// A failed fetch leaves the last good feed in place and records the error
/// on the source. The task ends when the source is dropped.
pub fn spawn_poller(api: TelemetryApi, interval: Duration) -> (ChannelSource, JoinHandle<()>) {
    let (tx, source) = ChannelSource::create(api.endpoint());
    let errors = source.error_slot();

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match api.fetch().await {
                Ok(feed) => {
                    errors.clear();
                    debug!(records = feed.len(), "publishing polled feed");
                    if tx.send(feed).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(endpoint = api.endpoint(), error = %e, "telemetry fetch failed");
                    errors.set(e.to_string());
                    if tx.is_closed() {
                        break;
                    }
                }
            }
        }
    });

    (source, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DataSource;

    #[tokio::test]
    async fn test_poller_records_fetch_errors() {
        let api = TelemetryApi::builder()
            .endpoint("http://127.0.0.1:9/feed")
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        let (mut source, handle) = spawn_poller(api, Duration::from_secs(60));
        assert_eq!(source.description(), "channel: http://127.0.0.1:9/feed");

        // the first tick fires immediately
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(source.error().is_some());
        // only the initial empty feed has been published
        assert!(source.poll().unwrap().is_empty());
        assert!(source.poll().is_none());

        handle.abort();
    }
}
