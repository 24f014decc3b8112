//! Stream-based data source.
//!
//! Receives feed snapshots as newline-delimited JSON arrays, from a TCP
//! connection or any other async byte stream.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use plantwatch_types::TelemetryFeed;

use super::{DataSource, ErrorSlot};

/// A data source fed by a background reader task.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use plantwatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"[]\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<TelemetryFeed>,
    description: String,
    last_error: ErrorSlot,
}

impl StreamSource {
    /// Spawn a task reading one JSON feed per line from `reader`.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let last_error = ErrorSlot::default();
        let errors = last_error.clone();
        let desc = description.to_string();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        info!(source = %desc, "feed stream closed");
                        errors.set("Connection closed");
                        break;
                    }
                    Ok(_) if line.trim().is_empty() => continue,
                    Ok(_) => match serde_json::from_str::<TelemetryFeed>(line.trim()) {
                        Ok(feed) => {
                            errors.clear();
                            if tx.send(feed).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(source = %desc, error = %e, "skipping malformed feed line");
                            errors.set(format!("Parse error: {}", e));
                        }
                    },
                    Err(e) => {
                        errors.set(format!("Read error: {}", e));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }

    /// Build a source from a channel of raw JSON payloads, one feed each.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, feed_rx) = mpsc::channel(16);
        let last_error = ErrorSlot::default();
        let errors = last_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match serde_json::from_slice::<TelemetryFeed>(&bytes) {
                    Ok(feed) => {
                        errors.clear();
                        if tx.send(feed).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => errors.set(format!("Parse error: {}", e)),
                }
            }
        });

        Self {
            receiver: feed_rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl DataSource for StreamSource {
    /// Drains everything queued and returns only the newest feed.
    fn poll(&mut self) -> Option<TelemetryFeed> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(feed) => latest = Some(feed),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if self.last_error.get().is_none() {
                        self.last_error.set("Stream disconnected");
                    }
                    break;
                }
            }
        }
        if let Some(feed) = &latest {
            debug!(records = feed.len(), "received feed from stream");
        }
        latest
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.get()
    }
}
