//! File-based data source.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use plantwatch_types::TelemetryFeed;

use super::DataSource;

/// Reads the feed from a JSON array file.
///
/// The file's modification time is tracked and the file is only re-read
/// after it changes, so an external exporter can overwrite it in place.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<TelemetryFeed> {
        let result = fs::read(&self.path)
            .map_err(|e| format!("Read error: {}", e))
            .and_then(|bytes| {
                serde_json::from_slice::<TelemetryFeed>(&bytes).map_err(|e| format!("Parse error: {}", e))
            });

        match result {
            Ok(feed) => {
                debug!(path = %self.path.display(), records = feed.len(), "loaded feed file");
                self.last_error = None;
                Some(feed)
            }
            Err(message) => {
                warn!(path = %self.path.display(), error = %message, "failed to load feed file");
                self.last_error = Some(message);
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<TelemetryFeed> {
        let current = self.modified_time();

        let changed = match (&self.last_modified, &current) {
            (None, _) => true,        // nothing loaded yet
            (Some(_), None) => false, // file went away, keep what we have
            (Some(last), Some(current)) => current > last,
        };

        if !changed {
            return None;
        }
        let feed = self.read_file()?;
        self.last_modified = current;
        Some(feed)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"[
            {"subplant":"A","asset_id":"X1","node_id":"N1","asset_status":"Critical","node_status":"Critical"},
            {"subplant":"A","asset_id":"X1","node_id":"N2","asset_status":"Critical","node_status":"Healthy"}
        ]"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/feed.json");
        assert_eq!(source.path(), Path::new("/tmp/feed.json"));
        assert_eq!(source.description(), "file: /tmp/feed.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_poll_reads_once_until_changed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let feed = source.poll().unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[1].node_id, "N2");

        assert!(source.poll().is_none());
    }

    #[test]
    fn test_rewrite_is_picked_up() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_some());

        // coarse mtime resolution on some filesystems
        std::thread::sleep(std::time::Duration::from_millis(1100));
        std::fs::write(file.path(), "[]").unwrap();

        if let Some(feed) = source.poll() {
            assert!(feed.is_empty());
        }
    }

    #[test]
    fn test_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/feed.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_error_clears_after_fix() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{").unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_none());
        assert!(source.error().is_some());

        // still nothing loaded, so the next poll retries regardless of mtime
        std::fs::write(file.path(), sample_json()).unwrap();
        assert!(source.poll().is_some());
        assert!(source.error().is_none());
    }
}
