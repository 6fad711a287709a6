//! Append-only log of analysis requests.
//!
//! One line per request:
//!
//! ```text
//! 2025-05-06 14:30:00,123 - URL: https://example.com/story | Success: True
//! ```
//!
//! The file is opened in append mode for every entry and writes are
//! serialized through a mutex, so concurrent requests never interleave
//! partial lines.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

#[derive(Debug)]
pub struct RequestLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RequestLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry for `url`.
    ///
    /// The file is created on first use. Failures are logged, never
    /// returned; a broken log file must not fail the request it describes.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL as submitted, already trimmed by the caller
    /// * `success` - Whether the request produced a report
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub async fn record(&self, url: &str, success: bool) {
        let line = format_entry(Local::now(), url, success);
        if let Err(e) = self.append(&line).await {
            warn!(error = %e, "Failed to write request log entry");
        } else {
            debug!("Recorded request");
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

/// Render one log line, including the trailing newline.
pub fn format_entry(at: DateTime<Local>, url: &str, success: bool) -> String {
    let success = if success { "True" } else { "False" };
    format!(
        "{} - URL: {} | Success: {}\n",
        at.format("%Y-%m-%d %H:%M:%S,%3f"),
        url.replace(['\r', '\n'], " "),
        success
    )
}
