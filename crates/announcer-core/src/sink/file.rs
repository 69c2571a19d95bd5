//! Append-only file sink

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::OutcomeSink;
use crate::config::AnnounceConfig;

/// Appends lines to a log file, with errors routed to a separate file.
///
/// Writes are serialized through a mutex so concurrent dispatchers never
/// interleave lines. Write failures are reported through tracing and
/// swallowed; an announce run never fails because a log line could not be
/// written.
pub struct FileSink {
    log_path: Option<PathBuf>,
    error_log_path: Option<PathBuf>,
    guard: Mutex<()>,
}

impl FileSink {
    /// Create a sink over the given destinations. A `None` path disables
    /// that channel.
    pub fn new(log_path: Option<PathBuf>, error_log_path: Option<PathBuf>) -> Self {
        Self {
            log_path,
            error_log_path,
            guard: Mutex::new(()),
        }
    }

    /// Build from the configuration document; empty paths disable the
    /// corresponding channel.
    pub fn from_config(config: &AnnounceConfig) -> Self {
        fn path(raw: &str) -> Option<PathBuf> {
            let raw = raw.trim();
            (!raw.is_empty()).then(|| PathBuf::from(raw))
        }
        Self::new(path(&config.log_path), path(&config.error_log_path))
    }

    async fn append(path: &Path, message: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(message.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await
    }
}

#[async_trait]
impl OutcomeSink for FileSink {
    async fn line(&self, message: &str, is_error: bool) {
        let path = if is_error {
            self.error_log_path.as_deref()
        } else {
            self.log_path.as_deref()
        };
        let Some(path) = path else { return };

        let _guard = self.guard.lock().await;
        if let Err(e) = Self::append(path, message).await {
            tracing::warn!(path = %path.display(), "failed to append announce log line: {e}");
        }
    }
}
