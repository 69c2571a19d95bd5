//! Outcome sinks
//!
//! Sinks consume the human-readable lines the dispatcher emits. The trait
//! is infallible by contract: implementations swallow their own I/O
//! failures and report them through tracing, never back into the dispatch
//! path.

pub mod console;
pub mod file;

pub use console::ConsoleSink;
pub use file::FileSink;

use std::sync::Arc;

use async_trait::async_trait;

use crate::outcome::Outcome;

/// Destination for announce log lines.
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    /// Append one line on the error or non-error channel.
    async fn line(&self, message: &str, is_error: bool);

    /// Record a finished outcome on the channel its classification selects.
    async fn record(&self, outcome: &Outcome) {
        self.line(&outcome.to_string(), outcome.is_error()).await;
    }
}

/// Fans one record out to several sinks.
pub struct MultiSink {
    sinks: Vec<Arc<dyn OutcomeSink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Arc<dyn OutcomeSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl OutcomeSink for MultiSink {
    async fn line(&self, message: &str, is_error: bool) {
        for sink in &self.sinks {
            sink.line(message, is_error).await;
        }
    }
}
