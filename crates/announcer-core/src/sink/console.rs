//! Console sink

use async_trait::async_trait;

use super::OutcomeSink;

/// Writes non-error lines to stdout and error lines to stderr.
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl OutcomeSink for ConsoleSink {
    async fn line(&self, message: &str, is_error: bool) {
        if is_error {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }
}
