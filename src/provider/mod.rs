//! Word providers and result sinks.
//!
//! The session never talks to these directly: it hands out load tickets and
//! finished results, and the caller runs the fetch or submission.

pub mod bundled;
pub mod csv_log;
pub mod http;
pub mod mock;

use async_trait::async_trait;

use crate::error::{FetchError, SubmitError};
use crate::language::Language;
use crate::metrics::SessionResult;
use crate::word::Word;

pub use bundled::BundledWordProvider;
pub use csv_log::CsvResultSink;
pub use http::{HttpResultSink, HttpWordProvider};
pub use mock::{MockResultSink, MockWordProvider};

/// Source of word pools for a language/level selection
#[async_trait]
pub trait WordProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, language: Language, level: u32) -> Result<Vec<Word>, FetchError>;
}

/// Destination for finished session results
#[async_trait]
pub trait ResultSink: Send + Sync {
    fn name(&self) -> &str;

    async fn submit(&self, result: &SessionResult) -> Result<(), SubmitError>;
}

/// Emit a result and log the outcome. Failures are not retried.
///
/// Returns whether the sink accepted the result.
pub async fn submit_and_log(sink: &dyn ResultSink, result: SessionResult) -> bool {
    match sink.submit(&result).await {
        Ok(()) => {
            tracing::info!(
                sink = sink.name(),
                wpm = result.wpm,
                accuracy = result.accuracy,
                "result submitted"
            );
            true
        }
        Err(e) => {
            tracing::error!(sink = sink.name(), "failed to submit result: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> SessionResult {
        SessionResult {
            wpm: 30,
            accuracy: 97,
            timestamp: 1,
        }
    }

    #[tokio::test]
    async fn submit_and_log_reports_success() {
        let sink = MockResultSink::new();
        assert!(submit_and_log(&sink, sample_result()).await);
        assert_eq!(sink.submitted(), vec![sample_result()]);
    }

    #[tokio::test]
    async fn submit_and_log_swallows_failure() {
        let sink = MockResultSink::failing();
        assert!(!submit_and_log(&sink, sample_result()).await);
        assert_eq!(sink.attempts(), 1);
        assert!(sink.submitted().is_empty());
    }
}
