//! Error types for the scanning pipeline

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while building or running the pipeline
#[derive(Error, Debug)]
pub enum ScanError {
    /// The model call failed or its reply broke the NONE / YES: contract
    #[error("Classification failed on page {page}: {reason}")]
    ClassificationFailure {
        /// 1-based page number
        page: usize,
        /// What went wrong
        reason: String,
    },

    /// The model call did not finish in time
    #[error("Classification timed out on page {page} after {after:?}")]
    Timeout {
        /// 1-based page number
        page: usize,
        /// Configured timeout
        after: Duration,
    },

    /// A keyword pattern does not compile
    #[error("Malformed keyword pattern '{pattern}': {source}")]
    MalformedPattern {
        /// The offending pattern
        pattern: String,
        /// Compilation error
        #[source]
        source: regex::Error,
    },

    /// The summarizer failed
    #[error("Summarization failed: {0}")]
    Summarization(String),

    /// Invalid registry or scanner configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker task panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Task(String),
}

impl ScanError {
    /// Whether this error came from a classification call (including timeouts)
    pub fn is_classification_failure(&self) -> bool {
        matches!(
            self,
            ScanError::ClassificationFailure { .. } | ScanError::Timeout { .. }
        )
    }

    /// Page the failure happened on, if it is tied to one
    pub fn page(&self) -> Option<usize> {
        match self {
            ScanError::ClassificationFailure { page, .. } | ScanError::Timeout { page, .. } => {
                Some(*page)
            }
            _ => None,
        }
    }
}
