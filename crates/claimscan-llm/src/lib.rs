//! Claimscan LLM Provider Layer
//!
//! Pluggable text-generation backends behind the [`TextGenerator`] trait.
//!
//! # Architecture
//!
//! The pipeline only ever needs one capability from a model: given a system
//! prompt and a block of user text, return the reply text. Every provider
//! implements that contract and surfaces failures as [`LlmError`].
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing and dry runs
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use claimscan_llm::{MockProvider, TextGenerator};
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let provider = MockProvider::new("NONE");
//! let reply = provider.generate("system prompt", "page text").await.unwrap();
//! assert_eq!(reply, "NONE");
//! # });
//! ```

#![warn(missing_docs)]

pub mod openai;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Credentials missing or rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// A text-generation capability
///
/// Implementations must be shareable across the concurrent workers of a scan.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply to `user_text` under the given system prompt
    async fn generate(&self, system_prompt: &str, user_text: &str) -> Result<String, LlmError>;

    /// Name of the underlying model, for logs
    fn model_name(&self) -> &str {
        "llm"
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, system_prompt: &str, user_text: &str) -> Result<String, LlmError> {
        (**self).generate(system_prompt, user_text).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// One call recorded by [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// System prompt of the call
    pub system_prompt: String,
    /// User text of the call
    pub user_text: String,
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Error,
}

#[derive(Debug, Default)]
struct MockState {
    exact: HashMap<String, Scripted>,
    containing: Vec<(String, Scripted)>,
    calls: Vec<RecordedCall>,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured replies without making any network
/// calls. Replies are looked up by exact user text first, then by the first
/// registered substring the user text contains, then fall back to the default.
///
/// # Examples
///
/// ```
/// use claimscan_llm::{MockProvider, TextGenerator};
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let mut provider = MockProvider::new("NONE");
/// provider.add_response("page two", "YES: pool claimed");
/// provider.add_response_containing("patio", "YES: patio claimed");
///
/// assert_eq!(provider.generate("sys", "page two").await.unwrap(), "YES: pool claimed");
/// assert_eq!(provider.generate("sys", "a patio slab").await.unwrap(), "YES: patio claimed");
/// assert_eq!(provider.generate("sys", "anything").await.unwrap(), "NONE");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    latency: Option<Duration>,
    state: Arc<Mutex<MockState>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed reply for all inputs
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            latency: None,
            state: Arc::new(Mutex::new(MockState::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delay every reply, to exercise concurrency and timeouts
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reply with `response` when the user text equals `user_text`
    pub fn add_response(&mut self, user_text: impl Into<String>, response: impl Into<String>) {
        self.state()
            .exact
            .insert(user_text.into(), Scripted::Reply(response.into()));
    }

    /// Reply with `response` when the user text contains `needle`
    pub fn add_response_containing(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.state()
            .containing
            .push((needle.into(), Scripted::Reply(response.into())));
    }

    /// Fail when the user text equals `user_text`
    pub fn add_error(&mut self, user_text: impl Into<String>) {
        self.state().exact.insert(user_text.into(), Scripted::Error);
    }

    /// Fail when the user text contains `needle`
    pub fn add_error_containing(&mut self, needle: impl Into<String>) {
        self.state().containing.push((needle.into(), Scripted::Error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Get every recorded call, in arrival order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Highest number of calls that were in flight at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Reset the call history and concurrency tracking
    pub fn reset_call_count(&self) {
        self.state().calls.clear();
        self.peak_in_flight.store(0, Ordering::SeqCst);
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lookup(&self, user_text: &str) -> Scripted {
        let state = self.state();
        if let Some(scripted) = state.exact.get(user_text) {
            return scripted.clone();
        }
        state
            .containing
            .iter()
            .find(|(needle, _)| user_text.contains(needle.as_str()))
            .map(|(_, scripted)| scripted.clone())
            .unwrap_or_else(|| Scripted::Reply(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("NONE")
    }
}

#[async_trait]
impl TextGenerator for MockProvider {
    async fn generate(&self, system_prompt: &str, user_text: &str) -> Result<String, LlmError> {
        self.state().calls.push(RecordedCall {
            system_prompt: system_prompt.to_string(),
            user_text: user_text.to_string(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.lookup(user_text) {
            Scripted::Reply(reply) => Ok(reply),
            Scripted::Error => Err(LlmError::Other("Mock error".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
