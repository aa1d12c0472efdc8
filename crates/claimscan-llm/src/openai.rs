//! OpenAI-compatible Provider Implementation
//!
//! Sends chat completion requests to any endpoint that speaks the OpenAI
//! `/chat/completions` protocol.
//!
//! # Features
//!
//! - Async HTTP communication with the chat completions API
//! - Configurable endpoint, model and temperature
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use claimscan_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new("https://api.openai.com/v1", "gpt-3.5-turbo", "sk-...")
//!     .unwrap()
//!     .with_max_retries(5);
//! ```

use crate::{LlmError, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default chat completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// OpenAI-compatible chat completions provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://api.openai.com/v1")
    /// - `model`: Model to use (e.g., "gpt-3.5-turbo")
    /// - `api_key`: Bearer token sent with every request
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new provider with an explicit per-request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: 0.0,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider whose API key is read from an environment variable
    pub fn from_env(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key_var: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = std::env::var(api_key_var)
            .map_err(|_| LlmError::Auth(format!("environment variable {} is not set", api_key_var)))?;
        Self::with_timeout(endpoint, model, api_key, timeout)
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the sampling temperature (0 is the most deterministic)
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Send one chat completion request, retrying transient failures
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API key is rejected
    /// - The model is not available
    /// - Network communication fails on every attempt
    /// - The response body is not a chat completion
    pub async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let request_body = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_text },
            ],
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.json::<ChatCompletionResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return extract_content(body);
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(LlmError::Auth(format!("HTTP {}", status)));
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(LlmError::Communication(format!("Request timed out: {}", e)));
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(
                    "Chat completion attempt {}/{} failed, retrying in {:?}",
                    attempts, self.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn extract_content(body: ChatCompletionResponse) -> Result<String, LlmError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
}

#[async_trait]
impl TextGenerator for OpenAiProvider {
    async fn generate(&self, system_prompt: &str, user_text: &str) -> Result<String, LlmError> {
        debug!(
            "Sending {} chars of page text to {}",
            user_text.len(),
            self.model
        );
        self.complete(system_prompt, user_text).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
