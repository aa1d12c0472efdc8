//! Claim-level narrative of the violations found

use crate::error::ScanError;
use crate::prompt::{render_findings, SUMMARIZATION_PROMPT};
use async_trait::async_trait;
use claimscan_llm::TextGenerator;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Turns the findings of one claim into a narrative
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `(page_number, reason)` pairs, ascending by page
    async fn summarize(&self, findings: &[(usize, String)]) -> Result<String, ScanError>;
}

#[async_trait]
impl<T: Summarizer + ?Sized> Summarizer for Box<T> {
    async fn summarize(&self, findings: &[(usize, String)]) -> Result<String, ScanError> {
        (**self).summarize(findings).await
    }
}

/// Summarizer backed by a text-generation model
pub struct LlmSummarizer<G>
where
    G: TextGenerator,
{
    generator: Arc<G>,
    call_timeout: Duration,
}

impl<G> LlmSummarizer<G>
where
    G: TextGenerator,
{
    /// Create a summarizer sharing the classifiers' generator
    pub fn new(generator: Arc<G>, call_timeout: Duration) -> Self {
        Self {
            generator,
            call_timeout,
        }
    }
}

#[async_trait]
impl<G> Summarizer for LlmSummarizer<G>
where
    G: TextGenerator,
{
    async fn summarize(&self, findings: &[(usize, String)]) -> Result<String, ScanError> {
        let user_text = render_findings(findings);
        debug!("Summarizing {} findings", findings.len());

        let reply = timeout(
            self.call_timeout,
            self.generator.generate(SUMMARIZATION_PROMPT, &user_text),
        )
        .await
        .map_err(|_| {
            ScanError::Summarization(format!("timed out after {:?}", self.call_timeout))
        })?
        .map_err(|e| ScanError::Summarization(e.to_string()))?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(ScanError::Summarization("empty reply".to_string()));
        }
        Ok(reply.to_string())
    }
}

/// Deterministic summarizer listing every finding, no model call
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingSummarizer;

#[async_trait]
impl Summarizer for ListingSummarizer {
    async fn summarize(&self, findings: &[(usize, String)]) -> Result<String, ScanError> {
        let mut narrative = String::from("Possible violations flagged in the claim are:");
        for (page, reason) in findings {
            narrative.push_str(&format!("\n- page {}: {}", page, reason));
        }
        Ok(narrative)
    }
}
