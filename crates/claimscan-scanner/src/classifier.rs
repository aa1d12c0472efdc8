//! One classification task built from a classifier spec

use crate::error::ScanError;
use crate::keywords::KeywordSet;
use crate::prompt::render_prompt;
use claimscan_domain::{ClassifierSpec, Verdict};
use claimscan_llm::TextGenerator;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Decides, for one classifier spec, whether pages describe a violation.
///
/// The keyword filter and the system prompt are computed once here and shared
/// read-only by every concurrent call.
pub struct Classifier<G>
where
    G: TextGenerator,
{
    name: String,
    category_names: Vec<String>,
    system_prompt: String,
    required: KeywordSet,
    exclusions: Arc<KeywordSet>,
    generator: Arc<G>,
    call_timeout: Duration,
}

impl<G> Classifier<G>
where
    G: TextGenerator,
{
    /// Build a classifier from a spec already restricted to enabled categories
    ///
    /// # Errors
    ///
    /// - `Config` if the spec has no categories
    /// - `MalformedPattern` if a keyword does not compile
    pub fn new(
        spec: &ClassifierSpec,
        exclusions: Arc<KeywordSet>,
        generator: Arc<G>,
        call_timeout: Duration,
    ) -> Result<Self, ScanError> {
        if spec.categories.is_empty() {
            return Err(ScanError::Config(format!(
                "classifier '{}' has no enabled categories",
                spec.name
            )));
        }

        let required = KeywordSet::new(
            spec.categories
                .iter()
                .flat_map(|category| category.keywords.iter().cloned()),
        )?;
        let system_prompt = render_prompt(&spec.template, &spec.categories);

        debug!(
            "Built classifier '{}': {} keywords, prompt length {} chars",
            spec.name,
            required.len(),
            system_prompt.len()
        );

        Ok(Self {
            name: spec.name.clone(),
            category_names: spec.categories.iter().map(|c| c.name.clone()).collect(),
            system_prompt,
            required,
            exclusions,
            generator,
            call_timeout,
        })
    }

    /// Whether a page is worth a classification call
    pub fn is_eligible(&self, page_text: &str) -> bool {
        self.required.matches(page_text) && !self.exclusions.matches(page_text)
    }

    /// Classify one page.
    ///
    /// Returns `Some(reason)` for a violation and `None` for a clean page.
    ///
    /// # Errors
    ///
    /// - `Timeout` if the call exceeds the configured timeout
    /// - `ClassificationFailure` if the call fails or the reply is malformed
    pub async fn classify(
        &self,
        page_number: usize,
        page_text: &str,
    ) -> Result<Option<String>, ScanError> {
        let reply = timeout(
            self.call_timeout,
            self.generator.generate(&self.system_prompt, page_text),
        )
        .await
        .map_err(|_| ScanError::Timeout {
            page: page_number,
            after: self.call_timeout,
        })?
        .map_err(|e| ScanError::ClassificationFailure {
            page: page_number,
            reason: e.to_string(),
        })?;

        let verdict = Verdict::parse(&reply).map_err(|reason| ScanError::ClassificationFailure {
            page: page_number,
            reason,
        })?;

        debug!("{} page {}: {:?}", self.name, page_number, verdict);

        Ok(verdict.into_reason())
    }

    /// Name of the spec this classifier was built from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the enabled categories, in declaration order
    pub fn category_names(&self) -> &[String] {
        &self.category_names
    }

    /// The rendered system prompt
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// The inclusion keywords
    pub fn required_keywords(&self) -> &KeywordSet {
        &self.required
    }
}
