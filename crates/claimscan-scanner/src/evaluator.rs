//! Claim-level coordination of classifiers and scans

use crate::classifier::Classifier;
use crate::config::ScannerConfig;
use crate::error::ScanError;
use crate::registry::CategoryRegistry;
use crate::scanner::PageScanner;
use crate::summarizer::Summarizer;
use claimscan_domain::{ClaimReport, ClassifierSpec, OptionalCoverage, Violation};
use claimscan_llm::TextGenerator;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Violations and report of one evaluated claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimEvaluation {
    /// Findings ascending by page; ties keep spec declaration order
    pub violations: Vec<Violation>,

    /// Page tallies and narrative
    pub report: ClaimReport,
}

/// Evaluates claims against every applicable classifier spec
pub struct ClaimEvaluator<G, S>
where
    G: TextGenerator,
    S: Summarizer,
{
    registry: CategoryRegistry,
    generator: Arc<G>,
    summarizer: S,
    config: ScannerConfig,
}

impl<G, S> ClaimEvaluator<G, S>
where
    G: TextGenerator + 'static,
    S: Summarizer,
{
    /// Create a new evaluator
    ///
    /// # Errors
    ///
    /// Returns `Config` if the scanner configuration is invalid.
    pub fn new(
        registry: CategoryRegistry,
        generator: Arc<G>,
        summarizer: S,
        config: ScannerConfig,
    ) -> Result<Self, ScanError> {
        config.validate().map_err(ScanError::Config)?;
        Ok(Self {
            registry,
            generator,
            summarizer,
            config,
        })
    }

    /// The registry this evaluator checks against
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Specs that still have enabled categories for a claim
    pub fn active_specs(&self, purchased: &HashSet<OptionalCoverage>) -> Vec<ClassifierSpec> {
        self.registry.active_specs(purchased)
    }

    /// Build one classifier per active spec, in declaration order
    pub fn build_classifiers(
        &self,
        purchased: &HashSet<OptionalCoverage>,
    ) -> Result<Vec<Arc<Classifier<G>>>, ScanError> {
        self.active_specs(purchased)
            .iter()
            .map(|spec| {
                Classifier::new(
                    spec,
                    self.registry.exclusions(),
                    Arc::clone(&self.generator),
                    self.config.call_timeout(),
                )
                .map(Arc::new)
            })
            .collect()
    }

    /// Evaluate one claim.
    ///
    /// Classifiers run one after another over the same pages. A claim with no
    /// applicable checks yields a clean evaluation with nothing examined.
    ///
    /// # Errors
    ///
    /// Any classification or summarization failure aborts the claim; no
    /// partial report is produced.
    pub async fn evaluate(
        &self,
        claim_id: &str,
        pages: &[String],
        purchased: &HashSet<OptionalCoverage>,
    ) -> Result<ClaimEvaluation, ScanError> {
        let start = Instant::now();
        info!("Evaluating {} ({} pages)", claim_id, pages.len());

        let classifiers = self.build_classifiers(purchased)?;
        if classifiers.is_empty() {
            debug!("{}: every category is suppressed, nothing to check", claim_id);
        }

        let scanner = PageScanner::new(self.config.concurrency);
        let mut examined = BTreeSet::new();
        let mut violations = Vec::new();

        for classifier in classifiers {
            let outcome = scanner.scan(pages, Arc::clone(&classifier)).await?;
            examined.extend(outcome.examined);
            violations.extend(
                outcome
                    .findings
                    .into_iter()
                    .map(|(page, reason)| Violation::new(claim_id, page, reason)),
            );
        }

        // Stable: equal pages keep the order their specs were declared in
        violations.sort_by_key(|v| v.page_number);

        let report = if violations.is_empty() {
            ClaimReport::clean(claim_id, pages.len(), examined.len())
        } else {
            let findings: Vec<(usize, String)> = violations
                .iter()
                .map(|v| (v.page_number, v.description.clone()))
                .collect();
            let narrative = self.summarizer.summarize(&findings).await?;
            ClaimReport::from_findings(claim_id, pages.len(), &examined, &violations, narrative)
        };

        info!(
            "Finished {}. Processed {} pages out of {}, {} violations in {:.2?}",
            claim_id,
            report.pages_examined,
            report.pages_total,
            violations.len(),
            start.elapsed()
        );

        Ok(ClaimEvaluation { violations, report })
    }
}
