//! Concurrent dispatch of one classifier over a claim's pages

use crate::classifier::Classifier;
use crate::error::ScanError;
use claimscan_llm::TextGenerator;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Result of scanning one claim with one classifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// `(page_number, reason)` pairs, ascending by page number
    pub findings: Vec<(usize, String)>,

    /// 1-based numbers of the pages that were sent to the classifier
    pub examined: BTreeSet<usize>,
}

/// Runs a classifier over pages with bounded parallelism
#[derive(Debug, Clone)]
pub struct PageScanner {
    concurrency: usize,
}

impl PageScanner {
    /// Create a scanner allowing at most `concurrency` calls in flight
    /// (at least one)
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Maximum calls in flight
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scan the pages of one claim.
    ///
    /// Eligible pages are classified concurrently; the outcome does not depend
    /// on completion order. The first failure aborts the remaining calls and
    /// is returned. Dropping the returned future aborts every queued call.
    pub async fn scan<G>(
        &self,
        pages: &[String],
        classifier: Arc<Classifier<G>>,
    ) -> Result<ScanOutcome, ScanError>
    where
        G: TextGenerator + 'static,
    {
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut examined = BTreeSet::new();

        for (index, text) in pages.iter().enumerate() {
            let page_number = index + 1;
            if !classifier.is_eligible(text) {
                continue;
            }
            examined.insert(page_number);

            let permits = Arc::clone(&permits);
            let classifier = Arc::clone(&classifier);
            let text = text.clone();
            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| ScanError::Task(e.to_string()))?;
                let reason = classifier.classify(page_number, &text).await?;
                Ok::<_, ScanError>((page_number, reason))
            });
        }

        debug!(
            "{}: {} of {} pages eligible",
            classifier.name(),
            examined.len(),
            pages.len()
        );

        let mut findings = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (page_number, reason) = joined.map_err(|e| ScanError::Task(e.to_string()))??;
            if let Some(reason) = reason {
                info!("{} flagged page {}: {}", classifier.name(), page_number, reason);
                findings.push((page_number, reason));
            }
        }

        findings.sort_by_key(|(page_number, _)| *page_number);

        Ok(ScanOutcome { findings, examined })
    }
}

impl Default for PageScanner {
    fn default() -> Self {
        Self::new(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::KeywordSet;
    use claimscan_domain::{ClassifierSpec, ViolationCategory};
    use claimscan_llm::MockProvider;
    use std::time::Duration;

    fn classifier(provider: MockProvider) -> Arc<Classifier<MockProvider>> {
        let spec = ClassifierSpec::new(
            "excluded_items",
            "{violation_descriptions}",
            vec![ViolationCategory::new("pools", "pool and pool equipment", ["pool"])],
        );
        let exclusions = Arc::new(KeywordSet::new(["coverage g"]).unwrap());
        Arc::new(
            Classifier::new(&spec, exclusions, Arc::new(provider), Duration::from_secs(5)).unwrap(),
        )
    }

    fn pages(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("page {} pool item", i)).collect()
    }

    #[tokio::test]
    async fn test_ineligible_pages_are_not_examined() {
        let provider = MockProvider::new("NONE");
        let pages = vec![
            "drywall".to_string(),
            "pool heater".to_string(),
            "Coverage G pool".to_string(),
            String::new(),
        ];

        let outcome = PageScanner::new(4)
            .scan(&pages, classifier(provider.clone()))
            .await
            .unwrap();

        assert_eq!(outcome.examined, BTreeSet::from([2]));
        assert!(outcome.findings.is_empty());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_findings_sorted_regardless_of_completion_order() {
        let mut provider = MockProvider::new("NONE").with_latency(Duration::from_millis(5));
        for i in [7, 2, 5] {
            provider.add_response(format!("page {} pool item", i), format!("YES: page {}", i));
        }

        let outcome = PageScanner::new(3)
            .scan(&pages(8), classifier(provider))
            .await
            .unwrap();

        let numbers: Vec<usize> = outcome.findings.iter().map(|(p, _)| *p).collect();
        assert_eq!(numbers, vec![2, 5, 7]);
        assert_eq!(outcome.findings[0].1, "page 2");
        assert_eq!(outcome.examined.len(), 8);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let provider = MockProvider::new("NONE").with_latency(Duration::from_millis(20));

        PageScanner::new(3)
            .scan(&pages(12), classifier(provider.clone()))
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 12);
        assert!(provider.peak_concurrency() <= 3);
        assert!(provider.peak_concurrency() >= 2);
    }

    #[tokio::test]
    async fn test_failure_aborts_scan() {
        let mut provider = MockProvider::new("NONE");
        provider.add_error("page 3 pool item");

        let err = PageScanner::new(2)
            .scan(&pages(5), classifier(provider))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::ClassificationFailure { page: 3, .. }));
    }

    #[tokio::test]
    async fn test_dropped_scan_submits_no_new_calls() {
        let provider = MockProvider::new("NONE").with_latency(Duration::from_millis(50));
        let scanner = PageScanner::new(1);
        let pages = pages(10);

        let cancelled = tokio::time::timeout(
            Duration::from_millis(75),
            scanner.scan(&pages, classifier(provider.clone())),
        )
        .await;
        assert!(cancelled.is_err());

        let started = provider.call_count();
        assert!(started >= 1 && started < 10);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(provider.call_count(), started);
        assert_eq!(provider.peak_concurrency(), 1);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let scanner = PageScanner::new(0);
        assert_eq!(scanner.concurrency(), 1);
        let outcome = scanner
            .scan(&pages(2), classifier(MockProvider::new("YES: found")))
            .await
            .unwrap();
        assert_eq!(outcome.findings.len(), 2);
    }
}
