//! Batch orchestration over many claims.

use crate::config::CoverageMap;
use crate::error::{CliError, Result};
use claimscan_domain::traits::{DocumentReader, ResultSink};
use claimscan_domain::{ClaimReport, OptionalCoverage, Violation};
use claimscan_llm::TextGenerator;
use claimscan_scanner::{ClaimEvaluator, Summarizer};
use std::collections::HashSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// One batch run
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Identifier of the run, used to name outputs
    pub run_id: String,

    /// Claim documents, processed in order
    pub claims: Vec<PathBuf>,

    /// Purchased coverages per claim
    pub coverages: CoverageMap,
}

/// A claim that could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimFailure {
    /// Identifier of the claim
    pub claim_id: String,

    /// What went wrong
    pub reason: String,
}

/// Everything a batch run produced
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Identifier of the run
    pub run_id: String,

    /// Reports of the claims that were evaluated
    pub reports: Vec<ClaimReport>,

    /// Violations of every evaluated claim
    pub violations: Vec<Violation>,

    /// Claims that were skipped after a failure
    pub failures: Vec<ClaimFailure>,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

/// Claim identifier of a document: its path as given
pub fn claim_id(path: &Path) -> String {
    path.display().to_string()
}

/// Purchased coverages of a claim, looked up by claim id, then by file name
pub fn purchased_for(coverages: &CoverageMap, path: &Path) -> HashSet<OptionalCoverage> {
    coverages
        .get(&claim_id(path))
        .or_else(|| {
            path.file_name()
                .and_then(|name| coverages.get(&*name.to_string_lossy()))
        })
        .cloned()
        .unwrap_or_default()
}

/// Evaluate every claim of a batch and persist the results.
///
/// Claims run one at a time. A claim that cannot be read or evaluated is
/// logged and skipped; the others still reach the sink.
///
/// # Errors
///
/// Only a sink failure fails the batch itself.
pub async fn run_batch<G, S, R, K>(
    evaluator: &ClaimEvaluator<G, S>,
    reader: &R,
    sink: &mut K,
    request: &BatchRequest,
) -> Result<BatchOutcome>
where
    G: TextGenerator + 'static,
    S: Summarizer,
    R: DocumentReader,
    R::Error: Display,
    K: ResultSink,
    CliError: From<K::Error>,
{
    let start = Instant::now();
    info!("Starting run {} with {} claims", request.run_id, request.claims.len());

    let mut reports = Vec::new();
    let mut violations = Vec::new();
    let mut failures = Vec::new();

    for path in &request.claims {
        let claim_id = claim_id(path);

        let pages = match reader.read_pages(path) {
            Ok(pages) => pages,
            Err(e) => {
                error!("Skipping {}: failed to read pages: {}", claim_id, e);
                failures.push(ClaimFailure {
                    claim_id,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let purchased = purchased_for(&request.coverages, path);
        match evaluator.evaluate(&claim_id, &pages, &purchased).await {
            Ok(evaluation) => {
                violations.extend(evaluation.violations);
                reports.push(evaluation.report);
            }
            Err(e) => {
                error!("Skipping {}: {}", claim_id, e);
                failures.push(ClaimFailure {
                    claim_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    sink.write_batch(&request.run_id, &violations, &reports)?;

    let elapsed = start.elapsed();
    info!(
        "Finished run {}: {} evaluated, {} failed, {} violations in {:.2?}",
        request.run_id,
        reports.len(),
        failures.len(),
        violations.len(),
        elapsed
    );

    Ok(BatchOutcome {
        run_id: request.run_id.clone(),
        reports,
        violations,
        failures,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimscan_llm::MockProvider;
    use claimscan_scanner::{CategoryRegistry, ListingSummarizer, ScannerConfig};
    use std::collections::HashMap;
    use std::sync::Arc;

    /// In-memory reader keyed by path
    struct MemoryReader(HashMap<PathBuf, Vec<String>>);

    impl DocumentReader for MemoryReader {
        type Error = CliError;

        fn read_pages(&self, path: &Path) -> Result<Vec<String>> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| CliError::InvalidInput(format!("no such claim: {}", path.display())))
        }
    }

    /// Sink remembering what it was given
    #[derive(Default)]
    struct MemorySink {
        batches: Vec<(String, Vec<Violation>, Vec<ClaimReport>)>,
    }

    impl ResultSink for MemorySink {
        type Error = CliError;

        fn write_batch(
            &mut self,
            run_id: &str,
            violations: &[Violation],
            reports: &[ClaimReport],
        ) -> Result<()> {
            self.batches
                .push((run_id.to_string(), violations.to_vec(), reports.to_vec()));
            Ok(())
        }
    }

    fn evaluator(provider: MockProvider) -> ClaimEvaluator<MockProvider, ListingSummarizer> {
        ClaimEvaluator::new(
            CategoryRegistry::builtin().unwrap(),
            Arc::new(provider),
            ListingSummarizer,
            ScannerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_purchased_for_matches_path_then_file_name() {
        let mut coverages = CoverageMap::new();
        coverages.insert("claims/a.txt".to_string(), HashSet::from([OptionalCoverage::PoolRepair]));
        coverages.insert("b.txt".to_string(), HashSet::from([OptionalCoverage::TemporaryLiving]));

        assert_eq!(
            purchased_for(&coverages, Path::new("claims/a.txt")),
            HashSet::from([OptionalCoverage::PoolRepair])
        );
        assert_eq!(
            purchased_for(&coverages, Path::new("other/b.txt")),
            HashSet::from([OptionalCoverage::TemporaryLiving])
        );
        assert!(purchased_for(&coverages, Path::new("c.txt")).is_empty());
    }

    #[tokio::test]
    async fn test_failed_claim_is_skipped() {
        let mut provider = MockProvider::new("NONE");
        provider.add_response_containing("pool pump", "YES: Pool pump claimed.");
        provider.add_error_containing("patio");

        let reader = MemoryReader(HashMap::from([
            (PathBuf::from("a.txt"), vec!["cover".to_string(), "pool pump".to_string()]),
            (PathBuf::from("b.txt"), vec!["patio".to_string()]),
            (PathBuf::from("c.txt"), vec!["pool pump".to_string()]),
        ]));
        let mut sink = MemorySink::default();
        let mut coverages = CoverageMap::new();
        coverages.insert("c.txt".to_string(), HashSet::from([OptionalCoverage::PoolRepair]));

        let request = BatchRequest {
            run_id: "run-1".to_string(),
            claims: vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("missing.txt"),
                PathBuf::from("c.txt"),
            ],
            coverages,
        };

        let outcome = run_batch(&evaluator(provider), &reader, &mut sink, &request)
            .await
            .unwrap();

        let failed: Vec<&str> = outcome.failures.iter().map(|f| f.claim_id.as_str()).collect();
        assert_eq!(failed, vec!["b.txt", "missing.txt"]);

        let evaluated: Vec<&str> = outcome.reports.iter().map(|r| r.claim_id.as_str()).collect();
        assert_eq!(evaluated, vec!["a.txt", "c.txt"]);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].claim_id, "a.txt");
        assert_eq!(outcome.reports[1].pages_examined, 0);

        assert_eq!(sink.batches.len(), 1);
        assert_eq!(sink.batches[0].0, "run-1");
        assert_eq!(sink.batches[0].2.len(), 2);
    }
}
