//! CSV export of batch results.

use crate::error::{CliError, Result};
use claimscan_domain::traits::ResultSink;
use claimscan_domain::{ClaimReport, Violation};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `<run_id>_violations.csv` and `<run_id>_summary.csv`
#[derive(Debug, Clone)]
pub struct CsvSink {
    outputs_dir: PathBuf,
}

impl CsvSink {
    /// Create a sink writing into `outputs_dir` (created on first write)
    pub fn new(outputs_dir: impl Into<PathBuf>) -> Self {
        Self {
            outputs_dir: outputs_dir.into(),
        }
    }

    /// Path of the violations export for a run
    pub fn violations_path(&self, run_id: &str) -> PathBuf {
        self.outputs_dir.join(format!("{}_violations.csv", run_id))
    }

    /// Path of the claim summary export for a run
    pub fn summary_path(&self, run_id: &str) -> PathBuf {
        self.outputs_dir.join(format!("{}_summary.csv", run_id))
    }

    fn write_violations(path: &Path, violations: &[Violation]) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["filepath", "page_no", "issue_desc"])?;
        for violation in violations {
            let page_no = violation.page_number.to_string();
            writer.write_record([
                violation.claim_id.as_str(),
                page_no.as_str(),
                violation.description.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_summary(path: &Path, reports: &[ClaimReport]) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "filepath",
            "pages_total",
            "pages_processed",
            "pages_flagged",
            "summary",
        ])?;
        for report in reports {
            let counts = [
                report.pages_total.to_string(),
                report.pages_examined.to_string(),
                report.pages_flagged.to_string(),
            ];
            writer.write_record([
                report.claim_id.as_str(),
                counts[0].as_str(),
                counts[1].as_str(),
                counts[2].as_str(),
                report.narrative_summary.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ResultSink for CsvSink {
    type Error = CliError;

    fn write_batch(
        &mut self,
        run_id: &str,
        violations: &[Violation],
        reports: &[ClaimReport],
    ) -> Result<()> {
        fs::create_dir_all(&self.outputs_dir)?;

        let violations_path = self.violations_path(run_id);
        Self::write_violations(&violations_path, violations)?;
        info!("Wrote {} violations to {}", violations.len(), violations_path.display());

        let summary_path = self.summary_path(run_id);
        Self::write_summary(&summary_path, reports)?;
        info!("Wrote {} claim reports to {}", reports.len(), summary_path.display());

        Ok(())
    }
}
