//! Output formatting for the CLI.

use crate::batch::BatchOutcome;
use crate::config::OutputFormat;
use crate::error::Result;
use claimscan_domain::{ClaimReport, ClassifierSpec, OptionalCoverage};
use colored::*;
use std::collections::HashSet;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the claim reports of a batch.
    pub fn format_reports(&self, reports: &[ClaimReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_reports_json(reports),
            OutputFormat::Table => self.format_reports_table(reports),
            OutputFormat::Quiet => Ok(self.format_reports_quiet(reports)),
        }
    }

    fn format_reports_json(&self, reports: &[ClaimReport]) -> Result<String> {
        let json_reports: Vec<serde_json::Value> = reports
            .iter()
            .map(|r| {
                serde_json::json!({
                    "filepath": r.claim_id,
                    "pages_total": r.pages_total,
                    "pages_processed": r.pages_examined,
                    "pages_flagged": r.pages_flagged,
                    "summary": r.narrative_summary,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_reports)?)
    }

    fn format_reports_table(&self, reports: &[ClaimReport]) -> Result<String> {
        if reports.is_empty() {
            return Ok(self.colorize("No claims evaluated.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Claim", "Pages", "Examined", "Flagged"]);

        for report in reports {
            let flagged = if report.has_violations() {
                self.colorize(&report.pages_flagged.to_string(), "red")
            } else {
                report.pages_flagged.to_string()
            };
            builder.push_record([
                report.claim_id.clone(),
                report.pages_total.to_string(),
                report.pages_examined.to_string(),
                flagged,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Quiet mode lists the claims that have violations.
    fn format_reports_quiet(&self, reports: &[ClaimReport]) -> String {
        reports
            .iter()
            .filter(|r| r.has_violations())
            .map(|r| r.claim_id.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format the closing lines of a batch run.
    pub fn batch_summary(&self, outcome: &BatchOutcome) -> String {
        let mut lines = vec![self.success(&format!(
            "Run {}: {} claim(s) evaluated, {} violation(s) in {:.2?}",
            outcome.run_id,
            outcome.reports.len(),
            outcome.violations.len(),
            outcome.elapsed
        ))];
        for failure in &outcome.failures {
            lines.push(self.error(&format!("{}: {}", failure.claim_id, failure.reason)));
        }
        lines.join("\n")
    }

    /// Format the classifier specs and their categories.
    pub fn format_categories(
        &self,
        specs: &[ClassifierSpec],
        purchased: &HashSet<OptionalCoverage>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json_specs: Vec<serde_json::Value> = specs
                    .iter()
                    .map(|spec| {
                        serde_json::json!({
                            "name": spec.name,
                            "categories": spec.categories.iter().map(|c| serde_json::json!({
                                "name": c.name,
                                "description": c.description,
                                "keywords": c.keywords,
                                "suppressing_coverage": c.suppressing_coverage.map(|cov| cov.as_str()),
                                "enabled": c.is_enabled(purchased),
                            })).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json_specs)?)
            }
            OutputFormat::Quiet => Ok(specs
                .iter()
                .flat_map(|spec| spec.categories.iter())
                .filter(|c| c.is_enabled(purchased))
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Spec", "Category", "Keywords", "Suppressed by", "Status"]);

                for spec in specs {
                    for category in &spec.categories {
                        let suppressed_by = category
                            .suppressing_coverage
                            .map(|cov| cov.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        let status = if category.is_enabled(purchased) {
                            self.colorize("checked", "green")
                        } else {
                            self.colorize("suppressed", "yellow")
                        };
                        builder.push_record([
                            spec.name.clone(),
                            category.name.clone(),
                            category.keywords.join(", "),
                            suppressed_by,
                            status,
                        ]);
                    }
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ClaimFailure;
    use claimscan_scanner::builtin_specs;
    use std::time::Duration;

    fn reports() -> Vec<ClaimReport> {
        vec![
            ClaimReport {
                claim_id: "claims/a.txt".to_string(),
                pages_total: 12,
                pages_examined: 3,
                pages_flagged: 1,
                narrative_summary: "Possible violations flagged in the claim are:".to_string(),
            },
            ClaimReport::clean("claims/b.txt", 4, 0),
        ]
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_reports(&reports()).unwrap();
        assert!(output.contains("Examined"));
        assert!(output.contains("claims/a.txt"));
    }

    #[test]
    fn test_json_format_uses_export_columns() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_reports(&reports()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["pages_processed"], 3);
        assert_eq!(parsed[1]["summary"], "No violations found.");
    }

    #[test]
    fn test_quiet_format_lists_flagged_claims() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_reports(&reports()).unwrap(), "claims/a.txt");
    }

    #[test]
    fn test_empty_reports() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_reports(&[]).unwrap();
        assert!(output.contains("No claims evaluated"));
    }

    #[test]
    fn test_categories_mark_suppressed() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let purchased = HashSet::from([OptionalCoverage::PoolRepair]);
        let output = formatter.format_categories(&builtin_specs(), &purchased).unwrap();
        assert!(output.contains("suppressed"));
        assert!(output.contains("upper_cabinets"));

        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .format_categories(&builtin_specs(), &purchased)
            .unwrap();
        assert!(!quiet.lines().any(|l| l == "pools"));
        assert!(quiet.lines().any(|l| l == "patios"));
    }

    #[test]
    fn test_batch_summary_lists_failures() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let outcome = BatchOutcome {
            run_id: "r1".to_string(),
            reports: reports(),
            violations: Vec::new(),
            failures: vec![ClaimFailure {
                claim_id: "claims/c.txt".to_string(),
                reason: "Classification failed on page 2: timeout".to_string(),
            }],
            elapsed: Duration::from_millis(1500),
        };
        let summary = formatter.batch_summary(&outcome);
        assert!(summary.starts_with("✓ Run r1: 2 claim(s) evaluated"));
        assert!(summary.contains("✗ claims/c.txt: Classification failed"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
