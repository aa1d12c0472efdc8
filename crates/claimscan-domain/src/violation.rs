//! Violations and claim reports - the outputs of an evaluation

use std::collections::BTreeSet;
use std::fmt;

/// Narrative carried by a report when nothing was flagged
pub const NO_VIOLATIONS_NARRATIVE: &str = "No violations found.";

/// One finding: a page of a claim that appears to claim a violating item.
///
/// Created only from a classification reply that reported a violation.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Identifier of the claim (usually its file path)
    pub claim_id: String,

    /// 1-based page number
    pub page_number: usize,

    /// Justification returned by the classifier
    pub description: String,
}

impl Violation {
    /// Create a new violation
    pub fn new(claim_id: impl Into<String>, page_number: usize, description: impl Into<String>) -> Self {
        Self {
            claim_id: claim_id.into(),
            page_number,
            description: description.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} p.{}: {}", self.claim_id, self.page_number, self.description)
    }
}

/// Aggregate tallies and narrative for one evaluated claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReport {
    /// Identifier of the claim
    pub claim_id: String,

    /// Number of pages in the claim
    pub pages_total: usize,

    /// Distinct pages sent to at least one classifier
    pub pages_examined: usize,

    /// Distinct pages carrying at least one violation.
    ///
    /// Not the number of violations: two classifiers flagging the same page
    /// count once, which keeps `pages_flagged <= pages_examined`. With a
    /// single classifier both counts are equal.
    pub pages_flagged: usize,

    /// Summary of the findings
    pub narrative_summary: String,
}

impl ClaimReport {
    /// Build a report from the violations of a claim and its examined pages
    pub fn from_findings(
        claim_id: impl Into<String>,
        pages_total: usize,
        examined: &BTreeSet<usize>,
        violations: &[Violation],
        narrative_summary: impl Into<String>,
    ) -> Self {
        let flagged: BTreeSet<usize> = violations.iter().map(|v| v.page_number).collect();
        Self {
            claim_id: claim_id.into(),
            pages_total,
            pages_examined: examined.len(),
            pages_flagged: flagged.len(),
            narrative_summary: narrative_summary.into(),
        }
    }

    /// Report for a claim with nothing flagged
    pub fn clean(claim_id: impl Into<String>, pages_total: usize, pages_examined: usize) -> Self {
        Self {
            claim_id: claim_id.into(),
            pages_total,
            pages_examined,
            pages_flagged: 0,
            narrative_summary: NO_VIOLATIONS_NARRATIVE.to_string(),
        }
    }

    /// Whether any page was flagged
    pub fn has_violations(&self) -> bool {
        self.pages_flagged > 0
    }

    /// Verify `pages_flagged <= pages_examined <= pages_total`
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.pages_examined > self.pages_total {
            return Err(format!(
                "pages_examined {} > pages_total {}",
                self.pages_examined, self.pages_total
            ));
        }
        if self.pages_flagged > self.pages_examined {
            return Err(format!(
                "pages_flagged {} > pages_examined {}",
                self.pages_flagged, self.pages_examined
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_report() {
        let report = ClaimReport::clean("claims/a.txt", 0, 0);
        assert_eq!(report.narrative_summary, NO_VIOLATIONS_NARRATIVE);
        assert!(!report.has_violations());
        assert!(report.check_invariants().is_ok());
    }

    #[test]
    fn test_from_findings_counts_distinct_flagged_pages() {
        let examined = BTreeSet::from([2, 5]);
        let violations = vec![
            Violation::new("c", 2, "pool"),
            Violation::new("c", 2, "shed with RCV"),
            Violation::new("c", 5, "patio"),
        ];
        let report = ClaimReport::from_findings("c", 7, &examined, &violations, "summary");

        assert_eq!(report.pages_total, 7);
        assert_eq!(report.pages_examined, 2);
        assert_eq!(report.pages_flagged, 2);
        assert!(report.check_invariants().is_ok());
    }

    #[test]
    fn test_invariant_violations_are_detected() {
        let mut report = ClaimReport::clean("c", 3, 4);
        assert!(report.check_invariants().is_err());

        report.pages_examined = 1;
        report.pages_flagged = 2;
        assert!(report.check_invariants().is_err());
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::new("claims/7.txt", 140, "Pool heater claimed.");
        assert_eq!(violation.to_string(), "claims/7.txt p.140: Pool heater claimed.");
    }
}
