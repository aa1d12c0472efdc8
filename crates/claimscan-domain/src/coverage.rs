//! Optional coverage module - purchasable policy add-ons

use std::fmt;

/// An optional coverage the policyholder may have purchased.
///
/// When a coverage is purchased, every violation category it suppresses is
/// skipped for that claim:
/// - Coverage F: basement contents
/// - Coverage G: pool repair and refill
/// - Coverage H: unattached structures
/// - Coverage I: temporary living expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionalCoverage {
    /// Coverage F
    BasementContents,

    /// Coverage G
    PoolRepair,

    /// Coverage H
    UnattachedStructures,

    /// Coverage I
    TemporaryLiving,
}

impl OptionalCoverage {
    /// Every coverage, in letter order
    pub const ALL: [OptionalCoverage; 4] = [
        OptionalCoverage::BasementContents,
        OptionalCoverage::PoolRepair,
        OptionalCoverage::UnattachedStructures,
        OptionalCoverage::TemporaryLiving,
    ];

    /// Get the policy letter of the coverage
    pub fn letter(&self) -> char {
        match self {
            OptionalCoverage::BasementContents => 'F',
            OptionalCoverage::PoolRepair => 'G',
            OptionalCoverage::UnattachedStructures => 'H',
            OptionalCoverage::TemporaryLiving => 'I',
        }
    }

    /// Get the snake_case identifier of the coverage
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionalCoverage::BasementContents => "basement_contents",
            OptionalCoverage::PoolRepair => "pool_repair",
            OptionalCoverage::UnattachedStructures => "unattached_structures",
            OptionalCoverage::TemporaryLiving => "temporary_living",
        }
    }

    /// Get the human-readable label used on policy declarations
    pub fn label(&self) -> &'static str {
        match self {
            OptionalCoverage::BasementContents => "Basement Contents",
            OptionalCoverage::PoolRepair => "Pool Repair and Refill",
            OptionalCoverage::UnattachedStructures => "Unattached Structure(s)",
            OptionalCoverage::TemporaryLiving => "Temporary Living Expenses",
        }
    }

    /// Parse a coverage from its letter, `coverage_<letter>` or identifier.
    ///
    /// Matching is case-insensitive and treats spaces and dashes as underscores.
    ///
    /// # Examples
    ///
    /// ```
    /// use claimscan_domain::OptionalCoverage;
    ///
    /// assert_eq!(OptionalCoverage::parse("G"), Some(OptionalCoverage::PoolRepair));
    /// assert_eq!(OptionalCoverage::parse("Coverage H"), Some(OptionalCoverage::UnattachedStructures));
    /// assert_eq!(OptionalCoverage::parse("temporary_living"), Some(OptionalCoverage::TemporaryLiving));
    /// assert_eq!(OptionalCoverage::parse("z"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        let key = normalized.strip_prefix("coverage_").unwrap_or(&normalized);

        Self::ALL.into_iter().find(|coverage| {
            key == coverage.as_str()
                || (key.len() == 1 && key.starts_with(coverage.letter().to_ascii_lowercase()))
        })
    }
}

impl fmt::Display for OptionalCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coverage {} ({})", self.letter(), self.label())
    }
}

impl std::str::FromStr for OptionalCoverage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid optional coverage: {}", s))
    }
}
