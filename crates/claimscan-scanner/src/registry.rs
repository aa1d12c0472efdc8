//! Catalog of violation categories and classifier specs

use crate::error::ScanError;
use crate::keywords::KeywordSet;
use crate::prompt::{
    DESCRIPTIONS_PLACEHOLDER, EXCLUDED_ITEMS_TEMPLATE, PAIR_CLAUSE_TEMPLATE, RCV_PROPERTY_TEMPLATE,
};
use claimscan_domain::{ClassifierSpec, OptionalCoverage, ViolationCategory};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Pages mentioning any of these are optional-coverage endorsement pages and
/// are never classified, whatever the policyholder purchased.
pub const GLOBAL_EXCLUDED_KEYWORDS: [&str; 4] =
    ["coverage f", "coverage g", "coverage h", "coverage i"];

/// The specs every run checks, in declaration order
pub fn builtin_specs() -> Vec<ClassifierSpec> {
    vec![
        ClassifierSpec::new(
            "excluded_items",
            EXCLUDED_ITEMS_TEMPLATE,
            vec![
                ViolationCategory::new("pools", "pool and pool equipment", ["pool", r"hot( |\n|)tub"])
                    .suppressed_by(OptionalCoverage::PoolRepair),
                ViolationCategory::new("patios", "patios", ["patio"]),
            ],
        ),
        ClassifierSpec::new(
            "rcv_property",
            RCV_PROPERTY_TEMPLATE,
            vec![
                ViolationCategory::new(
                    "secondary_property_rcv",
                    "when the property or risk is a secondary property",
                    ["secondary"],
                ),
                ViolationCategory::new(
                    "shed_rcv",
                    "when an unattached shed is being claimed with RCV",
                    [r"shed.*rcv", r"rcv.*shed"],
                )
                .suppressed_by(OptionalCoverage::UnattachedStructures),
            ],
        ),
        ClassifierSpec::new(
            "pair_clause",
            PAIR_CLAUSE_TEMPLATE,
            vec![ViolationCategory::new(
                "upper_cabinets",
                "upper cabinets that were unaffected and is associated with monetary value. Ignore lower cabinets.",
                [
                    r"(cabinets|cabinetry)[^a-zA-Z]*upper",
                    r"upper[^a-zA-Z]*(cabinets|cabinetry)",
                ],
            )],
        ),
    ]
}

/// Validated, immutable catalog of classifier specs.
///
/// Construction checks every keyword pattern, so a malformed pattern fails
/// at startup rather than during a claim.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    specs: Vec<ClassifierSpec>,
    exclusions: Arc<KeywordSet>,
}

impl CategoryRegistry {
    /// Registry of the builtin specs with the global exclusion list
    pub fn builtin() -> Result<Self, ScanError> {
        Self::new(builtin_specs(), GLOBAL_EXCLUDED_KEYWORDS)
    }

    /// Registry of the builtin specs followed by extra specs
    pub fn builtin_with(extra: Vec<ClassifierSpec>) -> Result<Self, ScanError> {
        let mut specs = builtin_specs();
        specs.extend(extra);
        Self::new(specs, GLOBAL_EXCLUDED_KEYWORDS)
    }

    /// Build and validate a registry
    ///
    /// # Errors
    ///
    /// - `MalformedPattern` if any keyword or exclusion fails to compile
    /// - `Config` if a spec is empty, has no description placeholder, reuses a
    ///   name, or a category is declared twice with different suppression
    pub fn new<I, S>(specs: Vec<ClassifierSpec>, exclusion_patterns: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec_names = HashSet::new();
        let mut suppression: HashMap<&str, Option<OptionalCoverage>> = HashMap::new();

        for spec in &specs {
            if !spec_names.insert(spec.name.as_str()) {
                return Err(ScanError::Config(format!("duplicate classifier spec '{}'", spec.name)));
            }
            if spec.categories.is_empty() {
                return Err(ScanError::Config(format!("classifier spec '{}' has no categories", spec.name)));
            }
            if !spec.template.contains(DESCRIPTIONS_PLACEHOLDER) {
                return Err(ScanError::Config(format!(
                    "template of classifier spec '{}' lacks {}",
                    spec.name, DESCRIPTIONS_PLACEHOLDER
                )));
            }

            for category in &spec.categories {
                if category.keywords.is_empty() {
                    return Err(ScanError::Config(format!(
                        "category '{}' has no keywords",
                        category.name
                    )));
                }
                KeywordSet::new(category.keywords.iter().cloned())?;

                match suppression.get(category.name.as_str()) {
                    Some(existing) if *existing != category.suppressing_coverage => {
                        return Err(ScanError::Config(format!(
                            "category '{}' is declared with conflicting suppressing coverages",
                            category.name
                        )));
                    }
                    Some(_) => {}
                    None => {
                        suppression.insert(category.name.as_str(), category.suppressing_coverage);
                    }
                }
            }
        }

        let exclusions = Arc::new(KeywordSet::new(exclusion_patterns)?);

        Ok(Self { specs, exclusions })
    }

    /// Every registered spec, in declaration order
    pub fn specs(&self) -> &[ClassifierSpec] {
        &self.specs
    }

    /// The global exclusion keywords, shared by every classifier
    pub fn exclusions(&self) -> Arc<KeywordSet> {
        Arc::clone(&self.exclusions)
    }

    /// Specs restricted to the categories enabled for a claim.
    ///
    /// Specs whose categories are all suppressed are left out.
    pub fn active_specs(&self, purchased: &HashSet<OptionalCoverage>) -> Vec<ClassifierSpec> {
        self.specs
            .iter()
            .filter_map(|spec| spec.restricted_to(purchased))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = CategoryRegistry::builtin().unwrap();
        let names: Vec<&str> = registry.specs().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["excluded_items", "rcv_property", "pair_clause"]);
        assert_eq!(registry.exclusions().len(), 4);
    }

    #[test]
    fn test_pool_coverage_suppresses_pools_only() {
        let registry = CategoryRegistry::builtin().unwrap();
        let purchased = HashSet::from([OptionalCoverage::PoolRepair]);
        let active = registry.active_specs(&purchased);

        assert_eq!(active.len(), 3);
        assert_eq!(active[0].category_names(), vec!["patios"]);
    }

    #[test]
    fn test_unattached_structures_suppresses_shed() {
        let registry = CategoryRegistry::builtin().unwrap();
        let purchased = HashSet::from([
            OptionalCoverage::UnattachedStructures,
            OptionalCoverage::TemporaryLiving,
        ]);
        let active = registry.active_specs(&purchased);
        assert_eq!(active[1].category_names(), vec!["secondary_property_rcv"]);
    }

    #[test]
    fn test_malformed_keyword_fails_at_construction() {
        let spec = ClassifierSpec::new(
            "broken",
            "{violation_descriptions}",
            vec![ViolationCategory::new("bad", "bad", ["[unterminated"])],
        );
        let err = CategoryRegistry::new(vec![spec], GLOBAL_EXCLUDED_KEYWORDS).unwrap_err();
        assert!(matches!(err, ScanError::MalformedPattern { .. }));
    }

    #[test]
    fn test_malformed_exclusion_fails_at_construction() {
        let err = CategoryRegistry::new(builtin_specs(), ["(oops"]).unwrap_err();
        assert!(matches!(err, ScanError::MalformedPattern { .. }));
    }

    #[test]
    fn test_duplicate_spec_name_is_rejected() {
        let mut specs = builtin_specs();
        specs.push(builtin_specs().remove(0));
        assert!(matches!(
            CategoryRegistry::new(specs, GLOBAL_EXCLUDED_KEYWORDS),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_conflicting_suppression_is_rejected() {
        let extra = ClassifierSpec::new(
            "pools_again",
            "{violation_descriptions}",
            vec![ViolationCategory::new("pools", "pools", ["pool"])],
        );
        assert!(matches!(
            CategoryRegistry::builtin_with(vec![extra]),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_consistent_reuse_is_allowed() {
        let extra = ClassifierSpec::new(
            "pools_again",
            "{violation_descriptions}",
            vec![ViolationCategory::new("pools", "pools", ["pool"])
                .suppressed_by(OptionalCoverage::PoolRepair)],
        );
        assert!(CategoryRegistry::builtin_with(vec![extra]).is_ok());
    }

    #[test]
    fn test_template_without_placeholder_is_rejected() {
        let spec = ClassifierSpec::new(
            "no_placeholder",
            "Look for pools.",
            vec![ViolationCategory::new("pools", "pools", ["pool"])],
        );
        assert!(matches!(
            CategoryRegistry::new(vec![spec], GLOBAL_EXCLUDED_KEYWORDS),
            Err(ScanError::Config(_))
        ));
    }
}
