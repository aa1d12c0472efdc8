//! Violation categories and the classifier specs that group them

use crate::coverage::OptionalCoverage;
use std::collections::HashSet;

/// A named rule for one kind of policy violation.
///
/// Categories are defined once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationCategory {
    /// Unique identifier (e.g. "pools")
    pub name: String,

    /// Prose fragment inserted into the classification prompt
    pub description: String,

    /// Case-insensitive regular-expression fragments matched as whole words
    pub keywords: Vec<String>,

    /// Coverage that, when purchased, disables this category
    pub suppressing_coverage: Option<OptionalCoverage>,
}

impl ViolationCategory {
    /// Create a category that no coverage suppresses
    pub fn new<K, S>(name: impl Into<String>, description: impl Into<String>, keywords: K) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: description.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            suppressing_coverage: None,
        }
    }

    /// Mark the category as suppressed by the given coverage
    pub fn suppressed_by(mut self, coverage: OptionalCoverage) -> Self {
        self.suppressing_coverage = Some(coverage);
        self
    }

    /// Whether the category still applies given the purchased coverages
    pub fn is_enabled(&self, purchased: &HashSet<OptionalCoverage>) -> bool {
        match self.suppressing_coverage {
            Some(coverage) => !purchased.contains(&coverage),
            None => true,
        }
    }
}

/// A prompt template plus the ordered categories it checks.
///
/// Each spec becomes one classification call type. The template must contain
/// the `{violation_descriptions}` placeholder; `{yes_delimiter}` is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierSpec {
    /// Unique identifier (e.g. "excluded_items")
    pub name: String,

    /// System prompt template
    pub template: String,

    /// Categories in declaration order
    pub categories: Vec<ViolationCategory>,
}

impl ClassifierSpec {
    /// Create a new spec
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        categories: Vec<ViolationCategory>,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            categories,
        }
    }

    /// Restrict the spec to the categories still enabled for a claim.
    ///
    /// Returns `None` when every category is suppressed, since a classifier
    /// with nothing to look for is meaningless.
    pub fn restricted_to(&self, purchased: &HashSet<OptionalCoverage>) -> Option<ClassifierSpec> {
        let categories: Vec<ViolationCategory> = self
            .categories
            .iter()
            .filter(|category| category.is_enabled(purchased))
            .cloned()
            .collect();

        if categories.is_empty() {
            return None;
        }

        Some(ClassifierSpec {
            name: self.name.clone(),
            template: self.template.clone(),
            categories,
        })
    }

    /// Names of the categories, in declaration order
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}
