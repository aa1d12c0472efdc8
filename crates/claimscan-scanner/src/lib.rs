//! Claimscan Scanner
//!
//! The violation-detection pipeline: decides which pages of a claim deserve a
//! classification call, dispatches those calls concurrently, and merges the
//! per-page verdicts into a claim-level violation list and report.
//!
//! # Architecture
//!
//! ```text
//! pages → ClaimEvaluator → { Classifier × PageScanner } → verdicts → violations + report
//! ```
//!
//! - [`KeywordSet`]: whole-word, case-insensitive keyword pre-filter
//! - [`CategoryRegistry`]: validated catalog of classifier specs
//! - [`Classifier`]: one prompt template plus its enabled categories
//! - [`PageScanner`]: bounded concurrent fan-out over one claim's pages
//! - [`ClaimEvaluator`]: per-claim coordinator, coverage suppression, tallies
//!
//! Claims and classifiers are processed sequentially; concurrency exists only
//! inside a single scan.
//!
//! # Example Usage
//!
//! ```
//! use claimscan_llm::MockProvider;
//! use claimscan_scanner::{CategoryRegistry, ClaimEvaluator, ListingSummarizer, ScannerConfig};
//! use std::collections::HashSet;
//! use std::sync::Arc;
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let mut llm = MockProvider::new("NONE");
//! llm.add_response_containing("pool heater", "YES: A pool heater is claimed.");
//!
//! let evaluator = ClaimEvaluator::new(
//!     CategoryRegistry::builtin().unwrap(),
//!     Arc::new(llm),
//!     ListingSummarizer,
//!     ScannerConfig::default(),
//! )
//! .unwrap();
//!
//! let pages = vec!["Drywall".to_string(), "Replace pool heater".to_string()];
//! let evaluation = evaluator.evaluate("claim-1", &pages, &HashSet::new()).await.unwrap();
//!
//! assert_eq!(evaluation.violations.len(), 1);
//! assert_eq!(evaluation.violations[0].page_number, 2);
//! assert_eq!(evaluation.report.pages_examined, 1);
//! # });
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod evaluator;
mod keywords;
mod prompt;
mod registry;
mod scanner;
mod summarizer;


pub use classifier::Classifier;
pub use config::ScannerConfig;
pub use error::ScanError;
pub use evaluator::{ClaimEvaluation, ClaimEvaluator};
pub use keywords::KeywordSet;
pub use prompt::{
    render_findings, render_prompt, DELIMITER_PLACEHOLDER, DESCRIPTIONS_PLACEHOLDER,
    SUMMARIZATION_PROMPT,
};
pub use registry::{builtin_specs, CategoryRegistry, GLOBAL_EXCLUDED_KEYWORDS};
pub use scanner::{PageScanner, ScanOutcome};
pub use summarizer::{ListingSummarizer, LlmSummarizer, Summarizer};
