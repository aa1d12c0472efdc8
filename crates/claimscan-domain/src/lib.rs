//! Claimscan Domain Layer
//!
//! This crate contains the data model shared by every other claimscan crate.
//! It has ZERO external dependencies and defines the value objects and trait
//! interfaces that the pipeline and the infrastructure crates depend upon.
//!
//! ## Key Concepts
//!
//! - **Optional coverage**: a purchasable policy add-on that disables some checks
//! - **Violation category**: a named, described, keyword-tagged rule
//! - **Classifier spec**: a prompt template plus the categories it checks
//! - **Violation**: one confirmed finding on one page of one claim
//! - **Claim report**: page tallies and a narrative for one evaluated claim
//! - **Verdict**: the parsed reply of one classification call
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure data and pure functions only
//! - Collaborators (document reading, result persistence) are traits here,
//!   implemented in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod coverage;
pub mod traits;
pub mod verdict;
pub mod violation;

// Re-exports for convenience
pub use category::{ClassifierSpec, ViolationCategory};
pub use coverage::OptionalCoverage;
pub use verdict::{Verdict, NONE_MARKER, YES_DELIMITER};
pub use violation::{ClaimReport, Violation, NO_VIOLATIONS_NARRATIVE};
