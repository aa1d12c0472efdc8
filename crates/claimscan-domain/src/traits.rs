//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and the
//! infrastructure around it. Implementations live in other crates.

use crate::{ClaimReport, Violation};
use std::path::Path;

/// Trait for turning a claim document into page texts
///
/// Implemented by the application layer (claimscan-cli)
pub trait DocumentReader {
    /// Error type for read operations
    type Error;

    /// Read the pages of a document in 1-based order.
    ///
    /// A page with no extractable text must be an empty string, never omitted,
    /// so that page numbers stay aligned.
    fn read_pages(&self, path: &Path) -> Result<Vec<String>, Self::Error>;
}

/// Trait for persisting the results of a batch run
///
/// Implemented by the application layer (claimscan-cli)
pub trait ResultSink {
    /// Error type for write operations
    type Error;

    /// Persist every violation and every claim report of one run
    fn write_batch(
        &mut self,
        run_id: &str,
        violations: &[Violation],
        reports: &[ClaimReport],
    ) -> Result<(), Self::Error>;
}
