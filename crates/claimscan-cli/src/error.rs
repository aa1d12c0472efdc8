//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Pipeline error
    #[error("Scan error: {0}")]
    Scan(#[from] claimscan_scanner::ScanError),

    /// Text-generation provider error
    #[error("LLM error: {0}")]
    Llm(#[from] claimscan_llm::LlmError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some claims of a batch could not be evaluated
    #[error("{0} claim(s) failed; see the log for details")]
    ClaimsFailed(usize),
}
