//! Configuration for the scanning pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Maximum classification calls in flight within one scan
    pub concurrency: usize,

    /// Maximum time for a single model call (seconds)
    pub call_timeout_secs: u64,
}

impl ScannerConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ScannerConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            concurrency: 8,
            call_timeout_secs: 60,
        }
    }
}

impl ScannerConfig {
    /// Aggressive preset: more parallel calls, shorter timeouts
    pub fn aggressive() -> Self {
        Self {
            concurrency: 16,
            call_timeout_secs: 30,
        }
    }

    /// Lenient preset: fewer parallel calls, longer timeouts for rate-limited keys
    pub fn lenient() -> Self {
        Self {
            concurrency: 2,
            call_timeout_secs: 180,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
