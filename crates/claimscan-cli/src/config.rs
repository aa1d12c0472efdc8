//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use claimscan_domain::{ClassifierSpec, OptionalCoverage, ViolationCategory};
use claimscan_llm::openai::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_MODEL};
use claimscan_scanner::ScannerConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Default HTTP timeout of one attempt, short enough for retries to fit in
/// the scanner's call deadline
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 20;

/// Purchased optional coverages, keyed by claim identifier.
pub type CoverageMap = HashMap<String, HashSet<OptionalCoverage>>;

/// CLI configuration.
///
/// Passed explicitly into every command; nothing here is process-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory scanned for claims when none are given
    #[serde(default = "default_claims_dir")]
    pub claims_dir: PathBuf,

    /// Directory receiving the CSV exports
    #[serde(default = "default_outputs_dir")]
    pub outputs_dir: PathBuf,

    /// Directory receiving one log file per run
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Text-generation provider settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Pipeline settings
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Coverage codes purchased per claim (path or file name)
    #[serde(default)]
    pub coverages: BTreeMap<String, Vec<String>>,

    /// Extra classifier specs checked after the builtin ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifiers: Vec<ClassifierEntry>,

    /// Display settings
    #[serde(default)]
    pub settings: Settings,
}

/// Text-generation provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// OpenAI-compatible API base URL
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Attempts per request
    pub max_retries: u32,

    /// HTTP timeout per attempt (seconds)
    pub timeout_secs: u64,

    /// Ask the model for a narrative; otherwise list the findings
    pub summarize: bool,
}

/// Global display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// A classifier spec declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierEntry {
    /// Unique spec name
    pub name: String,

    /// Prompt template with `{violation_descriptions}`
    pub template: String,

    /// Categories checked by this spec
    pub categories: Vec<CategoryEntry>,
}

/// A violation category declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Unique category name
    pub name: String,

    /// Description inserted into the prompt
    pub description: String,

    /// Trigger keyword patterns
    pub keywords: Vec<String>,

    /// Coverage code that disables this category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppressing_coverage: Option<String>,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".claimscan").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present, and the built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_toml(&fs::read_to_string(path)?)?,
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::from_toml(&fs::read_to_string(&path)?)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.scanner.validate().map_err(CliError::Config)?;
        if self.llm.max_retries == 0 {
            return Err(CliError::Config("llm.max_retries must be greater than 0".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(CliError::Config("llm.timeout_secs must be greater than 0".into()));
        }
        // The scanner deadline covers every attempt of a call
        if self.llm.max_retries > 1 && self.scanner.call_timeout_secs <= self.llm.timeout_secs {
            return Err(CliError::Config(format!(
                "scanner.call_timeout_secs ({}) must exceed llm.timeout_secs ({}) when retries are enabled",
                self.scanner.call_timeout_secs, self.llm.timeout_secs
            )));
        }
        self.coverage_map()?;
        self.extra_specs()?;
        Ok(())
    }

    /// Purchased coverages per claim, with codes parsed.
    pub fn coverage_map(&self) -> Result<CoverageMap> {
        self.coverages
            .iter()
            .map(|(claim, codes)| {
                let parsed = codes
                    .iter()
                    .map(|code| parse_coverage(code))
                    .collect::<Result<HashSet<_>>>()?;
                Ok((claim.clone(), parsed))
            })
            .collect()
    }

    /// Classifier specs declared in the file.
    pub fn extra_specs(&self) -> Result<Vec<ClassifierSpec>> {
        self.classifiers
            .iter()
            .map(|entry| {
                let categories = entry
                    .categories
                    .iter()
                    .map(|c| {
                        let category =
                            ViolationCategory::new(&c.name, &c.description, c.keywords.iter().cloned());
                        match &c.suppressing_coverage {
                            Some(code) => Ok(category.suppressed_by(parse_coverage(code)?)),
                            None => Ok(category),
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(ClassifierSpec::new(&entry.name, &entry.template, categories))
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            claims_dir: default_claims_dir(),
            outputs_dir: default_outputs_dir(),
            logs_dir: default_logs_dir(),
            llm: LlmSettings::default(),
            scanner: ScannerConfig::default(),
            coverages: BTreeMap::new(),
            classifiers: Vec::new(),
            settings: Settings::default(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.0,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: DEFAULT_ATTEMPT_TIMEOUT_SECS,
            summarize: true,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// Parse a coverage code ("G", "coverage_g", "pool_repair", ...).
pub fn parse_coverage(code: &str) -> Result<OptionalCoverage> {
    code.parse().map_err(CliError::InvalidInput)
}

/// Parse a comma-separated list of coverage codes; blank entries are ignored.
pub fn parse_coverage_list(codes: &str) -> Result<HashSet<OptionalCoverage>> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(parse_coverage)
        .collect()
}

fn default_claims_dir() -> PathBuf {
    PathBuf::from("claims")
}

fn default_outputs_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
claims_dir = "in"
outputs_dir = "out"

[llm]
model = "gpt-4o-mini"
summarize = false

[scanner]
concurrency = 4

[coverages]
"in/4_956635_Doc1.txt" = ["H", "coverage_i"]

[[classifiers]]
name = "roofing"
template = "Look for {violation_descriptions} and answer {yes_delimiter}"

[[classifiers.categories]]
name = "solar"
description = "solar panels"
keywords = ["solar"]
suppressing_coverage = "H"
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.claims_dir, PathBuf::from("claims"));
        assert_eq!(config.scanner.concurrency, 8);
        assert!(config.llm.summarize);
        assert!(config.settings.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_sample() {
        let config = Config::from_toml(SAMPLE).unwrap();
        assert_eq!(config.claims_dir, PathBuf::from("in"));
        assert_eq!(config.logs_dir, PathBuf::from("logs"));
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.endpoint, DEFAULT_ENDPOINT);
        assert!(!config.llm.summarize);
        assert_eq!(config.scanner.concurrency, 4);
        assert_eq!(config.scanner.call_timeout_secs, 60);
        assert!(config.validate().is_ok());

        let coverages = config.coverage_map().unwrap();
        assert_eq!(
            coverages["in/4_956635_Doc1.txt"],
            HashSet::from([
                OptionalCoverage::UnattachedStructures,
                OptionalCoverage::TemporaryLiving
            ])
        );

        let specs = config.extra_specs().unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(
            specs[0].categories[0].suppressing_coverage,
            Some(OptionalCoverage::UnattachedStructures)
        );
    }

    #[test]
    fn test_unknown_coverage_code_is_rejected() {
        let config = Config::from_toml("[coverages]\n\"a.txt\" = [\"Z\"]").unwrap();
        assert!(matches!(config.validate(), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_scanner_section_is_rejected() {
        let config = Config::from_toml("[scanner]\nconcurrency = 0").unwrap();
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_attempt_timeout_must_leave_room_for_retries() {
        let config = Config::from_toml("[llm]\ntimeout_secs = 60\n\n[scanner]\ncall_timeout_secs = 60").unwrap();
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        let single = Config::from_toml(
            "[llm]\ntimeout_secs = 60\nmax_retries = 1\n\n[scanner]\ncall_timeout_secs = 60",
        )
        .unwrap();
        assert!(single.validate().is_ok());

        let config = Config::default();
        assert!(config.scanner.call_timeout_secs > config.llm.timeout_secs);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::from_toml(SAMPLE).unwrap();
        let parsed = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_parse_coverage_list() {
        let parsed = parse_coverage_list("G, h,,").unwrap();
        assert_eq!(
            parsed,
            HashSet::from([OptionalCoverage::PoolRepair, OptionalCoverage::UnattachedStructures])
        );
        assert!(parse_coverage_list("").unwrap().is_empty());
        assert!(parse_coverage_list("G,nope").is_err());
    }
}
