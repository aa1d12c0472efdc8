//! CLI command definitions and argument parsing.

use crate::config::parse_coverage_list;
use claimscan_domain::OptionalCoverage;
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;

/// Claimscan - Flag policy violations in insurance claim documents.
#[derive(Debug, Parser)]
#[command(name = "claimscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CLAIMSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (claim ids only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan claims and export violations and summaries
    Run(RunArgs),

    /// List classifier specs and their categories
    Categories(CategoriesArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Claim text files (default: every *.txt in the claims directory)
    pub claims: Vec<PathBuf>,

    /// Run identifier used to name outputs (default: a new UUID)
    #[arg(long)]
    pub run_id: Option<String>,

    /// Purchased coverages of a claim, e.g. `claims/a.txt=G,H`
    #[arg(long = "coverage", value_parser = parse_coverage_override)]
    pub coverages: Vec<CoverageOverride>,

    /// Maximum classification calls in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Answer every page with NONE instead of calling the model
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the categories command.
#[derive(Debug, Parser)]
pub struct CategoriesArgs {
    /// Purchased coverage codes, e.g. `G,H`; suppressed categories are marked
    #[arg(long, default_value = "")]
    pub coverage: String,
}

/// Coverages given on the command line for one claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageOverride {
    /// Claim path or file name
    pub claim: String,

    /// Purchased coverages
    pub coverages: HashSet<OptionalCoverage>,
}

/// Parse `CLAIM=CODES`.
pub fn parse_coverage_override(s: &str) -> Result<CoverageOverride, String> {
    let (claim, codes) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CLAIM=CODES, got '{}'", s))?;
    let claim = claim.trim();
    if claim.is_empty() {
        return Err(format!("missing claim in '{}'", s));
    }
    let coverages = parse_coverage_list(codes).map_err(|e| e.to_string())?;
    Ok(CoverageOverride {
        claim: claim.to_string(),
        coverages,
    })
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
