//! Claimscan CLI library.
//!
//! Batch orchestration around the scanning pipeline: configuration, reading
//! claim text, CSV export, logging setup and terminal output.

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod reader;
pub mod sink;

pub use batch::{run_batch, BatchOutcome, BatchRequest, ClaimFailure};
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use reader::PageTextReader;
pub use sink::CsvSink;
