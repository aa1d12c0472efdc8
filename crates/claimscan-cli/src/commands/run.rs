//! Run command implementation.

use crate::batch::{run_batch, BatchOutcome, BatchRequest};
use crate::cli::{CoverageOverride, RunArgs};
use crate::config::{Config, CoverageMap};
use crate::error::{CliError, Result};
use crate::logging;
use crate::output::Formatter;
use crate::reader::{discover_claims, PageTextReader};
use crate::sink::CsvSink;
use claimscan_domain::NONE_MARKER;
use claimscan_llm::{MockProvider, OpenAiProvider, TextGenerator};
use claimscan_scanner::{
    CategoryRegistry, ClaimEvaluator, ListingSummarizer, LlmSummarizer, ScannerConfig, Summarizer,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let run_id = args
        .run_id
        .clone()
        .unwrap_or_else(|| Uuid::now_v7().to_string());
    let log_path = logging::init_with_file(&config.logs_dir, &run_id)?;

    let outcome = run_claims(&args, &run_id, config).await?;
    let sink = CsvSink::new(&config.outputs_dir);

    println!("{}", formatter.format_reports(&outcome.reports)?);
    println!("{}", formatter.batch_summary(&outcome));
    println!("{}", formatter.info(&format!("Violations: {}", sink.violations_path(&run_id).display())));
    println!("{}", formatter.info(&format!("Summary: {}", sink.summary_path(&run_id).display())));
    println!("{}", formatter.info(&format!("Log: {}", log_path.display())));

    if !outcome.failures.is_empty() {
        return Err(CliError::ClaimsFailed(outcome.failures.len()));
    }
    Ok(())
}

/// Evaluate the claims selected by `args` and write the CSV exports.
pub async fn run_claims(args: &RunArgs, run_id: &str, config: &Config) -> Result<BatchOutcome> {
    let claims = if args.claims.is_empty() {
        discover_claims(&config.claims_dir)?
    } else {
        args.claims.clone()
    };

    let mut scanner_config = config.scanner.clone();
    if let Some(concurrency) = args.concurrency {
        scanner_config.concurrency = concurrency;
    }

    let registry = CategoryRegistry::builtin_with(config.extra_specs()?)?;
    let request = BatchRequest {
        run_id: run_id.to_string(),
        claims,
        coverages: merge_coverages(config.coverage_map()?, &args.coverages),
    };

    if args.dry_run {
        info!("Dry run: every eligible page is answered with {}", NONE_MARKER);
        let generator = Arc::new(MockProvider::new(NONE_MARKER));
        return evaluate_batch(
            registry,
            generator,
            Box::new(ListingSummarizer),
            scanner_config,
            &request,
            config,
        )
        .await;
    }

    let generator = Arc::new(
        OpenAiProvider::from_env(
            &config.llm.endpoint,
            &config.llm.model,
            &config.llm.api_key_env,
            Duration::from_secs(config.llm.timeout_secs),
        )?
        .with_max_retries(config.llm.max_retries)
        .with_temperature(config.llm.temperature),
    );
    let summarizer: Box<dyn Summarizer> = if config.llm.summarize {
        Box::new(LlmSummarizer::new(Arc::clone(&generator), scanner_config.call_timeout()))
    } else {
        Box::new(ListingSummarizer)
    };

    evaluate_batch(registry, generator, summarizer, scanner_config, &request, config).await
}

async fn evaluate_batch<G>(
    registry: CategoryRegistry,
    generator: Arc<G>,
    summarizer: Box<dyn Summarizer>,
    scanner_config: ScannerConfig,
    request: &BatchRequest,
    config: &Config,
) -> Result<BatchOutcome>
where
    G: TextGenerator + 'static,
{
    info!("Using model {}", generator.model_name());
    let evaluator = ClaimEvaluator::new(registry, generator, summarizer, scanner_config)?;
    let mut sink = CsvSink::new(&config.outputs_dir);
    run_batch(&evaluator, &PageTextReader, &mut sink, request).await
}

/// Coverages from the command line replace those of the configuration
fn merge_coverages(mut coverages: CoverageMap, overrides: &[CoverageOverride]) -> CoverageMap {
    for o in overrides {
        coverages.insert(o.claim.clone(), o.coverages.clone());
    }
    coverages
}
