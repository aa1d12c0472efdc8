//! End-to-end dry runs over claim files on disk

use claimscan_cli::cli::{parse_coverage_override, RunArgs};
use claimscan_cli::commands::run::run_claims;
use claimscan_cli::{Config, CsvSink};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn workspace() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let claims = dir.path().join("claims");
    fs::create_dir(&claims).unwrap();

    fs::write(
        claims.join("1_pool.txt"),
        "Cover sheet\x0cPool pump replacement RCV 850.00\x0c\x0cDrywall\x0c",
    )
    .unwrap();
    fs::write(claims.join("2_clean.txt"), "Drywall\x0cCarpet pad").unwrap();
    fs::write(claims.join("notes.md"), "pool").unwrap();

    let config = Config {
        claims_dir: claims,
        outputs_dir: dir.path().join("outputs"),
        logs_dir: dir.path().join("logs"),
        ..Config::default()
    };
    (dir, config)
}

fn dry_run(claims: Vec<std::path::PathBuf>) -> RunArgs {
    RunArgs {
        claims,
        run_id: None,
        coverages: Vec::new(),
        concurrency: Some(2),
        dry_run: true,
    }
}

#[tokio::test]
async fn test_dry_run_discovers_claims_and_writes_exports() {
    let (_dir, config) = workspace();

    let outcome = run_claims(&dry_run(Vec::new()), "run-a", &config).await.unwrap();

    assert!(outcome.failures.is_empty());
    assert!(outcome.violations.is_empty());
    assert_eq!(outcome.reports.len(), 2);

    let pool = &outcome.reports[0];
    assert!(pool.claim_id.ends_with("1_pool.txt"));
    assert_eq!(pool.pages_total, 4);
    assert_eq!(pool.pages_examined, 1);
    assert_eq!(pool.pages_flagged, 0);

    let clean = &outcome.reports[1];
    assert_eq!(clean.pages_total, 2);
    assert_eq!(clean.pages_examined, 0);

    let sink = CsvSink::new(&config.outputs_dir);
    let summary = fs::read_to_string(sink.summary_path("run-a")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains(",4,1,0,No violations found."));
    assert!(Path::new(&sink.violations_path("run-a")).exists());
}

#[tokio::test]
async fn test_coverage_override_suppresses_pool_check() {
    let (_dir, config) = workspace();
    let claim = config.claims_dir.join("1_pool.txt");

    let mut args = dry_run(vec![claim]);
    args.coverages = vec![parse_coverage_override("1_pool.txt=G").unwrap()];

    let outcome = run_claims(&args, "run-b", &config).await.unwrap();

    assert_eq!(outcome.reports.len(), 1);
    assert_eq!(outcome.reports[0].pages_examined, 0);
}

#[tokio::test]
async fn test_missing_claim_is_reported_as_failure() {
    let (_dir, config) = workspace();
    let args = dry_run(vec![
        config.claims_dir.join("absent.txt"),
        config.claims_dir.join("2_clean.txt"),
    ]);

    let outcome = run_claims(&args, "run-c", &config).await.unwrap();

    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].claim_id.ends_with("absent.txt"));
    assert_eq!(outcome.reports.len(), 1);
}

#[tokio::test]
async fn test_missing_claims_dir_is_an_error() {
    let (dir, mut config) = workspace();
    config.claims_dir = dir.path().join("nowhere");

    assert!(run_claims(&dry_run(Vec::new()), "run-d", &config).await.is_err());
}
