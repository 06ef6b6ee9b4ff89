//! Integration tests for the itemset reporting pipeline.
//!
//! These tests run complete mining passes over the fixture transaction files
//! and check the files written to disk.

use itemset_report::reporting::{parse_itemsets, parse_rules};
use itemset_report::{
    MiningConfig, MiningError, MiningPipeline, MiningStage, ProgressUpdate, ReportSummarizer,
    read_transactions,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config(input: &str, minsuppc: i64, minconf: f64, output_dir: &Path) -> MiningConfig {
    MiningConfig::builder()
        .input_file(fixtures_path().join(input))
        .min_support_count(minsuppc)
        .min_confidence(minconf)
        .output_dir(output_dir)
        .build()
        .unwrap()
}

fn run(config: MiningConfig) -> itemset_report::MiningResult<itemset_report::MiningOutcome> {
    MiningPipeline::builder().config(config).build()?.run()
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

// ============================================================================
// End-to-End Runs
// ============================================================================

#[test]
fn test_basket_support_counts() {
    let out = TempDir::new().unwrap();
    run(config("basket.txt", 2, 0.7, out.path())).unwrap();

    let records = parse_itemsets(&read(out.path(), "items01.txt")).unwrap();
    let pairs: Vec<(Vec<u32>, u64)> = records
        .iter()
        .map(|r| (r.items.items().to_vec(), r.support_count))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (vec![1], 3),
            (vec![2], 3),
            (vec![3], 2),
            (vec![1, 2], 2),
            (vec![2, 3], 2),
        ]
    );
}

#[test]
fn test_all_three_files_written() {
    let out = TempDir::new().unwrap();
    let outcome = run(config("gaps.txt", 3, 0.7, out.path())).unwrap();

    assert_eq!(outcome.written.len(), 3);
    assert_eq!(read(out.path(), "items01.txt"), "10|4\n20|3\n10 20|3\n");
    assert_eq!(
        read(out.path(), "rules01.txt"),
        "10|20|3|0.75\n20|10|3|1.0\n"
    );

    let info = read(out.path(), "info01.txt");
    let lines: Vec<&str> = info.lines().collect();
    assert_eq!(lines[0], "minsuppc:3");
    assert_eq!(lines[1], "minconf:0.7");
    assert!(lines[2].starts_with("input file:") && lines[2].ends_with("gaps.txt"));
    assert_eq!(lines[3], "Number of items:4");
    // Indices 1 and 3 never appear but still count as transactions
    assert_eq!(lines[4], "Number of transactions:6");
    assert_eq!(lines[5], "The length of the longest transaction:4");
    assert_eq!(lines[6], "Number of frequent 1-itemsets:2");
    assert_eq!(lines[7], "Number of frequent 2-itemsets:1");
    assert_eq!(lines[8], "Total number of frequent itemsets:3");
    assert_eq!(lines[9], "Number of high-confidence rules:2");
    assert_eq!(lines[10], "The rule with the highest confidence:20|10|3|1.0");
    assert!(lines[11].starts_with("Time in seconds to find the frequent itemsets:"));
    assert!(lines[12].starts_with("Time in seconds to find the confident rules:"));
    assert_eq!(lines.len(), 13);
}

#[test]
fn test_rules_file_round_trip() {
    let out = TempDir::new().unwrap();
    let outcome = run(config("basket.txt", 1, 0.5, out.path())).unwrap();
    let rules = outcome.rules.unwrap();

    let parsed = parse_rules(&read(out.path(), "rules01.txt")).unwrap();
    assert_eq!(parsed.len(), rules.len());
    for (record, rule) in parsed.iter().zip(&rules) {
        assert_eq!(record.antecedent, rule.antecedent);
        assert_eq!(record.consequent, rule.consequent);
        assert_eq!(record.confidence, rule.confidence);
        assert_eq!(
            record.support_count,
            ReportSummarizer::support_count(rule, 4).unwrap()
        );
    }
}

#[test]
fn test_custom_file_names_and_nested_dir() {
    let out = TempDir::new().unwrap();
    let nested = out.path().join("runs").join("first");
    let config = MiningConfig::builder()
        .input_file(fixtures_path().join("basket.txt"))
        .min_support_count(2)
        .min_confidence(0.5)
        .output_dir(&nested)
        .items_file("items.txt")
        .rules_file("rules.txt")
        .info_file("info.txt")
        .build()
        .unwrap();
    run(config).unwrap();

    for name in ["items.txt", "rules.txt", "info.txt"] {
        assert!(nested.join(name).exists(), "{} should exist", name);
    }
}

#[test]
fn test_max_len_limits_itemsets() {
    let out = TempDir::new().unwrap();
    let config = MiningConfig::builder()
        .input_file(fixtures_path().join("basket.txt"))
        .min_support_count(1)
        .min_confidence(-1.0)
        .max_len(1)
        .output_dir(out.path())
        .build()
        .unwrap();
    let outcome = run(config).unwrap();
    assert!(outcome.itemsets.iter().all(|f| f.len() == 1));
    assert_eq!(outcome.report.total_itemsets, 3);
}

// ============================================================================
// Skipped and Failing Runs
// ============================================================================

#[test]
fn test_negative_confidence_skips_rules() {
    let out = TempDir::new().unwrap();
    run(config("basket.txt", 2, -1.0, out.path())).unwrap();

    assert!(out.path().join("items01.txt").exists());
    assert!(!out.path().join("rules01.txt").exists());

    let info = read(out.path(), "info01.txt");
    assert!(info.contains("minconf:-1.0\n"));
    assert!(!info.contains("high-confidence rules"));
    assert_eq!(info.lines().count(), 11);
}

#[test]
fn test_no_confident_rules_writes_nothing() {
    let out = TempDir::new().unwrap();
    let err = run(config("basket.txt", 3, 0.9, out.path())).unwrap_err();

    assert_eq!(err.error_code(), "EMPTY_INPUT");
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_support_count_above_total() {
    let out = TempDir::new().unwrap();
    let err = run(config("basket.txt", 5, 0.5, out.path())).unwrap_err();
    assert!(matches!(err, MiningError::InvalidInput(_)));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_non_positive_support_count_rejected() {
    let result = MiningConfig::builder()
        .input_file("basket.txt")
        .min_support_count(0)
        .build();
    assert!(result.is_err());
    let result = MiningConfig::builder()
        .input_file("basket.txt")
        .min_support_count(-4)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_malformed_line_reported() {
    let err = read_transactions(fixtures_path().join("malformed.txt")).unwrap_err();
    match err {
        MiningError::MalformedLine { line, content } => {
            assert_eq!(line, 5);
            assert_eq!(content, "1 two");
        }
        other => panic!("expected MalformedLine, got {:?}", other),
    }
}

#[test]
fn test_missing_input_file() {
    let out = TempDir::new().unwrap();
    let err = run(config("does_not_exist.txt", 1, 0.5, out.path())).unwrap_err();
    assert_eq!(err.error_code(), "IO_ERROR");
    assert!(!err.is_input_error());
}

// ============================================================================
// Progress Reporting
// ============================================================================

#[test]
fn test_progress_stages_reported() {
    let out = TempDir::new().unwrap();
    let updates: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);

    MiningPipeline::builder()
        .config(config("basket.txt", 2, 0.5, out.path()))
        .on_progress(move |update| sink.lock().unwrap().push(update))
        .build()
        .unwrap()
        .run()
        .unwrap();

    let updates = updates.lock().unwrap();
    let stages: Vec<MiningStage> = updates.iter().map(|u| u.stage).collect();
    assert_eq!(stages.first(), Some(&MiningStage::Reading));
    assert!(stages.contains(&MiningStage::Writing));
    assert_eq!(stages.last(), Some(&MiningStage::Complete));
    assert!(
        updates
            .windows(2)
            .all(|pair| pair[0].progress <= pair[1].progress)
    );
}
