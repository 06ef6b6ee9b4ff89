//! Threshold sweeps.
//!
//! Re-runs mining over a range of minimum support counts (itemset counts and
//! elapsed time) and a range of minimum confidences (rule counts), and
//! tabulates the results as polars `DataFrame`s for CSV export.

use crate::error::{MiningError, Result, ResultExt};
use crate::mining::{FrequentPatternMiner, generate_rules};
use crate::transactions::TransactionMatrix;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Minimum support counts swept by default: 50 to 200 in steps of 25.
pub const DEFAULT_SUPPORT_COUNTS: [u64; 7] = [50, 75, 100, 125, 150, 175, 200];

/// Minimum confidences swept by default.
pub const DEFAULT_CONFIDENCES: [f64; 5] = [0.7, 0.75, 0.8, 0.85, 0.9];

/// Support count held fixed while sweeping confidences.
pub const DEFAULT_RULE_SUPPORT_COUNT: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportSweepRow {
    pub min_support_count: u64,
    pub frequent_itemsets: usize,
    pub seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSweepRow {
    pub min_confidence: f64,
    pub rules: usize,
}

/// Support proportion for an absolute count, rejecting counts the matrix
/// cannot reach.
fn support_for_count(matrix: &TransactionMatrix, count: u64) -> Result<f64> {
    matrix.ensure_non_empty()?;
    let total = matrix.n_transactions();
    if count == 0 || count > total as u64 {
        return Err(MiningError::InvalidInput(format!(
            "minimum support count must be in 1..={}, got {}",
            total, count
        )));
    }
    Ok(count as f64 / total as f64)
}

/// Mine once per support count, recording the itemset count and the time
/// taken.
pub fn support_sweep(
    matrix: &TransactionMatrix,
    miner: &dyn FrequentPatternMiner,
    counts: &[u64],
) -> Result<Vec<SupportSweepRow>> {
    counts
        .iter()
        .map(|&count| -> Result<SupportSweepRow> {
            let min_support = support_for_count(matrix, count)?;
            let start = Instant::now();
            let itemsets = miner.frequent_itemsets(matrix, min_support)?;
            let seconds = start.elapsed().as_secs_f64();
            debug!(
                "minsuppc {}: {} itemsets in {:.4}s",
                count,
                itemsets.len(),
                seconds
            );
            Ok(SupportSweepRow {
                min_support_count: count,
                frequent_itemsets: itemsets.len(),
                seconds,
            })
        })
        .collect()
}

/// Mine once at `support_count`, then count the rules that pass each
/// confidence threshold.
pub fn confidence_sweep(
    matrix: &TransactionMatrix,
    miner: &dyn FrequentPatternMiner,
    support_count: u64,
    confidences: &[f64],
) -> Result<Vec<ConfidenceSweepRow>> {
    if let Some(bad) = confidences.iter().find(|c| !(0.0..=1.0).contains(*c)) {
        return Err(MiningError::InvalidInput(format!(
            "confidence {} is outside [0, 1]",
            bad
        )));
    }

    let itemsets = miner.frequent_itemsets(matrix, support_for_count(matrix, support_count)?)?;
    confidences
        .iter()
        .map(|&min_confidence| -> Result<ConfidenceSweepRow> {
            let rules = generate_rules(&itemsets, min_confidence)?;
            debug!("minconf {}: {} rules", min_confidence, rules.len());
            Ok(ConfidenceSweepRow {
                min_confidence,
                rules: rules.len(),
            })
        })
        .collect()
}

/// Tabulate a support sweep.
pub fn support_frame(rows: &[SupportSweepRow]) -> Result<DataFrame> {
    let counts: Vec<u64> = rows.iter().map(|r| r.min_support_count).collect();
    let itemsets: Vec<u64> = rows.iter().map(|r| r.frequent_itemsets as u64).collect();
    let seconds: Vec<f64> = rows.iter().map(|r| r.seconds).collect();

    DataFrame::new(vec![
        Column::new("min_support_count".into(), counts),
        Column::new("frequent_itemsets".into(), itemsets),
        Column::new("seconds".into(), seconds),
    ])
    .context("Building support sweep table")
}

/// Tabulate a confidence sweep.
pub fn confidence_frame(rows: &[ConfidenceSweepRow]) -> Result<DataFrame> {
    let confidences: Vec<f64> = rows.iter().map(|r| r.min_confidence).collect();
    let rules: Vec<u64> = rows.iter().map(|r| r.rules as u64).collect();

    DataFrame::new(vec![
        Column::new("min_confidence".into(), confidences),
        Column::new("rules".into(), rules),
    ])
    .context("Building confidence sweep table")
}

/// Write a sweep table as CSV with a header row.
pub fn write_csv(frame: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path).context(format!("Creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(frame)
        .context(format!("Writing {}", path.display()))?;

    info!("Sweep table saved: {}", path.display());
    Ok(())
}
