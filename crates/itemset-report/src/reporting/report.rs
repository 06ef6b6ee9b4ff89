use super::writer::{RuleRecord, format_float};
use crate::types::Timings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Read-only aggregate of one mining run.
///
/// Built once by [`super::ReportSummarizer`]; its [`fmt::Display`] output is
/// the info file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub min_support_count: u64,
    pub min_confidence: f64,
    pub input_file: String,
    /// Number of distinct items (matrix columns)
    pub n_items: usize,
    /// Number of transactions (matrix rows), empty ones included
    pub n_transactions: usize,
    pub longest_transaction: usize,
    /// Itemset count per size, ascending, occurring sizes only
    pub itemsets_by_size: BTreeMap<usize, usize>,
    pub total_itemsets: usize,
    /// Absent when rule generation was skipped
    pub rules: Option<RuleSummary>,
    pub timings: Timings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSummary {
    pub total_rules: usize,
    pub highest_confidence: RuleRecord,
}

static_assertions::assert_impl_all!(Report: Send, Sync);

impl Report {
    /// The info file contents. No trailing newline.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "minsuppc:{}", self.min_support_count)?;
        writeln!(f, "minconf:{}", format_float(self.min_confidence))?;
        writeln!(f, "input file:{}", self.input_file)?;
        writeln!(f, "Number of items:{}", self.n_items)?;
        writeln!(f, "Number of transactions:{}", self.n_transactions)?;
        writeln!(
            f,
            "The length of the longest transaction:{}",
            self.longest_transaction
        )?;

        for (size, count) in &self.itemsets_by_size {
            writeln!(f, "Number of frequent {}-itemsets:{}", size, count)?;
        }
        writeln!(f, "Total number of frequent itemsets:{}", self.total_itemsets)?;

        if let Some(rules) = &self.rules {
            writeln!(f, "Number of high-confidence rules:{}", rules.total_rules)?;
            writeln!(
                f,
                "The rule with the highest confidence:{}",
                rules.highest_confidence
            )?;
        }

        writeln!(
            f,
            "Time in seconds to find the frequent itemsets:{}",
            format_float(self.timings.itemsets_seconds)
        )?;
        write!(
            f,
            "Time in seconds to find the confident rules:{}",
            format_float(self.timings.rules_seconds)
        )
    }
}
