//! Support counts, size histogram and extremal rows of a mined result set.

use super::report::{Report, RuleSummary};
use super::writer::RuleRecord;
use crate::config::MiningConfig;
use crate::error::{MiningError, Result};
use crate::transactions::TransactionMatrix;
use crate::types::{AssociationRule, FrequentItemset, HasSupport, Timings};
use chrono::Local;
use std::collections::BTreeMap;
use tracing::debug;

/// Builds the run [`Report`] from an immutable snapshot of mining results.
///
/// The run parameters echoed in the report are fixed at construction.
#[derive(Debug, Clone)]
pub struct ReportSummarizer {
    min_support_count: u64,
    min_confidence: f64,
    input_file: String,
}

impl ReportSummarizer {
    pub fn new(config: &MiningConfig) -> Self {
        Self::from_parts(
            config.min_support_count,
            config.min_confidence,
            config.input_file.display().to_string(),
        )
    }

    pub fn from_parts(
        min_support_count: u64,
        min_confidence: f64,
        input_file: impl Into<String>,
    ) -> Self {
        Self {
            min_support_count,
            min_confidence,
            input_file: input_file.into(),
        }
    }

    /// Absolute number of supporting transactions:
    /// `floor(support * total_transactions)`.
    ///
    /// Truncates rather than rounds, and uses exactly the total given. The
    /// float product can land just below an integer (`15/22` of 22 gives
    /// 14), and that truncated value is the one reported.
    pub fn support_count<S: HasSupport + ?Sized>(
        entry: &S,
        total_transactions: usize,
    ) -> Result<u64> {
        if total_transactions == 0 {
            return Err(MiningError::InvalidInput(
                "total transactions must be positive".to_string(),
            ));
        }

        let support = entry.support();
        if !(0.0..=1.0).contains(&support) {
            return Err(MiningError::InvalidInput(format!(
                "support {} is outside [0, 1]",
                support
            )));
        }

        Ok((support * total_transactions as f64).floor() as u64)
    }

    /// Cardinality of the largest transaction (maximum row sum).
    pub fn longest_transaction(matrix: &TransactionMatrix) -> Result<usize> {
        matrix
            .row_sums()?
            .into_iter()
            .max()
            .ok_or_else(|| MiningError::EmptyInput("transaction matrix has no rows".to_string()))
    }

    /// Count of itemsets per size. Only sizes that occur are present.
    pub fn itemset_histogram(itemsets: &[FrequentItemset]) -> BTreeMap<usize, usize> {
        let mut histogram = BTreeMap::new();
        for itemset in itemsets {
            *histogram.entry(itemset.len()).or_insert(0) += 1;
        }
        histogram
    }

    /// The rule of maximum confidence; the earliest one wins ties.
    pub fn highest_confidence_rule(rules: &[AssociationRule]) -> Result<&AssociationRule> {
        let mut best: Option<&AssociationRule> = None;
        for rule in rules {
            match best {
                Some(current) if rule.confidence <= current.confidence => {}
                _ => best = Some(rule),
            }
        }
        best.ok_or_else(|| MiningError::EmptyInput("no rules to choose from".to_string()))
    }

    /// Compute every aggregate of the report.
    ///
    /// `rules` is `None` when rule generation was skipped; the rule section
    /// is then left out of the report. An empty rule list is an error.
    pub fn summarize(
        &self,
        matrix: &TransactionMatrix,
        itemsets: &[FrequentItemset],
        rules: Option<&[AssociationRule]>,
        timings: Timings,
    ) -> Result<Report> {
        let total = matrix.n_transactions();
        let longest_transaction = Self::longest_transaction(matrix)?;
        let itemsets_by_size = Self::itemset_histogram(itemsets);

        let rules = match rules {
            Some(rules) => {
                let best = Self::highest_confidence_rule(rules)?;
                Some(RuleSummary {
                    total_rules: rules.len(),
                    highest_confidence: RuleRecord::from_rule(best, total)?,
                })
            }
            None => None,
        };

        debug!(
            "Summarized {} itemsets over {} size buckets",
            itemsets.len(),
            itemsets_by_size.len()
        );

        Ok(Report {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            min_support_count: self.min_support_count,
            min_confidence: self.min_confidence,
            input_file: self.input_file.clone(),
            n_items: matrix.n_items(),
            n_transactions: total,
            longest_transaction,
            itemsets_by_size,
            total_itemsets: itemsets.len(),
            rules,
            timings,
        })
    }

    /// Summarize and render the info report text.
    pub fn render_report(
        &self,
        matrix: &TransactionMatrix,
        itemsets: &[FrequentItemset],
        rules: Option<&[AssociationRule]>,
        timings: Timings,
    ) -> Result<String> {
        Ok(self.summarize(matrix, itemsets, rules, timings)?.render())
    }
}
