//! Level-wise Apriori search over column bitsets.

use super::FrequentPatternMiner;
use crate::error::{MiningError, Result};
use crate::transactions::TransactionMatrix;
use crate::types::{FrequentItemset, ItemSet};
use std::collections::HashSet;
use tracing::debug;

/// Classic Apriori: frequent `k`-itemsets are joined on their common
/// `k-1` prefix, candidates with an infrequent subset are pruned, and the
/// survivors are counted by intersecting transaction bitsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Apriori {
    max_len: Option<usize>,
}

/// Column indices of an itemset together with its transaction bitset.
type Candidate = (Vec<usize>, Vec<u64>);

impl Apriori {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after itemsets of `max_len` items.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
        }
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// Join every pair of same-prefix itemsets in `level` (which is sorted
    /// lexicographically) and keep the frequent candidates.
    fn next_level(
        level: &[Candidate],
        columns: &[Vec<u64>],
        is_frequent: impl Fn(usize) -> bool,
    ) -> Vec<Candidate> {
        let known: HashSet<&[usize]> = level.iter().map(|(cols, _)| cols.as_slice()).collect();
        let mut next = Vec::new();

        for (i, (left, left_bits)) in level.iter().enumerate() {
            let prefix = &left[..left.len() - 1];
            for (right, _) in &level[i + 1..] {
                if &right[..right.len() - 1] != prefix {
                    break;
                }

                let last = right[right.len() - 1];
                let mut candidate = left.clone();
                candidate.push(last);
                if !all_subsets_known(&candidate, &known) {
                    continue;
                }

                let bits: Vec<u64> = left_bits
                    .iter()
                    .zip(&columns[last])
                    .map(|(a, b)| a & b)
                    .collect();
                if is_frequent(popcount(&bits)) {
                    next.push((candidate, bits));
                }
            }
        }

        next
    }
}

impl FrequentPatternMiner for Apriori {
    fn name(&self) -> &'static str {
        "apriori"
    }

    fn frequent_itemsets(
        &self,
        matrix: &TransactionMatrix,
        min_support: f64,
    ) -> Result<Vec<FrequentItemset>> {
        matrix.ensure_non_empty()?;
        if !(min_support > 0.0 && min_support <= 1.0) {
            return Err(MiningError::InvalidInput(format!(
                "minimum support must be in (0, 1], got {}",
                min_support
            )));
        }

        let total = matrix.n_transactions() as f64;
        let is_frequent = |count: usize| count as f64 / total >= min_support;
        let columns = matrix.column_bits()?;
        let items = matrix.items();

        let mut level: Vec<Candidate> = columns
            .iter()
            .enumerate()
            .filter(|(_, bits)| is_frequent(popcount(bits)))
            .map(|(col, bits)| (vec![col], bits.clone()))
            .collect();

        let mut frequent = Vec::new();
        let mut size = 1;
        while !level.is_empty() {
            debug!("Found {} frequent {}-itemsets", level.len(), size);
            frequent.extend(level.iter().map(|(cols, bits)| {
                FrequentItemset::new(
                    ItemSet::from_sorted(cols.iter().map(|&c| items[c]).collect()),
                    popcount(bits) as f64 / total,
                )
            }));

            if self.max_len.is_some_and(|max| size >= max) {
                break;
            }
            level = Self::next_level(&level, &columns, is_frequent);
            size += 1;
        }

        Ok(frequent)
    }
}

fn popcount(bits: &[u64]) -> usize {
    bits.iter().map(|word| word.count_ones() as usize).sum()
}

/// The two subsets obtained by dropping one of the last two columns are
/// the join parents; only the others need checking.
fn all_subsets_known(candidate: &[usize], known: &HashSet<&[usize]>) -> bool {
    let k = candidate.len();
    (0..k.saturating_sub(2)).all(|skip| {
        let subset: Vec<usize> = candidate
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, &c)| c)
            .collect();
        known.contains(subset.as_slice())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemId, Transaction};

    fn matrix(rows: &[&[ItemId]]) -> TransactionMatrix {
        let transactions: Vec<Transaction> = rows
            .iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        TransactionMatrix::from_transactions(&transactions).unwrap()
    }

    fn as_pairs(itemsets: &[FrequentItemset]) -> Vec<(Vec<ItemId>, f64)> {
        itemsets
            .iter()
            .map(|f| (f.items.items().to_vec(), f.support))
            .collect()
    }

    #[test]
    fn test_small_basket() {
        let m = matrix(&[&[1, 2], &[1, 2, 3], &[1], &[2, 3]]);
        let found = Apriori::new().frequent_itemsets(&m, 2.0 / 4.0).unwrap();
        assert_eq!(
            as_pairs(&found),
            vec![
                (vec![1], 0.75),
                (vec![2], 0.75),
                (vec![3], 0.5),
                (vec![1, 2], 0.5),
                (vec![2, 3], 0.5),
            ]
        );
    }

    #[test]
    fn test_three_item_level_with_pruning() {
        let m = matrix(&[&[1, 2, 3], &[1, 2, 3], &[1, 2], &[3, 4]]);
        let found = Apriori::new().frequent_itemsets(&m, 0.5).unwrap();
        let sets: Vec<Vec<ItemId>> = found.iter().map(|f| f.items.items().to_vec()).collect();
        assert!(sets.contains(&vec![1, 2, 3]));
        assert!(!sets.iter().any(|s| s.contains(&4)));
        assert_eq!(sets.last().unwrap(), &vec![1, 2, 3]);
    }

    #[test]
    fn test_max_len_stops_early() {
        let m = matrix(&[&[1, 2, 3], &[1, 2, 3]]);
        let found = Apriori::with_max_len(2).frequent_itemsets(&m, 1.0).unwrap();
        assert!(found.iter().all(|f| f.len() <= 2));
        assert_eq!(found.len(), 6);
    }

    #[test]
    fn test_output_ordered_by_size() {
        let m = matrix(&[&[5, 1, 3], &[1, 3, 5], &[3, 5]]);
        let found = Apriori::new().frequent_itemsets(&m, 0.6).unwrap();
        let sizes: Vec<usize> = found.iter().map(|f| f.len()).collect();
        let mut sorted = sizes.clone();
        sorted.sort();
        assert_eq!(sizes, sorted);
    }

    #[test]
    fn test_many_transactions_span_multiple_words() {
        let rows: Vec<Vec<ItemId>> = (0..150)
            .map(|i| if i % 3 == 0 { vec![1, 2] } else { vec![1] })
            .collect();
        let transactions: Vec<Transaction> =
            rows.iter().map(|r| r.iter().copied().collect()).collect();
        let m = TransactionMatrix::from_transactions(&transactions).unwrap();
        let found = Apriori::new().frequent_itemsets(&m, 0.3).unwrap();
        assert_eq!(
            as_pairs(&found),
            vec![(vec![1], 1.0), (vec![2], 50.0 / 150.0), (vec![1, 2], 50.0 / 150.0)]
        );
    }

    #[test]
    fn test_invalid_support_rejected() {
        let m = matrix(&[&[1]]);
        assert!(matches!(
            Apriori::new().frequent_itemsets(&m, 0.0).unwrap_err(),
            MiningError::InvalidInput(_)
        ));
        assert!(matches!(
            Apriori::new().frequent_itemsets(&m, 1.5).unwrap_err(),
            MiningError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let m = TransactionMatrix::from_transactions(&[]).unwrap();
        assert!(matches!(
            Apriori::new().frequent_itemsets(&m, 0.5).unwrap_err(),
            MiningError::EmptyInput(_)
        ));
    }
}
