//! Association rules derived from a frequent itemset collection.

use crate::error::{MiningError, Result};
use crate::types::{AssociationRule, FrequentItemset, ItemId, ItemSet};
use std::collections::HashMap;
use tracing::debug;

/// Generate every rule whose confidence is at least `min_confidence`.
///
/// For each itemset with two or more items, each non-empty proper subset is
/// tried as the antecedent, largest antecedents first and combinations in
/// lexicographic order. Supports of both sides are looked up in `itemsets`,
/// which must therefore be downward closed (as Apriori output is).
pub fn generate_rules(
    itemsets: &[FrequentItemset],
    min_confidence: f64,
) -> Result<Vec<AssociationRule>> {
    if min_confidence.is_nan() || min_confidence > 1.0 {
        return Err(MiningError::InvalidInput(format!(
            "minimum confidence must be at most 1.0, got {}",
            min_confidence
        )));
    }

    let supports: HashMap<&ItemSet, f64> = itemsets
        .iter()
        .map(|itemset| (&itemset.items, itemset.support))
        .collect();

    let mut rules = Vec::new();
    for itemset in itemsets.iter().filter(|itemset| itemset.len() >= 2) {
        let items = itemset.items.items();
        for size in (1..items.len()).rev() {
            for picked in combinations(items.len(), size) {
                let (antecedent, consequent) = split(items, &picked);
                let antecedent_support = lookup(&supports, &antecedent)?;
                let consequent_support = lookup(&supports, &consequent)?;

                let confidence = itemset.support / antecedent_support;
                if confidence >= min_confidence {
                    rules.push(AssociationRule {
                        antecedent,
                        consequent,
                        support: itemset.support,
                        confidence,
                        antecedent_support,
                        consequent_support,
                        lift: confidence / consequent_support,
                    });
                }
            }
        }
    }

    debug!(
        "Generated {} rules from {} itemsets at confidence >= {}",
        rules.len(),
        itemsets.len(),
        min_confidence
    );
    Ok(rules)
}

fn lookup(supports: &HashMap<&ItemSet, f64>, set: &ItemSet) -> Result<f64> {
    supports.get(set).copied().ok_or_else(|| {
        MiningError::InvalidInput(format!("no support recorded for itemset {{{}}}", set))
    })
}

/// Partition `items` into the positions in `picked` and the rest.
fn split(items: &[ItemId], picked: &[usize]) -> (ItemSet, ItemSet) {
    let mut antecedent = Vec::with_capacity(picked.len());
    let mut consequent = Vec::with_capacity(items.len() - picked.len());
    for (pos, &item) in items.iter().enumerate() {
        if picked.contains(&pos) {
            antecedent.push(item);
        } else {
            consequent.push(item);
        }
    }
    (ItemSet::from_sorted(antecedent), ItemSet::from_sorted(consequent))
}

/// All `k`-element index combinations of `0..n`, lexicographic.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 || k > n {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());

        // rightmost position that can still advance
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] < n - k + i {
                break;
            }
        }

        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn itemset(items: &[ItemId], support: f64) -> FrequentItemset {
        FrequentItemset::new(ItemSet::new(items.iter().copied()).unwrap(), support)
    }

    fn basket() -> Vec<FrequentItemset> {
        vec![
            itemset(&[1], 0.75),
            itemset(&[2], 0.75),
            itemset(&[3], 0.5),
            itemset(&[1, 2], 0.5),
            itemset(&[2, 3], 0.5),
        ]
    }

    #[test]
    fn test_combinations_lexicographic() {
        assert_eq!(
            combinations(4, 2),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(combinations(3, 3), vec![vec![0, 1, 2]]);
        assert!(combinations(2, 3).is_empty());
    }

    #[test]
    fn test_rules_with_confidence_threshold() {
        let rules = generate_rules(&basket(), 0.7).unwrap();
        let summary: Vec<(String, String, f64)> = rules
            .iter()
            .map(|r| (r.antecedent.to_string(), r.consequent.to_string(), r.confidence))
            .collect();
        assert_eq!(summary, vec![("3".to_string(), "2".to_string(), 1.0)]);
    }

    #[test]
    fn test_all_rules_at_zero_confidence() {
        let rules = generate_rules(&basket(), 0.0).unwrap();
        assert_eq!(rules.len(), 4);
        let first = &rules[0];
        assert_eq!(first.antecedent.to_string(), "1");
        assert_eq!(first.consequent.to_string(), "2");
        assert!((first.confidence - 0.5 / 0.75).abs() < 1e-12);
        assert!((first.lift - (0.5 / 0.75) / 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_larger_antecedents_come_first() {
        let itemsets = vec![
            itemset(&[1], 1.0),
            itemset(&[2], 1.0),
            itemset(&[3], 1.0),
            itemset(&[1, 2], 1.0),
            itemset(&[1, 3], 1.0),
            itemset(&[2, 3], 1.0),
            itemset(&[1, 2, 3], 1.0),
        ];
        let rules = generate_rules(&itemsets, 1.0).unwrap();
        let from_triple: Vec<usize> = rules
            .iter()
            .filter(|r| r.antecedent.len() + r.consequent.len() == 3)
            .map(|r| r.antecedent.len())
            .collect();
        assert_eq!(from_triple, vec![2, 2, 2, 1, 1, 1]);
        assert!(rules.iter().all(|r| r.antecedent.is_disjoint(&r.consequent)));
    }

    #[test]
    fn test_missing_subset_support_is_error() {
        let itemsets = vec![itemset(&[1], 0.5), itemset(&[1, 2], 0.5)];
        assert!(matches!(
            generate_rules(&itemsets, 0.1).unwrap_err(),
            MiningError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        assert!(generate_rules(&basket(), 1.5).is_err());
        assert!(generate_rules(&basket(), f64::NAN).is_err());
    }
}
