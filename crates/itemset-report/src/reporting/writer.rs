//! Pipe-delimited itemset and rule files.
//!
//! Itemsets: `<space-separated item ids>|<support_count>`
//! Rules: `<antecedent ids>|<consequent ids>|<support_count>|<confidence>`
//!
//! One record per line, no header row. Files are rendered into a complete
//! buffer first and written with a single call.

use super::summarizer::ReportSummarizer;
use crate::error::{MiningError, Result, ResultExt};
use crate::types::{AssociationRule, FrequentItemset, ItemId, ItemSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Render a float the way the report files expect: shortest round-trip
/// decimal, with `.0` kept on integral values (`1.0`, `-1.0`). Exponents
/// below -4 or from 16 up switch to scientific notation with a signed,
/// two-digit exponent (`1e-07`, `1e+16`).
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    if value != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// One line of the itemsets file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsetRecord {
    pub items: ItemSet,
    pub support_count: u64,
}

impl ItemsetRecord {
    pub fn from_itemset(itemset: &FrequentItemset, total_transactions: usize) -> Result<Self> {
        Ok(Self {
            items: itemset.items.clone(),
            support_count: ReportSummarizer::support_count(itemset, total_transactions)?,
        })
    }
}

impl fmt::Display for ItemsetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.items, self.support_count)
    }
}

/// One line of the rules file; also the highest-confidence rule of the
/// info report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub antecedent: ItemSet,
    pub consequent: ItemSet,
    pub support_count: u64,
    pub confidence: f64,
}

impl RuleRecord {
    pub fn from_rule(rule: &AssociationRule, total_transactions: usize) -> Result<Self> {
        Ok(Self {
            antecedent: rule.antecedent.clone(),
            consequent: rule.consequent.clone(),
            support_count: ReportSummarizer::support_count(rule, total_transactions)?,
            confidence: rule.confidence,
        })
    }
}

impl fmt::Display for RuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.antecedent,
            self.consequent,
            self.support_count,
            format_float(self.confidence)
        )
    }
}

/// Render the itemsets file, preserving input order.
pub fn render_itemsets(itemsets: &[FrequentItemset], total_transactions: usize) -> Result<String> {
    let mut out = String::new();
    for itemset in itemsets {
        let record = ItemsetRecord::from_itemset(itemset, total_transactions)?;
        out.push_str(&record.to_string());
        out.push('\n');
    }
    Ok(out)
}

/// Render the rules file, preserving input order.
pub fn render_rules(rules: &[AssociationRule], total_transactions: usize) -> Result<String> {
    let mut out = String::new();
    for rule in rules {
        let record = RuleRecord::from_rule(rule, total_transactions)?;
        out.push_str(&record.to_string());
        out.push('\n');
    }
    Ok(out)
}

/// Parse an itemsets file back into records, in file order.
pub fn parse_itemsets(text: &str) -> Result<Vec<ItemsetRecord>> {
    records(text)
        .map(|(line_number, line)| -> Result<ItemsetRecord> {
            let bad = || malformed(line_number, line);
            let fields: Vec<&str> = line.split('|').collect();
            let [items, count] = fields.as_slice() else {
                return Err(bad());
            };
            Ok(ItemsetRecord {
                items: parse_items(items).ok_or_else(bad)?,
                support_count: count.trim().parse().map_err(|_| bad())?,
            })
        })
        .collect()
}

/// Parse a rules file back into records, in file order.
pub fn parse_rules(text: &str) -> Result<Vec<RuleRecord>> {
    records(text)
        .map(|(line_number, line)| -> Result<RuleRecord> {
            let bad = || malformed(line_number, line);
            let fields: Vec<&str> = line.split('|').collect();
            let [antecedent, consequent, count, confidence] = fields.as_slice() else {
                return Err(bad());
            };
            Ok(RuleRecord {
                antecedent: parse_items(antecedent).ok_or_else(bad)?,
                consequent: parse_items(consequent).ok_or_else(bad)?,
                support_count: count.trim().parse().map_err(|_| bad())?,
                confidence: confidence.trim().parse().map_err(|_| bad())?,
            })
        })
        .collect()
}

/// Non-blank lines with their 1-based line numbers.
fn records(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
}

fn parse_items(field: &str) -> Option<ItemSet> {
    let items: Option<Vec<ItemId>> = field
        .split_whitespace()
        .map(|item| item.parse().ok())
        .collect();
    ItemSet::new(items?)
}

fn malformed(line: usize, content: &str) -> MiningError {
    MiningError::MalformedLine {
        line,
        content: content.to_string(),
    }
}

/// Write a fully rendered buffer to `path`, creating parent directories.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
    }

    let mut file = File::create(path).context(format!("Creating {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .context(format!("Writing {}", path.display()))?;
    file.flush()?;

    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn itemset(items: &[ItemId], support: f64) -> FrequentItemset {
        FrequentItemset::new(ItemSet::new(items.iter().copied()).unwrap(), support)
    }

    fn rule(
        antecedent: &[ItemId],
        consequent: &[ItemId],
        support: f64,
        confidence: f64,
    ) -> AssociationRule {
        AssociationRule {
            antecedent: ItemSet::new(antecedent.iter().copied()).unwrap(),
            consequent: ItemSet::new(consequent.iter().copied()).unwrap(),
            support,
            confidence,
            antecedent_support: support / confidence,
            consequent_support: 1.0,
            lift: confidence,
        }
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-1.0), "-1.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(2.0 / 3.0), "0.6666666666666666");
        assert_eq!(format_float(0.0), "0.0");
    }

    #[test]
    fn test_format_float_exponent_range() {
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(1e-7), "1e-07");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(1e15), "1000000000000000.0");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(-2.5e20), "-2.5e+20");
        assert_eq!(format_float(1.2345678901234568e17), "1.2345678901234568e+17");
        assert_eq!(format_float(1e100), "1e+100");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_render_itemsets() {
        let text = render_itemsets(&[itemset(&[2], 0.75), itemset(&[1, 2], 0.5)], 4).unwrap();
        assert_eq!(text, "2|3\n1 2|2\n");
    }

    #[test]
    fn test_render_rules_keeps_float_confidence() {
        let text = render_rules(
            &[rule(&[3], &[2], 0.5, 1.0), rule(&[1], &[2], 0.5, 2.0 / 3.0)],
            4,
        )
        .unwrap();
        assert_eq!(text, "3|2|2|1.0\n1|2|2|0.6666666666666666\n");
    }

    #[test]
    fn test_itemsets_round_trip_preserves_order() {
        let itemsets = vec![
            itemset(&[7], 0.9),
            itemset(&[1, 3], 0.4),
            itemset(&[2], 0.6),
            itemset(&[1, 2, 3], 0.3),
        ];
        let text = render_itemsets(&itemsets, 10).unwrap();
        let parsed = parse_itemsets(&text).unwrap();
        let expected: Vec<(Vec<ItemId>, u64)> =
            vec![(vec![7], 9), (vec![1, 3], 4), (vec![2], 6), (vec![1, 2, 3], 3)];
        let actual: Vec<(Vec<ItemId>, u64)> = parsed
            .iter()
            .map(|r| (r.items.items().to_vec(), r.support_count))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_rules_round_trip() {
        let rules = vec![rule(&[1, 4], &[2], 0.25, 0.8)];
        let parsed = parse_rules(&render_rules(&rules, 8).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].antecedent.items(), &[1, 4]);
        assert_eq!(parsed[0].support_count, 2);
        assert_eq!(parsed[0].confidence, 0.8);
    }

    #[test]
    fn test_parse_rejects_bad_records() {
        assert!(matches!(
            parse_itemsets("1 2|3\n1 2\n").unwrap_err(),
            MiningError::MalformedLine { line: 2, .. }
        ));
        assert!(matches!(
            parse_itemsets("|3\n").unwrap_err(),
            MiningError::MalformedLine { line: 1, .. }
        ));
        assert!(parse_rules("1|2|x|0.5\n").is_err());
    }

    #[test]
    fn test_write_output_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("items.txt");
        write_output(&path, "1|2\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1|2\n");
    }
}
