//! Parsing of `<transaction_index> <item_id>` transaction files.

use crate::error::{MiningError, Result, ResultExt};
use crate::types::{ItemId, Transaction};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Largest accepted transaction index. Every index below the largest one
/// seen is materialized, so the bound caps the allocation.
pub const MAX_TRANSACTION_INDEX: usize = (1 << 26) - 1;

/// Read a transaction file from disk.
pub fn read_transactions(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let file = File::open(path).context(format!("Opening {}", path.display()))?;
    let transactions = parse_transactions(BufReader::new(file))?;
    info!(
        "Read {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

/// Parse transactions from any buffered reader.
///
/// Lines may arrive in any order. The returned list has length
/// `max_index + 1`; indices that never appear are empty transactions.
/// Blank lines are skipped.
pub fn parse_transactions<R: BufRead>(reader: R) -> Result<Vec<Transaction>> {
    let mut transactions: Vec<Transaction> = Vec::new();
    let mut duplicates = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (index, item) = parse_line(&line, idx + 1)?;
        if index > MAX_TRANSACTION_INDEX {
            return Err(MiningError::InvalidInput(format!(
                "transaction index {} on line {} exceeds the maximum of {}",
                index,
                idx + 1,
                MAX_TRANSACTION_INDEX
            )));
        }
        if transactions.len() <= index {
            transactions.resize_with(index + 1, Transaction::new);
        }
        if !transactions[index].push_distinct(item) {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        debug!("Ignored {} repeated items within transactions", duplicates);
    }

    Ok(transactions)
}

/// Parse one `<index> <item>` record. `line_number` is 1-based.
fn parse_line(line: &str, line_number: usize) -> Result<(usize, ItemId)> {
    let malformed = || MiningError::MalformedLine {
        line: line_number,
        content: line.to_string(),
    };

    let mut fields = line.split_whitespace();
    let (Some(index), Some(item), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(malformed());
    };

    let index = index.parse::<usize>().map_err(|_| malformed())?;
    let item = item.parse::<ItemId>().map_err(|_| malformed())?;
    Ok((index, item))
}
