//! One-hot encoding of transactions into a boolean item matrix.

use crate::error::{MiningError, Result, ResultExt};
use crate::types::{ItemId, Transaction};
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Boolean matrix with one row per transaction and one column per item.
///
/// Columns are named by item id and ordered by ascending item id. Cell
/// `(i, j)` is true iff item `j` occurs in transaction `i`.
#[derive(Debug, Clone)]
pub struct TransactionMatrix {
    frame: DataFrame,
    items: Vec<ItemId>,
    n_transactions: usize,
}

impl TransactionMatrix {
    /// Encode a transaction list.
    pub fn from_transactions(transactions: &[Transaction]) -> Result<Self> {
        let items: Vec<ItemId> = transactions
            .iter()
            .flat_map(|t| t.items().iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let position: HashMap<ItemId, usize> =
            items.iter().enumerate().map(|(col, &item)| (item, col)).collect();
        let mut cells = vec![vec![false; transactions.len()]; items.len()];
        for (row, transaction) in transactions.iter().enumerate() {
            for item in transaction.items() {
                if let Some(&col) = position.get(item) {
                    cells[col][row] = true;
                }
            }
        }

        let columns: Vec<Column> = items
            .iter()
            .zip(cells)
            .map(|(item, cells)| Column::new(item.to_string().into(), cells))
            .collect();

        let frame = DataFrame::new(columns).context("Building transaction matrix")?;

        debug!(
            "Encoded {} transactions over {} distinct items",
            transactions.len(),
            items.len()
        );

        Ok(Self {
            frame,
            items,
            n_transactions: transactions.len(),
        })
    }

    /// Number of rows (transactions), including empty ones.
    pub fn n_transactions(&self) -> usize {
        self.n_transactions
    }

    /// Number of columns (distinct items).
    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    /// Item id of every column, ascending.
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// The underlying polars frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Cardinality of every transaction, in row order.
    pub fn row_sums(&self) -> Result<Vec<usize>> {
        let mut sums = vec![0usize; self.n_transactions];
        for column in self.frame.get_columns() {
            let cells = column.as_materialized_series().bool()?;
            for (row, cell) in cells.into_iter().enumerate() {
                if cell == Some(true) {
                    sums[row] += 1;
                }
            }
        }
        Ok(sums)
    }

    /// Each column as a packed bitset over transactions (bit `i` of the
    /// column set iff transaction `i` contains the item).
    pub fn column_bits(&self) -> Result<Vec<Vec<u64>>> {
        let words = self.n_transactions.div_ceil(64);
        self.frame
            .get_columns()
            .iter()
            .map(|column| -> Result<Vec<u64>> {
                let cells = column.as_materialized_series().bool()?;
                let mut bits = vec![0u64; words];
                for (row, cell) in cells.into_iter().enumerate() {
                    if cell == Some(true) {
                        bits[row / 64] |= 1u64 << (row % 64);
                    }
                }
                Ok(bits)
            })
            .collect()
    }

    /// Fail with `EmptyInput` when there are no transactions.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.n_transactions == 0 {
            return Err(MiningError::EmptyInput(
                "transaction matrix has no rows".to_string(),
            ));
        }
        Ok(())
    }
}
