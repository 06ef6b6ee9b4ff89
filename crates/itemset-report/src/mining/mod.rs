//! Frequent itemset mining and association rule generation.
//!
//! Itemset discovery sits behind the [`FrequentPatternMiner`] trait so that
//! the reporting layer only ever sees materialized results. [`Apriori`] is
//! the bundled implementation.
//!
//! # Implementing a Custom Miner
//!
//! ```rust,ignore
//! use itemset_report::mining::FrequentPatternMiner;
//! use itemset_report::{FrequentItemset, TransactionMatrix};
//! use itemset_report::error::Result;
//!
//! struct FpGrowth;
//!
//! impl FrequentPatternMiner for FpGrowth {
//!     fn name(&self) -> &'static str {
//!         "fp-growth"
//!     }
//!
//!     fn frequent_itemsets(
//!         &self,
//!         matrix: &TransactionMatrix,
//!         min_support: f64,
//!     ) -> Result<Vec<FrequentItemset>> {
//!         todo!()
//!     }
//! }
//! ```

mod apriori;
mod rules;

pub use apriori::Apriori;
pub use rules::generate_rules;

use crate::error::Result;
use crate::transactions::TransactionMatrix;
use crate::types::FrequentItemset;

/// A frequent itemset mining algorithm.
pub trait FrequentPatternMiner: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Find every itemset whose support proportion is at least
    /// `min_support`.
    ///
    /// Results are ordered by size, then lexicographically by item id.
    fn frequent_itemsets(
        &self,
        matrix: &TransactionMatrix,
        min_support: f64,
    ) -> Result<Vec<FrequentItemset>>;
}
