//! Frequent Itemset Reporting Library
//!
//! Mines frequent itemsets and association rules from a transaction file and
//! writes the three report files: the itemsets, the confident rules and a
//! summary of the run.
//!
//! # Overview
//!
//! - **Transactions**: parse `<transaction_index> <item_id>` lines and encode
//!   them as a one-hot polars `DataFrame`
//! - **Mining**: Apriori behind the [`mining::FrequentPatternMiner`] trait,
//!   plus rule generation
//! - **Reporting**: support counts, the itemset size histogram, the
//!   highest-confidence rule and the info file layout
//! - **Sweeps**: itemset and rule counts over ranges of thresholds
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use itemset_report::{MiningConfig, MiningPipeline};
//!
//! let config = MiningConfig::builder()
//!     .input_file("small.txt")
//!     .min_support_count(100)
//!     .min_confidence(0.8)
//!     .output_dir("out")
//!     .build()?;
//!
//! let outcome = MiningPipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! println!("{}", outcome.report.render());
//! ```
//!
//! # Output Files
//!
//! | File | Line format |
//! |------|-------------|
//! | items | `<item ids>\|<support_count>` |
//! | rules | `<antecedent ids>\|<consequent ids>\|<support_count>\|<confidence>` |
//! | info | fixed `label:value` lines, see [`reporting::Report`] |
//!
//! Support counts are always `floor(support * total_transactions)`.

pub mod config;
pub mod error;
pub mod mining;
pub mod pipeline;
pub mod reporting;
pub mod sweep;
pub mod transactions;
pub mod types;

// Re-exports for convenient access
pub use config::{ConfigValidationError, MiningConfig, MiningConfigBuilder};
pub use error::{MiningError, Result as MiningResult, ResultExt};
pub use mining::{Apriori, FrequentPatternMiner, generate_rules};
pub use pipeline::{
    ClosureProgressReporter, MiningOutcome, MiningPipeline, MiningPipelineBuilder, MiningStage,
    ProgressReporter, ProgressUpdate, RenderedOutputs,
};
pub use reporting::{ItemsetRecord, Report, ReportSummarizer, RuleRecord, RuleSummary};
pub use transactions::{TransactionMatrix, parse_transactions, read_transactions};
pub use types::{
    AssociationRule, FrequentItemset, HasSupport, ItemId, ItemSet, Timings, Transaction,
};
