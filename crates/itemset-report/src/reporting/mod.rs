//! Report generation module.
//!
//! This module turns mined itemsets and rules into the three output files:
//! the pipe-delimited itemsets and rules files, and the info report.
//!
//! # Example
//!
//! ```rust,ignore
//! use itemset_report::reporting::{ReportSummarizer, render_itemsets};
//!
//! let summarizer = ReportSummarizer::new(&config);
//! let report = summarizer.summarize(&matrix, &itemsets, Some(&rules), timings)?;
//!
//! // Info file text
//! println!("{}", report.render());
//!
//! // Or as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

mod report;
mod summarizer;
mod writer;

pub use report::{Report, RuleSummary};
pub use summarizer::ReportSummarizer;
pub use writer::{
    ItemsetRecord, RuleRecord, format_float, parse_itemsets, parse_rules, render_itemsets,
    render_rules, write_output,
};
