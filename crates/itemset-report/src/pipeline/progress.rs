//! Progress reporting for the mining pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use itemset_report::MiningPipeline;
//!
//! let outcome = MiningPipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of a mining run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiningStage {
    /// Reading the transaction file
    Reading,
    /// Building the one-hot transaction matrix
    Encoding,
    /// Searching for frequent itemsets
    MiningItemsets,
    /// Deriving association rules
    GeneratingRules,
    /// Computing aggregates and rendering the outputs
    Summarizing,
    /// Writing output files
    Writing,
    /// Run completed successfully
    Complete,
    /// Run failed with an error
    Failed,
}

impl MiningStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Reading => "Reading Transactions",
            Self::Encoding => "Encoding Transactions",
            Self::MiningItemsets => "Finding Frequent Itemsets",
            Self::GeneratingRules => "Finding Confident Rules",
            Self::Summarizing => "Summarizing",
            Self::Writing => "Writing Outputs",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Cumulative progress (0.0 - 1.0) at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Reading => 0.0,
            Self::Encoding => 0.10,
            Self::MiningItemsets => 0.20,
            Self::GeneratingRules => 0.70,
            Self::Summarizing => 0.85,
            Self::Writing => 0.95,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A progress update emitted at each stage boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: MiningStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

impl ProgressUpdate {
    /// Creates an update marking the start of `stage`.
    pub fn new(stage: MiningStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress: stage.base_progress(),
            message: message.into(),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(MiningStage::Complete, message)
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(MiningStage::Failed, message)
    }
}

/// Trait for receiving progress updates during a run.
pub trait ProgressReporter: Send + Sync {
    /// Called once per stage boundary. Implementations should not block.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
