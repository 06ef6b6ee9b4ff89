//! Pipeline module.
//!
//! This module provides the end-to-end mining run and its progress
//! reporting.

mod builder;
pub mod progress;

pub use builder::{MiningOutcome, MiningPipeline, MiningPipelineBuilder, RenderedOutputs};
pub use progress::{ClosureProgressReporter, MiningStage, ProgressReporter, ProgressUpdate};
