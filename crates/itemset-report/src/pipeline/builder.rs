//! Mining pipeline: read, encode, mine, summarize, write.

use crate::config::MiningConfig;
use crate::error::{MiningError, Result, ResultExt};
use crate::mining::{Apriori, FrequentPatternMiner, generate_rules};
use crate::pipeline::progress::{
    ClosureProgressReporter, MiningStage, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{Report, ReportSummarizer, render_itemsets, render_rules, write_output};
use crate::transactions::{TransactionMatrix, read_transactions};
use crate::types::{AssociationRule, FrequentItemset, Timings, Transaction};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The three output files, fully rendered in memory.
#[derive(Debug, Clone)]
pub struct RenderedOutputs {
    pub items: String,
    /// `None` when rule generation was skipped; no rules file is written.
    pub rules: Option<String>,
    pub info: String,
}

/// JSON form of a run: the report fields plus the written files.
#[derive(Serialize)]
struct OutcomeDocument<'a> {
    #[serde(flatten)]
    report: &'a Report,
    files: Vec<String>,
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct MiningOutcome {
    pub matrix: TransactionMatrix,
    pub itemsets: Vec<FrequentItemset>,
    pub rules: Option<Vec<AssociationRule>>,
    pub report: Report,
    pub outputs: RenderedOutputs,
    /// Files written, empty when `save_to_disk` is off.
    pub written: Vec<PathBuf>,
}

impl MiningOutcome {
    /// Pretty-printed JSON of the report, with a `files` list of the paths
    /// written.
    pub fn to_json(&self) -> Result<String> {
        let document = OutcomeDocument {
            report: &self.report,
            files: self
                .written
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

/// Orchestrates a complete mining run.
///
/// Use [`MiningPipeline::builder()`] to create a pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use itemset_report::{MiningConfig, MiningPipeline};
///
/// let config = MiningConfig::builder()
///     .input_file("small.txt")
///     .min_support_count(100)
///     .min_confidence(0.8)
///     .build()?;
///
/// let outcome = MiningPipeline::builder().config(config).build()?.run()?;
/// println!("{}", outcome.report.render());
/// ```
pub struct MiningPipeline {
    config: MiningConfig,
    miner: Arc<dyn FrequentPatternMiner>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    summarizer: ReportSummarizer,
}

static_assertions::assert_impl_all!(MiningPipeline: Send);

impl MiningPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> MiningPipelineBuilder {
        MiningPipelineBuilder::default()
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// Read the configured input file and run the whole pipeline.
    pub fn run(&self) -> Result<MiningOutcome> {
        self.finish(self.run_internal(None))
    }

    /// Run the pipeline on transactions that are already in memory.
    pub fn run_on(&self, transactions: &[Transaction]) -> Result<MiningOutcome> {
        self.finish(self.run_internal(Some(transactions)))
    }

    fn finish(&self, result: Result<MiningOutcome>) -> Result<MiningOutcome> {
        match result {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete("Run completed successfully"));
                Ok(outcome)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Mining run failed: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, transactions: Option<&[Transaction]>) -> Result<MiningOutcome> {
        let loaded;
        let transactions = match transactions {
            Some(transactions) => transactions,
            None => {
                self.report_progress(ProgressUpdate::new(
                    MiningStage::Reading,
                    format!("Reading {}", self.config.input_file.display()),
                ));
                loaded = read_transactions(&self.config.input_file)?;
                loaded.as_slice()
            }
        };

        self.report_progress(ProgressUpdate::new(
            MiningStage::Encoding,
            format!("Encoding {} transactions", transactions.len()),
        ));
        let matrix = TransactionMatrix::from_transactions(transactions)?;
        matrix
            .ensure_non_empty()
            .context("Input contains no transactions")?;

        let total = matrix.n_transactions();
        if self.config.min_support_count > total as u64 {
            return Err(MiningError::InvalidInput(format!(
                "minimum support count {} exceeds the number of transactions {}",
                self.config.min_support_count, total
            )));
        }

        let mut timings = Timings::default();

        let min_support = self.config.min_support_count as f64 / total as f64;
        info!(
            "Total: {}, Count: {}, Support: {}",
            total, self.config.min_support_count, min_support
        );
        self.report_progress(ProgressUpdate::new(
            MiningStage::MiningItemsets,
            format!("Finding frequent itemsets with {}", self.miner.name()),
        ));
        let start = Instant::now();
        let itemsets = self.miner.frequent_itemsets(&matrix, min_support)?;
        timings.itemsets_seconds = start.elapsed().as_secs_f64();
        info!(
            "Found {} frequent itemsets in {:.4} seconds",
            itemsets.len(),
            timings.itemsets_seconds
        );

        self.report_progress(ProgressUpdate::new(
            MiningStage::GeneratingRules,
            "Finding rules with high confidence",
        ));
        let start = Instant::now();
        let rules = if self.config.generates_rules() {
            Some(generate_rules(&itemsets, self.config.min_confidence)?)
        } else {
            info!("Negative minimum confidence, skipping rule generation");
            None
        };
        timings.rules_seconds = start.elapsed().as_secs_f64();
        if let Some(rules) = &rules {
            info!(
                "Found {} rules in {:.4} seconds",
                rules.len(),
                timings.rules_seconds
            );
        }

        self.report_progress(ProgressUpdate::new(
            MiningStage::Summarizing,
            "Rendering outputs",
        ));
        let report = self
            .summarizer
            .summarize(&matrix, &itemsets, rules.as_deref(), timings)
            .context("Building info report")?;
        let outputs = RenderedOutputs {
            items: render_itemsets(&itemsets, total)?,
            rules: rules
                .as_deref()
                .map(|rules| render_rules(rules, total))
                .transpose()?,
            info: report.render(),
        };

        let written = if self.config.save_to_disk {
            self.report_progress(ProgressUpdate::new(
                MiningStage::Writing,
                format!("Writing outputs to {}", self.config.output_dir.display()),
            ));
            self.write_outputs(&outputs)?
        } else {
            Vec::new()
        };

        Ok(MiningOutcome {
            matrix,
            itemsets,
            rules,
            report,
            outputs,
            written,
        })
    }

    /// Write rendered outputs to the configured paths.
    ///
    /// When rule generation was skipped, a rules file left at the rules path
    /// by an earlier run is removed so it cannot be read alongside the new
    /// items and info files.
    pub fn write_outputs(&self, outputs: &RenderedOutputs) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(3);

        let items_path = self.config.items_path();
        write_output(&items_path, &outputs.items)?;
        written.push(items_path);

        let rules_path = self.config.rules_path();
        match &outputs.rules {
            Some(rules) => {
                write_output(&rules_path, rules)?;
                written.push(rules_path);
            }
            None if rules_path.is_file() => {
                fs::remove_file(&rules_path)
                    .context(format!("Removing stale {}", rules_path.display()))?;
                info!("Removed stale {}", rules_path.display());
            }
            None => {}
        }

        let info_path = self.config.info_path();
        write_output(&info_path, &outputs.info)?;
        written.push(info_path);

        Ok(written)
    }
}

/// Builder for [`MiningPipeline`].
#[derive(Default)]
pub struct MiningPipelineBuilder {
    config: Option<MiningConfig>,
    miner: Option<Arc<dyn FrequentPatternMiner>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(MiningPipelineBuilder: Send);

impl MiningPipelineBuilder {
    /// Set the run configuration. Required.
    pub fn config(mut self, config: MiningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the default [`Apriori`] miner.
    pub fn miner(mut self, miner: Arc<dyn FrequentPatternMiner>) -> Self {
        self.miner = Some(miner);
        self
    }

    /// Set a progress reporter for receiving updates during the run.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<MiningPipeline> {
        let config = self.config.ok_or_else(|| {
            MiningError::InvalidInput("pipeline requires a configuration".to_string())
        })?;
        config.validate()?;

        let miner = self.miner.unwrap_or_else(|| {
            Arc::new(match config.max_len {
                Some(max_len) => Apriori::with_max_len(max_len),
                None => Apriori::new(),
            })
        });

        Ok(MiningPipeline {
            summarizer: ReportSummarizer::new(&config),
            config,
            miner,
            progress_reporter: self.progress_reporter,
        })
    }
}
