//! CLI entry point for the itemset reporting pipeline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use itemset_report::config::{DEFAULT_INFO_FILE, DEFAULT_ITEMS_FILE, DEFAULT_RULES_FILE};
use itemset_report::{MiningConfig, MiningError, MiningOutcome, MiningPipeline};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Frequent itemset and association rule report",
    long_about = "Mines frequent itemsets and association rules from a transaction file.\n\n\
                  The input holds one `<transaction_index> <item_id>` pair per line.\n\n\
                  OUTPUT FILES:\n  \
                  items01.txt   <item ids>|<support_count>\n  \
                  rules01.txt   <antecedent ids>|<consequent ids>|<support_count>|<confidence>\n  \
                  info01.txt    run summary\n\n\
                  EXAMPLES:\n  \
                  # Itemsets in at least 100 transactions, rules with confidence >= 0.8\n  \
                  itemset-report small.txt 100 0.8\n\n  \
                  # Itemsets only\n  \
                  itemset-report small.txt 100 -1\n\n  \
                  # JSON summary on stdout\n  \
                  itemset-report small.txt 100 0.8 --json"
)]
struct Args {
    /// Path to the transaction file
    input: PathBuf,

    /// Minimum support count (number of transactions)
    #[arg(allow_negative_numbers = true)]
    minsuppc: i64,

    /// Minimum confidence; a negative value skips rule generation
    #[arg(allow_negative_numbers = true)]
    minconf: f64,

    /// Output directory for the report files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Name of the frequent itemsets file
    #[arg(long, default_value = DEFAULT_ITEMS_FILE)]
    items_file: String,

    /// Name of the association rules file
    #[arg(long, default_value = DEFAULT_RULES_FILE)]
    rules_file: String,

    /// Name of the run summary file
    #[arg(long, default_value = DEFAULT_INFO_FILE)]
    info_file: String,

    /// Largest itemset size to mine
    #[arg(long)]
    max_len: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the human-readable summary
    ///
    /// Disables all logging; only the final JSON report is written.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// JSON document printed by `--json` when the run fails.
#[derive(Serialize)]
struct JsonError<'a> {
    error: &'a MiningError,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Load environment variables from .env file (RUST_LOG)
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let pipeline = build_pipeline(&args)?;

    info!("{}", "=".repeat(60));
    info!("Mining {}", args.input.display());
    info!("{}", "=".repeat(60));

    match pipeline.run() {
        Ok(outcome) => handle_output(&outcome, &args),
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&JsonError { error: &e })?);
            }
            Err(anyhow!("Mining failed [{}]: {}", e.error_code(), e))
        }
    }
}

fn build_pipeline(args: &Args) -> Result<MiningPipeline> {
    let mut config_builder = MiningConfig::builder()
        .input_file(&args.input)
        .min_support_count(args.minsuppc)
        .min_confidence(args.minconf)
        .output_dir(&args.output_dir)
        .items_file(&args.items_file)
        .rules_file(&args.rules_file)
        .info_file(&args.info_file);

    if let Some(max_len) = args.max_len {
        config_builder = config_builder.max_len(max_len);
    }

    let config = config_builder.build()?;

    let mut builder = MiningPipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Handle pipeline output based on CLI flags.
///
/// - Default: print the info report and the written files to stdout
/// - `--json`: print JSON to stdout only (no logs)
/// - `--emit-report`: also write the JSON report to a file
fn handle_output(outcome: &MiningOutcome, args: &Args) -> Result<()> {
    let output = outcome.to_json()?;

    if args.emit_report {
        let path = args
            .output_dir
            .join(format!("{}_report.json", extract_file_stem(&args.input)));
        fs::write(&path, &output)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report written to: {}", path.display());
    }

    if args.json {
        println!("{}", output);
        return Ok(());
    }

    print_human_readable_summary(outcome);
    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn print_human_readable_summary(outcome: &MiningOutcome) {
    println!();
    println!("{}", "=".repeat(60));
    println!("MINING COMPLETE");
    println!("{}", "=".repeat(60));
    println!("{}", outcome.report.render());
    println!();

    if !outcome.written.is_empty() {
        println!("Files written:");
        for path in &outcome.written {
            println!("  - {}", path.display());
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(60));
}
