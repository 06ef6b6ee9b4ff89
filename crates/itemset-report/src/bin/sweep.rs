//! Sweeps mining thresholds over a transaction file and writes the resulting
//! tables as CSV.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use itemset_report::sweep::{
    DEFAULT_CONFIDENCES, DEFAULT_RULE_SUPPORT_COUNT, DEFAULT_SUPPORT_COUNTS, confidence_frame,
    confidence_sweep, support_frame, support_sweep, write_csv,
};
use itemset_report::{Apriori, TransactionMatrix, read_transactions};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Itemset and rule counts across mining thresholds",
    long_about = "Mines the transaction file once per threshold and records how many \
                  frequent itemsets (and how long it took) or rules each setting yields.\n\n\
                  OUTPUT FILES:\n  \
                  support_sweep.csv      min_support_count,frequent_itemsets,seconds\n  \
                  confidence_sweep.csv   min_confidence,rules\n\n\
                  EXAMPLES:\n  \
                  itemset-sweep small.txt\n  \
                  itemset-sweep small.txt --support-counts 10,20,40 --confidences 0.5,0.9"
)]
struct Args {
    /// Path to the transaction file
    input: PathBuf,

    /// Minimum support counts to sweep (default: 50 to 200 in steps of 25)
    #[arg(long, value_delimiter = ',')]
    support_counts: Option<Vec<u64>>,

    /// Minimum confidences to sweep (default: 0.7,0.75,0.8,0.85,0.9)
    #[arg(long, value_delimiter = ',')]
    confidences: Option<Vec<f64>>,

    /// Support count held fixed for the confidence sweep
    #[arg(long, default_value_t = DEFAULT_RULE_SUPPORT_COUNT)]
    rule_support_count: u64,

    /// Output directory for the CSV tables
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Largest itemset size to mine
    #[arg(long)]
    max_len: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let transactions = read_transactions(&args.input)?;
    let matrix = TransactionMatrix::from_transactions(&transactions)?;
    let miner = match args.max_len {
        Some(max_len) => Apriori::with_max_len(max_len),
        None => Apriori::new(),
    };

    let counts = args
        .support_counts
        .unwrap_or_else(|| DEFAULT_SUPPORT_COUNTS.to_vec());
    info!("Sweeping {} support counts", counts.len());
    let support_rows = support_sweep(&matrix, &miner, &counts)?;
    for row in &support_rows {
        info!(
            "minsuppc {:>6}: {:>8} itemsets, {:.4}s",
            row.min_support_count, row.frequent_itemsets, row.seconds
        );
    }

    let confidences = args
        .confidences
        .unwrap_or_else(|| DEFAULT_CONFIDENCES.to_vec());
    info!(
        "Sweeping {} confidences at minsuppc {}",
        confidences.len(),
        args.rule_support_count
    );
    let confidence_rows =
        confidence_sweep(&matrix, &miner, args.rule_support_count, &confidences)?;
    for row in &confidence_rows {
        info!("minconf {:>5}: {:>8} rules", row.min_confidence, row.rules);
    }

    write_csv(
        &mut support_frame(&support_rows)?,
        &args.output_dir.join("support_sweep.csv"),
    )?;
    write_csv(
        &mut confidence_frame(&confidence_rows)?,
        &args.output_dir.join("confidence_sweep.csv"),
    )?;

    Ok(())
}
