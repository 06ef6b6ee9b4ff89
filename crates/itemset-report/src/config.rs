//! Configuration types for the itemset reporting pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! Everything the summarizer and the writers need (thresholds, input path,
//! output file names) is carried here and passed in explicitly.

use crate::error::MiningError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default name of the frequent itemsets output file.
pub const DEFAULT_ITEMS_FILE: &str = "items01.txt";
/// Default name of the association rules output file.
pub const DEFAULT_RULES_FILE: &str = "rules01.txt";
/// Default name of the run summary file.
pub const DEFAULT_INFO_FILE: &str = "info01.txt";

/// Configuration for a single mining run.
///
/// Use [`MiningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use itemset_report::config::MiningConfig;
///
/// let config = MiningConfig::builder()
///     .input_file("data/small.txt")
///     .min_support_count(100)
///     .min_confidence(0.8)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Path to the transaction file.
    pub input_file: PathBuf,

    /// Minimum number of transactions an itemset must appear in.
    /// Must be positive.
    pub min_support_count: u64,

    /// Minimum confidence of a reported rule.
    /// A negative value skips rule generation entirely.
    /// Default: 0.5
    pub min_confidence: f64,

    /// Largest itemset size to mine. `None` means unbounded.
    pub max_len: Option<usize>,

    /// Directory receiving the output files.
    /// Default: "."
    pub output_dir: PathBuf,

    /// Default: "items01.txt"
    pub items_file: String,

    /// Default: "rules01.txt"
    pub rules_file: String,

    /// Default: "info01.txt"
    pub info_file: String,

    /// Whether to write the rendered outputs to disk.
    /// When false, results are kept in memory only.
    /// Default: true
    pub save_to_disk: bool,
}

impl MiningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> MiningConfigBuilder {
        MiningConfigBuilder::default()
    }

    /// Whether rules should be generated at all.
    pub fn generates_rules(&self) -> bool {
        self.min_confidence >= 0.0
    }

    pub fn items_path(&self) -> PathBuf {
        self.output_dir.join(&self.items_file)
    }

    pub fn rules_path(&self) -> PathBuf {
        self.output_dir.join(&self.rules_file)
    }

    pub fn info_path(&self) -> PathBuf {
        self.output_dir.join(&self.info_file)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.min_support_count == 0 {
            return Err(ConfigValidationError::NonPositiveSupportCount(0));
        }

        if self.min_confidence.is_nan() || self.min_confidence > 1.0 {
            return Err(ConfigValidationError::InvalidConfidence(self.min_confidence));
        }

        if self.max_len == Some(0) {
            return Err(ConfigValidationError::InvalidMaxLen);
        }

        for (field, name) in [
            ("items_file", &self.items_file),
            ("rules_file", &self.rules_file),
            ("info_file", &self.info_file),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyFileName(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Minimum support count must be greater than 0 (got {0})")]
    NonPositiveSupportCount(i64),

    #[error("Invalid minimum confidence: {0} (must be at most 1.0; negative skips rules)")]
    InvalidConfidence(f64),

    #[error("Maximum itemset length must be at least 1")]
    InvalidMaxLen,

    #[error("Output file name for '{0}' is empty")]
    EmptyFileName(String),

    #[error("Input file is required")]
    MissingInputFile,
}

impl From<ConfigValidationError> for MiningError {
    fn from(err: ConfigValidationError) -> Self {
        MiningError::InvalidInput(err.to_string())
    }
}

/// Builder for [`MiningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct MiningConfigBuilder {
    input_file: Option<PathBuf>,
    min_support_count: Option<i64>,
    min_confidence: Option<f64>,
    max_len: Option<usize>,
    output_dir: Option<PathBuf>,
    items_file: Option<String>,
    rules_file: Option<String>,
    info_file: Option<String>,
    save_to_disk: Option<bool>,
}

impl MiningConfigBuilder {
    /// Set the transaction file to read.
    pub fn input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = Some(path.into());
        self
    }

    /// Set the minimum support count.
    ///
    /// Accepts a signed value so that negative command-line input is
    /// reported as a validation error instead of a parse error.
    pub fn min_support_count(mut self, count: i64) -> Self {
        self.min_support_count = Some(count);
        self
    }

    /// Set the minimum confidence. Negative values disable rule generation.
    pub fn min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = Some(confidence);
        self
    }

    /// Limit mining to itemsets of at most `len` items.
    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn items_file(mut self, name: impl Into<String>) -> Self {
        self.items_file = Some(name.into());
        self
    }

    pub fn rules_file(mut self, name: impl Into<String>) -> Self {
        self.rules_file = Some(name.into());
        self
    }

    pub fn info_file(mut self, name: impl Into<String>) -> Self {
        self.info_file = Some(name.into());
        self
    }

    /// Enable or disable writing outputs to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `MiningConfig` or an error if validation fails.
    pub fn build(self) -> Result<MiningConfig, ConfigValidationError> {
        let input_file = self
            .input_file
            .ok_or(ConfigValidationError::MissingInputFile)?;

        let min_support_count = match self.min_support_count {
            Some(count) if count > 0 => count as u64,
            Some(count) => return Err(ConfigValidationError::NonPositiveSupportCount(count)),
            None => return Err(ConfigValidationError::NonPositiveSupportCount(0)),
        };

        let config = MiningConfig {
            input_file,
            min_support_count,
            min_confidence: self.min_confidence.unwrap_or(0.5),
            max_len: self.max_len,
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            items_file: self
                .items_file
                .unwrap_or_else(|| DEFAULT_ITEMS_FILE.to_string()),
            rules_file: self
                .rules_file
                .unwrap_or_else(|| DEFAULT_RULES_FILE.to_string()),
            info_file: self
                .info_file
                .unwrap_or_else(|| DEFAULT_INFO_FILE.to_string()),
            save_to_disk: self.save_to_disk.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MiningConfigBuilder {
        MiningConfig::builder().input_file("small.txt")
    }

    #[test]
    fn test_builder_defaults() {
        let config = base().min_support_count(200).build().unwrap();
        assert_eq!(config.min_support_count, 200);
        assert_eq!(config.min_confidence, 0.5);
        assert_eq!(config.items_file, "items01.txt");
        assert_eq!(config.rules_file, "rules01.txt");
        assert_eq!(config.info_file, "info01.txt");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.save_to_disk);
        assert!(config.generates_rules());
    }

    #[test]
    fn test_negative_confidence_skips_rules() {
        let config = base()
            .min_support_count(2)
            .min_confidence(-1.0)
            .build()
            .unwrap();
        assert!(!config.generates_rules());
    }

    #[test]
    fn test_validation_non_positive_support_count() {
        let result = base().min_support_count(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NonPositiveSupportCount(0)
        ));

        let result = base().min_support_count(-5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NonPositiveSupportCount(-5)
        ));
    }

    #[test]
    fn test_validation_confidence_above_one() {
        let result = base().min_support_count(1).min_confidence(1.5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidConfidence(_)
        ));
    }

    #[test]
    fn test_validation_missing_input() {
        let result = MiningConfig::builder().min_support_count(1).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::MissingInputFile
        ));
    }

    #[test]
    fn test_validation_error_maps_to_invalid_input() {
        let err: MiningError = ConfigValidationError::InvalidMaxLen.into();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_output_paths() {
        let config = base()
            .min_support_count(1)
            .output_dir("out")
            .info_file("info.txt")
            .build()
            .unwrap();
        assert_eq!(config.info_path(), PathBuf::from("out").join("info.txt"));
        assert_eq!(config.items_path(), PathBuf::from("out").join("items01.txt"));
    }

    #[test]
    fn test_config_serialization() {
        let config = base().min_support_count(3).max_len(2).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MiningConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.min_support_count, 3);
        assert_eq!(deserialized.max_len, Some(2));
    }
}
