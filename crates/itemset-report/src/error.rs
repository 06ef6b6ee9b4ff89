//! Custom error types for the itemset reporting pipeline.
//!
//! This module provides the error hierarchy using `thiserror` so that every
//! failure (bad input lines, empty aggregates, invalid thresholds) reaches
//! the caller with a stable error code.
//!
//! Errors are serializable, allowing them to be embedded in the JSON
//! report output.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the reporting pipeline.
#[derive(Error, Debug)]
pub enum MiningError {
    /// A value supplied by the caller is out of range (non-positive totals,
    /// non-positive minimum support count, supports outside `[0, 1]`).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An operation that needs at least one element received none.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// An input line does not parse as the expected record.
    #[error("Malformed line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<MiningError>,
    },
}

impl MiningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        MiningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::EmptyInput(_) => "EMPTY_INPUT",
            Self::MalformedLine { .. } => "MALFORMED_LINE",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the caller's input rather than
    /// by the environment (filesystem, serialization).
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::InvalidInput(_) | Self::EmptyInput(_) | Self::MalformedLine { .. } => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for MiningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("MiningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for reporting operations.
pub type Result<T> = std::result::Result<T, MiningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| MiningError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| MiningError::Io(e).with_context(context))
    }
}
