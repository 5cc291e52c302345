//! Taxo Core - Shared error taxonomy and configuration
//!
//! This crate defines the abstractions used throughout the taxo pipeline:
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, ExtractionConfig, LoggingConfig, ModelConfig, OutputConfig,
};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for taxo operations
///
/// Every error is fatal to the run: there is no partial-success mode, no
/// skip-and-continue, no retry.
#[derive(Error, Debug)]
pub enum TaxoError {
    #[error("input file not found: {0}")]
    NotFound(String),

    #[error("failed to parse input as tabular data: {0}")]
    Parse(String),

    /// The message enumerates the actual columns so the caller can
    /// self-correct.
    #[error("column '{column}' not found; available columns: {available}")]
    MissingColumn { column: String, available: String },

    #[error("failed to load recognition model: {0}")]
    ModelLoad(String),

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TaxoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message_lists_available() {
        let err = TaxoError::MissingColumn {
            column: "abstract".to_string(),
            available: "title, year".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("'abstract'"));
        assert!(message.contains("title, year"));
    }

    #[test]
    fn test_not_found_message() {
        let err = TaxoError::NotFound("papers.csv".to_string());
        assert_eq!(err.to_string(), "input file not found: papers.csv");
    }
}
