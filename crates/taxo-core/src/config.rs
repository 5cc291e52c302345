//! Taxo Configuration Management
//!
//! Handles configuration from environment variables and TOML config files
//! with sensible defaults. Command-line arguments override both.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Recognition model configuration
    pub model: ModelConfig,

    /// Extraction behavior
    pub extraction: ExtractionConfig,

    /// Output locations
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("TAXO_MODEL_PATH") {
            config.model.path = Some(PathBuf::from(path));
        }

        if let Ok(column) = std::env::var("TAXO_TEXT_COLUMN") {
            config.extraction.text_column = column;
        }
        if let Ok(label) = std::env::var("TAXO_TAXON_LABEL") {
            config.extraction.taxon_label = label;
        }
        if let Ok(top_n) = std::env::var("TAXO_TOP_N") {
            config.extraction.top_n = top_n.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TAXO_TOP_N".to_string(),
                value: top_n,
            })?;
        }

        if let Ok(path) = std::env::var("TAXO_OUTPUT") {
            config.output.default_path = PathBuf::from(path);
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }
}

/// Recognition model configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to a lexicon model file. None loads the builtin English
    /// taxon lexicon bundled with the binary.
    pub path: Option<PathBuf>,
}

/// Extraction behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Column containing the text to analyze
    pub text_column: String,

    /// Label the recognition model assigns to taxonomic entities.
    /// A property of the chosen model, not of the aggregation logic.
    pub taxon_label: String,

    /// Delimiter used when joining a row's species into one field
    pub delimiter: String,

    /// How many top species to report in the console summary
    pub top_n: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            text_column: "abstract".to_string(),
            taxon_label: "TAXON".to_string(),
            delimiter: "; ".to_string(),
            top_n: 5,
        }
    }
}

/// Output location configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the annotated table goes when no --output is given
    pub default_path: PathBuf,

    /// Inserted before the extension to derive the summary file path
    pub summary_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from("data/output/results_with_species.csv"),
            summary_suffix: "_species_summary".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
