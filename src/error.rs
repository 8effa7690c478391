//! @ai:module:intent Define error types for result parsing and chart rendering
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all report operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse result file name {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("No \"Average\" row found in {path}")]
    MissingSummary { path: PathBuf },

    #[error("More than one \"Average\" row found in {path}")]
    DuplicateSummary { path: PathBuf },

    #[error("Invalid value {value:?} for column {column:?} in {path}")]
    InvalidValue {
        path: PathBuf,
        column: String,
        value: String,
    },

    #[error("Column {column:?} appears more than once in {path}")]
    DuplicateMetric { path: PathBuf, column: String },

    #[error("Required metric {metric:?} missing from {path}")]
    MissingMetric { path: PathBuf, metric: String },

    #[error("No summary for replications={replications}, duration={duration}")]
    Lookup { replications: u32, duration: f64 },

    #[error("Metric {metric:?} missing for replications={replications}, duration={duration}")]
    UnknownMetric {
        replications: u32,
        duration: f64,
        metric: String,
    },

    #[error("Failed to render chart {chart}: {message}")]
    Chart { chart: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
