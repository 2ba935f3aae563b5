//! Error types for the ESPP engine and its loaders

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EsppError {
    /// Plan cadence cannot partition a year (does not divide 12)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A financial input the engine refuses to compute with
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid date '{value}': {source}")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, EsppError>;
