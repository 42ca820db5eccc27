//! Error types for the demand estimator.

use crate::types::Period;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the demand estimator.
#[derive(Error, Debug)]
pub enum Error {
    /// Bytes are not valid text in the attempted encoding.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Malformed delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A data row carries more fields than the header declares.
    #[error("Row {row} has {found} fields, header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A column is absent after header normalization.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A cell could not be read as a number.
    #[error("Non-numeric value {value:?} in column '{column}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// No parse configuration produced a table with a numeric CONSUMO column.
    #[error("Ingestion error: none of {attempts} configurations (delimiter, decimal, encoding) could read the file; last error: {last}")]
    Ingestion {
        attempts: usize,
        #[source]
        last: Box<Error>,
    },

    /// A required column is missing at estimation time.
    #[error("Processing error: required column '{column}' not found in table {period}")]
    Processing { column: String, period: Period },

    /// Estimation was requested before a period was loaded.
    #[error("Period {0} has not been loaded")]
    PeriodNotLoaded(Period),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Error::Decode(msg.into())
    }

    /// Create a processing error for a missing column.
    pub fn processing(column: impl Into<String>, period: Period) -> Self {
        Error::Processing {
            column: column.into(),
            period,
        }
    }

    /// Whether this is an ingestion failure (every configuration failed).
    pub fn is_ingestion(&self) -> bool {
        matches!(self, Error::Ingestion { .. })
    }

    /// Whether this is a processing failure (missing required column).
    pub fn is_processing(&self) -> bool {
        matches!(self, Error::Processing { .. })
    }
}
