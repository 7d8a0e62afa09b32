//! Error types for aerobank.
//!
//! Missing or physically invalid data is never an error here: derived values,
//! classification buckets and regressions report absence with `None`. This
//! enum covers I/O, parsing, configuration and broken call contracts.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for aerobank operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Dataset Errors ===
    /// A dataset file could not be read.
    #[error("failed to read dataset at {path}: {source}")]
    DatasetRead {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A dataset file was read but is not valid dataset JSON.
    #[error("failed to parse dataset at {path}: {source}")]
    DatasetParse {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Call Contract Errors ===
    /// A field name does not name any record attribute.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// An argument is outside the domain an operation accepts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for aerobank operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an unknown field error.
    #[must_use]
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField(name.into())
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Check if this error came from reading or parsing a dataset file.
    #[must_use]
    pub fn is_dataset_error(&self) -> bool {
        matches!(self, Self::DatasetRead { .. } | Self::DatasetParse { .. })
    }
}
