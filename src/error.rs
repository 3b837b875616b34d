//! Error handling for battery dataset processing.
//!
//! Fatal errors (unreadable tables, missing inputs, empty aggregates) are
//! returned as [`BatteryError`]. Value-level failures that only degrade a
//! single field to a sentinel are described by [`ValueParseError`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatteryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Metadata file not found at path: {path}")]
    MetadataNotFound { path: PathBuf },

    #[error("Data directory not found at path: {path}")]
    DataDirNotFound { path: PathBuf },

    #[error("Failed to read table: {path} - {source}")]
    TableRead {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },

    #[error("Required column '{column}' missing from table: {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Cannot build {kind} aggregate: no input tables")]
    EmptyAggregate { kind: String },

    #[error("Report column '{column}' unusable: {reason}")]
    ReportColumn { column: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, BatteryError>;

/// Recoverable failure while parsing a single field value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueParseError {
    #[error("expected 6 timestamp fields, found {found}")]
    FieldCount { found: usize },

    #[error("timestamp field '{field}' is not numeric")]
    NonNumericField { field: String },

    #[error("timestamp fields do not form a valid calendar datetime")]
    InvalidDateTime,

    #[error("value is missing")]
    Missing,

    #[error("'{literal}' is not a complex literal")]
    MalformedComplex { literal: String },
}
