//! Error types for the ingest crate.

use std::path::PathBuf;

use forecast_grid::GridError;
use thiserror::Error;

/// Errors that can occur while loading a forecast table.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("No CSV files found in {0}")]
    NoDataFiles(PathBuf),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Column '{0}' is not an hour offset (expected e.g. '6h')")]
    InvalidHourColumn(String),

    #[error("Hour offset {0} appears in more than one column")]
    DuplicateHourColumn(u32),

    #[error("Line {line}: unknown parameter '{name}'")]
    UnknownParameter { line: u64, name: String },

    #[error("Line {line}: invalid forecast date '{value}'")]
    InvalidDate { line: u64, value: String },

    #[error("Line {line}: invalid {column} '{value}'")]
    InvalidCoordinate {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Line {line}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Invalid dataset: {0}")]
    Grid(#[from] GridError),
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
