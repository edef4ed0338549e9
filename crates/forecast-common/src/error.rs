//! Error types for parsing forecast table fields.

use thiserror::Error;

/// Result type alias using ParseError.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while interpreting raw dataset text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown forecast parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid hour offset column '{0}': expected a non-negative hour count such as '6h'")]
    InvalidHourOffset(String),

    #[error("Invalid forecast date: {0}")]
    InvalidDate(String),
}
