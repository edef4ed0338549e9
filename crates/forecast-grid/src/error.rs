//! Error types for the forecast grid.

use forecast_common::ForecastParam;
use thiserror::Error;

/// Errors raised when building a dataset or issuing a query.
///
/// Missing coverage and empty radius selections are not errors; they are
/// reported through [`crate::Interpolated`] and [`crate::Aggregate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// The dataset contains no samples.
    #[error("dataset contains no samples")]
    EmptyDataset,

    /// Two samples share a coordinate within one parameter.
    #[error("duplicate {param} sample at ({latitude}, {longitude})")]
    DuplicateSample {
        param: ForecastParam,
        latitude: f64,
        longitude: f64,
    },

    /// A sample coordinate is NaN or infinite.
    #[error("non-finite {param} sample coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        param: ForecastParam,
        latitude: f64,
        longitude: f64,
    },

    /// The requested parameter is not present in the loaded dataset.
    #[error("parameter not present in dataset: {0}")]
    InvalidParameter(ForecastParam),

    /// The offset puts the valid time outside the representable date range.
    #[error("hour offset {0} is out of range")]
    InvalidTimeOffset(u32),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl GridError {
    /// Create a ConfigError.
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
