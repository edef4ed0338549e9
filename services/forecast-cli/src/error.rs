//! Errors from the external lookup services.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    #[error("Failed to decode {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} returned an invalid coordinate '{value}'")]
    InvalidCoordinate { service: &'static str, value: String },
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;
