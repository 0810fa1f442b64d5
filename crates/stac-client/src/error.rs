//! Error types for the STAC client.

use thiserror::Error;

/// Errors produced while talking to a STAC API.
#[derive(Debug, Error)]
pub enum StacError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("failed to parse STAC response: {0}")]
    Parse(String),

    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),

    #[error("asset signing failed: {0}")]
    Signing(String),
}

/// Result alias for STAC operations.
pub type StacResult<T> = std::result::Result<T, StacError>;
