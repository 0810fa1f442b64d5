//! Error types for BloomWatch services.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aoi::AoiError;

/// Result type alias using BloomError.
pub type BloomResult<T> = Result<T, BloomError>;

/// Request-level error taxonomy.
///
/// Lower layers report their own error enums; handlers fold them into one
/// of these variants, which owns the HTTP status mapping.
#[derive(Debug, Error)]
pub enum BloomError {
    /// Empty search result or unresolved item id.
    #[error("{0}")]
    NotFound(String),

    /// Caller supplied something unusable (e.g. an invalid AOI geometry).
    #[error("{0}")]
    InvalidInput(String),

    /// Catalog unreachable, band asset missing, raster unreadable.
    #[error("{0}")]
    Retrieval(String),

    /// Index computation could not be completed.
    #[error("{0}")]
    Computation(String),
}

impl BloomError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            BloomError::NotFound(_) => 404,
            BloomError::InvalidInput(_) => 400,
            BloomError::Retrieval(_) | BloomError::Computation(_) => 500,
        }
    }

    /// Short title matching the status code.
    pub fn title(&self) -> &'static str {
        match self {
            BloomError::NotFound(_) => "Not Found",
            BloomError::InvalidInput(_) => "Bad Request",
            BloomError::Retrieval(_) | BloomError::Computation(_) => "Internal Server Error",
        }
    }

    /// Convert to the JSON body returned to callers.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            status: self.status_code(),
            title: self.title().to_string(),
            detail: self.to_string(),
        }
    }
}

impl From<AoiError> for BloomError {
    fn from(err: AoiError) -> Self {
        BloomError::InvalidInput(format!("Invalid area of interest: {}", err))
    }
}

/// JSON error body returned for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// HTTP status code.
    pub status: u16,

    /// Human-readable title.
    pub title: String,

    /// Message derived from the underlying failure.
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(BloomError::NotFound("x".to_string()).status_code(), 404);
        assert_eq!(BloomError::InvalidInput("x".to_string()).status_code(), 400);
        assert_eq!(BloomError::Retrieval("x".to_string()).status_code(), 500);
        assert_eq!(BloomError::Computation("x".to_string()).status_code(), 500);
    }

    #[test]
    fn test_error_body_keeps_message() {
        let err = BloomError::Retrieval("Failed to process item abc: connection reset".to_string());
        let body = err.to_body();

        assert_eq!(body.status, 500);
        assert_eq!(body.title, "Internal Server Error");
        assert!(body.detail.contains("abc"));
        assert!(body.detail.contains("connection reset"));
    }

    #[test]
    fn test_aoi_error_maps_to_bad_request() {
        let err: BloomError = AoiError::EmptyGeometry.into();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().starts_with("Invalid area of interest"));
    }
}
