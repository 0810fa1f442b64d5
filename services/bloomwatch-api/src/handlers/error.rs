//! Mapping from lower-layer failures to HTTP error responses.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use bloom_common::BloomError;
use ndvi::NdviError;

/// Handler error. Renders as `{status, title, detail}` JSON.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub BloomError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Classify an index failure for `item_id`.
///
/// Missing or unreadable bands are retrieval failures; everything else is a
/// computation failure. Both render as 500.
pub fn ndvi_failure(item_id: &str, err: &NdviError) -> BloomError {
    let message = format!("Failed to process item {}: {}", item_id, err);
    if err.is_retrieval() {
        BloomError::Retrieval(message)
    } else {
        BloomError::Computation(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        let json = serde_json::to_string(&self.0.to_body()).unwrap_or_default();
        (status, [(header::CONTENT_TYPE, "application/json")], json).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_asset_is_retrieval() {
        let err = NdviError::MissingAsset {
            item_id: "S2A".to_string(),
            band: "B08".to_string(),
        };
        let mapped = ndvi_failure("S2A", &err);
        assert!(matches!(mapped, BloomError::Retrieval(_)));
        assert!(mapped.to_string().starts_with("Failed to process item S2A:"));
        assert!(mapped.to_string().contains("B08"));
    }

    #[test]
    fn test_shape_mismatch_is_computation() {
        let err = NdviError::ShapeMismatch {
            red: [2, 2],
            nir: [3, 3],
        };
        assert!(matches!(ndvi_failure("x", &err), BloomError::Computation(_)));
    }

    #[test]
    fn test_status_mapping() {
        let err = ApiError(BloomError::InvalidInput("bad".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
