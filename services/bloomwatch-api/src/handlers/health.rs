//! Health and metrics handlers.

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::metrics::record_cache_stats;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "BloomWatch API is healthy!".to_string(),
    })
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    record_cache_stats(state.item_cache.stats());

    let body = match &state.prometheus {
        Some(handle) => handle.render(),
        None => String::new(),
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.message, "BloomWatch API is healthy!");
    }
}
