//! BloomWatch API Service Library
//!
//! HTTP surface for Sentinel-2 scene search and NDVI-based vegetation
//! classification.

pub mod config;
pub mod handlers;
pub mod item_cache;
pub mod metrics;
pub mod state;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the service router with its middleware stack.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .route("/search", post(handlers::search::search_handler))
        .route("/process/:item_id", post(handlers::process::process_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
