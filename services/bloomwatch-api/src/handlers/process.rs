//! `POST /process/{itemId}`: NDVI statistics and vegetation state for a scene.

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use bloom_common::BloomError;
use ndvi::{classify, compute_index, NdviStats, VegetationState};
use stac_client::StacItem;

use crate::config::ResolutionMode;
use crate::handlers::error::ndvi_failure;
use crate::handlers::ApiError;
use crate::metrics::{outcome, record_process};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub item_id: String,
    pub vegetation_state: VegetationState,
    pub ndvi_stats: NdviStats,
}

async fn fetch_from_catalog(state: &AppState, item_id: &str) -> Result<Option<StacItem>, BloomError> {
    let item = state.catalog.fetch_item(item_id).await.map_err(|e| {
        BloomError::Retrieval(format!("Failed to process item {}: {}", item_id, e))
    })?;

    if let Some(item) = &item {
        state.item_cache.put(item.clone()).await;
    }
    Ok(item)
}

/// Find the descriptor for `item_id` according to the resolution mode.
pub async fn resolve_item(state: &AppState, item_id: &str) -> Result<StacItem, BloomError> {
    let resolved = match state.config.resolution {
        ResolutionMode::Cache => state.item_cache.get(item_id).await,
        ResolutionMode::Catalog => fetch_from_catalog(state, item_id).await?,
        ResolutionMode::CacheThenCatalog => match state.item_cache.get(item_id).await {
            Some(item) => Some(item),
            None => {
                debug!(item_id, "Item not cached, asking catalog");
                fetch_from_catalog(state, item_id).await?
            }
        },
    };

    resolved.ok_or_else(|| BloomError::NotFound(format!("Item {} not found", item_id)))
}

async fn process(state: &AppState, item_id: &str) -> Result<ProcessResponse, BloomError> {
    let item = resolve_item(state, item_id).await?;

    let ndvi = compute_index(&item, state.band_reader.as_ref())
        .await
        .map_err(|e| ndvi_failure(item_id, &e))?;

    let (ndvi_stats, vegetation_state) =
        tokio::task::spawn_blocking(move || (ndvi.stats(), classify(&ndvi)))
            .await
            .map_err(|e| {
                BloomError::Computation(format!("Failed to process item {}: {}", item_id, e))
            })?;

    info!(
        item_id,
        state = %vegetation_state,
        mean = ndvi_stats.mean,
        "Classified scene"
    );

    Ok(ProcessResponse {
        item_id: item_id.to_string(),
        vegetation_state,
        ndvi_stats,
    })
}

/// POST /process/{itemId}
pub async fn process_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let start = Instant::now();
    let result = process(&state, &item_id).await;

    let label = match &result {
        Ok(_) => outcome::OK,
        Err(BloomError::NotFound(_)) => outcome::NOT_FOUND,
        Err(_) => outcome::ERROR,
    };
    record_process(label, start.elapsed());

    Ok(Json(result?))
}
