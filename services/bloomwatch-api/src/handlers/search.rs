//! `POST /search`: find recent low-cloud Sentinel-2 scenes over an AOI.

use axum::{extract::Extension, Json};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use bloom_common::{Aoi, AoiError, BloomError, SearchWindow};
use stac_client::StacItem;

use crate::handlers::ApiError;
use crate::metrics::{outcome, record_search};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub datetime: Option<String>,
    pub cloud_cover: Option<f64>,
    pub thumbnail_url: Option<String>,
}

impl From<&StacItem> for SearchResult {
    fn from(item: &StacItem) -> Self {
        Self {
            id: item.id.clone(),
            datetime: item
                .acquired_at()
                .map(|dt| dt.to_rfc3339())
                .or_else(|| item.properties.datetime.clone()),
            cloud_cover: item.cloud_cover(),
            thumbnail_url: item.thumbnail_href().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub search_results: Vec<SearchResult>,
}

fn parse_aoi(body: &[u8]) -> Result<Aoi, BloomError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| AoiError::Parse(e.to_string()))?;
    Ok(Aoi::from_json(value)?)
}

/// POST /search
///
/// Body is a GeoJSON geometry. Every returned scene is cached for a later
/// `/process/{itemId}`.
pub async fn search_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SearchResponse>, ApiError> {
    let aoi = parse_aoi(&body).map_err(|e| {
        record_search(outcome::INVALID, 0);
        e
    })?;

    let days = state.config.search_window_days;
    let window = SearchWindow::trailing_from_now(days);
    info!(aoi = aoi.kind(), datetime = %window.to_stac_interval(), "Searching scenes");

    let items = state.catalog.search(&aoi, &window).await.map_err(|e| {
        record_search(outcome::ERROR, 0);
        BloomError::Retrieval(format!("Failed to search for scenes: {}", e))
    })?;

    if items.is_empty() {
        record_search(outcome::NOT_FOUND, 0);
        return Err(BloomError::NotFound(format!(
            "No Sentinel-2 scenes found for the area of interest in the last {} days",
            days
        ))
        .into());
    }

    state.item_cache.put_all(&items).await;
    record_search(outcome::OK, items.len());
    info!(count = items.len(), "Search complete");

    Ok(Json(SearchResponse {
        search_results: items.iter().map(SearchResult::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures::{bare_item, sentinel_item};

    #[test]
    fn test_search_result_fields() {
        let result = SearchResult::from(&sentinel_item("S2B_1"));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["id"], "S2B_1");
        assert_eq!(json["cloudCover"], 3.5);
        assert_eq!(json["thumbnailUrl"], "https://preview.example.com/S2B_1.png");
        assert!(json["datetime"].as_str().unwrap().starts_with("2024-06-12T18:39:19"));
    }

    #[test]
    fn test_search_result_without_optional_fields() {
        let json = serde_json::to_value(SearchResult::from(&bare_item("x"))).unwrap();
        assert!(json["thumbnailUrl"].is_null());
        assert!(json["cloudCover"].is_null());
        assert!(json["datetime"].is_null());
    }

    #[test]
    fn test_parse_aoi_rejects_garbage() {
        let err = parse_aoi(b"{not json").unwrap_err();
        assert!(matches!(err, BloomError::InvalidInput(_)));
    }
}
