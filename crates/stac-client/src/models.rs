//! STAC (SpatioTemporal Asset Catalog) data types.
//!
//! Serde models for STAC Item Search (`POST /search`) requests and
//! responses, covering what BloomWatch needs: collection, intersects,
//! datetime and cloud-cover filtering, pagination via `links`, and asset
//! access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::bands;

// ---------------------------------------------------------------------------
// Search request
// ---------------------------------------------------------------------------

/// Body for `POST /search` (STAC API Item Search).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StacSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,

    /// GeoJSON geometry the items must intersect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intersects: Option<geojson::Geometry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    /// Query extension filter, e.g. `{"eo:cloud_cover": {"lt": 20}}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Pagination token (next page).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl StacSearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(mut self, collection: &str) -> Self {
        self.collections = Some(vec![collection.to_string()]);
        self
    }

    pub fn intersects(mut self, geometry: geojson::Geometry) -> Self {
        self.intersects = Some(geometry);
        self
    }

    /// Set datetime or datetime range (e.g. `"2024-06-01/2024-06-30"`).
    pub fn datetime(mut self, dt: &str) -> Self {
        self.datetime = Some(dt.to_string());
        self
    }

    /// Keep only items with `eo:cloud_cover` strictly below `max`.
    pub fn max_cloud_cover(mut self, max: f64) -> Self {
        self.query = Some(serde_json::json!({ "eo:cloud_cover": { "lt": max } }));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A STAC Item Collection (GeoJSON FeatureCollection).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacItemCollection {
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<StacItem>,

    #[serde(default)]
    pub links: Vec<StacLink>,

    #[serde(rename = "numberMatched", skip_serializing_if = "Option::is_none")]
    pub number_matched: Option<u64>,

    #[serde(rename = "numberReturned", skip_serializing_if = "Option::is_none")]
    pub number_returned: Option<u64>,
}

impl StacItemCollection {
    /// Find the `"next"` pagination link, if any.
    pub fn next_link(&self) -> Option<&StacLink> {
        self.links.iter().find(|l| l.rel == "next")
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A single STAC Item: one Sentinel-2 acquisition.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StacItem {
    #[serde(rename = "type", default = "feature_type")]
    pub type_: String,

    /// Unique item identifier.
    pub id: String,

    /// Footprint geometry, kept as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,

    /// Bounding box `[west, south, east, north]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    pub properties: StacItemProperties,

    #[serde(default)]
    pub assets: HashMap<String, StacAsset>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(default)]
    pub links: Vec<StacLink>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl StacItem {
    /// Get an asset by key.
    pub fn asset(&self, key: &str) -> Option<&StacAsset> {
        self.assets.get(key)
    }

    /// Acquisition timestamp, if the item carries a parseable one.
    pub fn acquired_at(&self) -> Option<DateTime<Utc>> {
        self.properties
            .datetime
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn cloud_cover(&self) -> Option<f64> {
        self.properties.eo_cloud_cover
    }

    /// Preview image href: the `thumbnail` asset, else the rendered preview.
    pub fn thumbnail_href(&self) -> Option<&str> {
        self.asset(bands::THUMBNAIL)
            .or_else(|| self.asset(bands::RENDERED_PREVIEW))
            .map(|a| a.href.as_str())
    }
}

/// STAC Item properties.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct StacItemProperties {
    /// ISO 8601 datetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    /// Cloud cover percentage (EO extension).
    #[serde(rename = "eo:cloud_cover", default, skip_serializing_if = "Option::is_none")]
    pub eo_cloud_cover: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// All other properties we don't model explicitly.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A single STAC Asset (file reference).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StacAsset {
    /// URL to the asset file.
    pub href: String,

    /// Media type (e.g. `"image/tiff; application=geotiff; profile=cloud-optimized"`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl StacAsset {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            type_: None,
            title: None,
            roles: None,
        }
    }
}

/// A STAC Link (used for pagination and related resources).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StacLink {
    /// Relationship: `"self"`, `"root"`, `"next"`, `"prev"`, etc.
    pub rel: String,

    pub href: String,

    /// HTTP method for the link (default GET, but `"next"` often uses POST).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Request body for POST-based pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,

    /// Merge mode: if true, merge body with the previous request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "id": "S2B_MSIL2A_20240612T183919_R070_T11SKV_20240613T013232",
      "bbox": [-120.1, 34.9, -118.9, 35.9],
      "properties": {
        "datetime": "2024-06-12T18:39:19.024000Z",
        "eo:cloud_cover": 3.4,
        "platform": "Sentinel-2B",
        "proj:epsg": 32611
      },
      "assets": {
        "B04": {
          "href": "https://sentinel2l2a01.blob.core.windows.net/sentinel2-l2/B04_10m.tif",
          "type": "image/tiff; application=geotiff; profile=cloud-optimized",
          "title": "Band 4 - Red - 10m",
          "roles": ["data"]
        },
        "B08": {
          "href": "https://sentinel2l2a01.blob.core.windows.net/sentinel2-l2/B08_10m.tif",
          "type": "image/tiff; application=geotiff; profile=cloud-optimized",
          "roles": ["data"]
        },
        "rendered_preview": {
          "href": "https://planetarycomputer.microsoft.com/api/data/v1/item/preview.png",
          "type": "image/png",
          "roles": ["overview"]
        }
      },
      "collection": "sentinel-2-l2a",
      "links": []
    }
  ],
  "links": [
    {
      "rel": "next",
      "href": "https://planetarycomputer.microsoft.com/api/stac/v1/search",
      "method": "POST",
      "body": {"token": "next:abc123"},
      "merge": true
    }
  ],
  "numberReturned": 1
}"#;

    #[test]
    fn parse_item_collection() {
        let col: StacItemCollection = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(col.type_, "FeatureCollection");
        assert_eq!(col.len(), 1);
        assert_eq!(col.number_returned, Some(1));
        assert_eq!(col.number_matched, None);
    }

    #[test]
    fn item_accessors() {
        let col: StacItemCollection = serde_json::from_str(FIXTURE).unwrap();
        let item = &col.features[0];

        assert_eq!(item.collection.as_deref(), Some("sentinel-2-l2a"));
        assert!((item.cloud_cover().unwrap() - 3.4).abs() < f64::EPSILON);
        assert!(item.asset(bands::RED).is_some());
        assert!(item.asset(bands::NIR).is_some());
        assert!(item.properties.extra.contains_key("proj:epsg"));

        let acquired = item.acquired_at().unwrap();
        assert_eq!(acquired.format("%Y-%m-%d").to_string(), "2024-06-12");
    }

    #[test]
    fn thumbnail_falls_back_to_rendered_preview() {
        let col: StacItemCollection = serde_json::from_str(FIXTURE).unwrap();
        let mut item = col.features[0].clone();
        assert!(item.thumbnail_href().unwrap().ends_with("preview.png"));

        item.assets.insert(
            bands::THUMBNAIL.to_string(),
            StacAsset::new("https://example.com/thumb.jpg"),
        );
        assert_eq!(item.thumbnail_href(), Some("https://example.com/thumb.jpg"));

        item.assets.clear();
        assert_eq!(item.thumbnail_href(), None);
    }

    #[test]
    fn pagination_link() {
        let col: StacItemCollection = serde_json::from_str(FIXTURE).unwrap();
        let next = col.next_link().unwrap();
        assert_eq!(next.method.as_deref(), Some("POST"));
        assert_eq!(next.merge, Some(true));
        assert_eq!(next.body.as_ref().unwrap()["token"], "next:abc123");
    }

    #[test]
    fn search_params_serialize() {
        let geometry: geojson::Geometry = serde_json::from_value(serde_json::json!({
            "type": "Point",
            "coordinates": [-119.75, 35.15]
        }))
        .unwrap();

        let params = StacSearchParams::new()
            .collection("sentinel-2-l2a")
            .intersects(geometry)
            .datetime("2024-06-01/2024-06-30")
            .max_cloud_cover(20.0)
            .limit(100);

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["collections"], serde_json::json!(["sentinel-2-l2a"]));
        assert_eq!(json["intersects"]["type"], "Point");
        assert_eq!(json["datetime"], "2024-06-01/2024-06-30");
        assert_eq!(json["query"]["eo:cloud_cover"]["lt"], 20.0);
        assert_eq!(json["limit"], 100);
        assert!(json.get("token").is_none());
    }

    #[test]
    fn empty_params_have_no_fields() {
        let json = serde_json::to_value(StacSearchParams::new()).unwrap();
        assert!(json.as_object().unwrap().is_empty());
    }
}
