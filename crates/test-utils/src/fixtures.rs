//! STAC item and area-of-interest fixtures.

use serde_json::{json, Value};
use stac_client::StacItem;

/// Href scheme used by fixture items; resolves against a `MemoryBandReader`.
pub fn band_href(item_id: &str, band: &str) -> String {
    format!("mem://{item_id}/{band}.tif")
}

/// Raw JSON for a Sentinel-2 L2A item with red, NIR and thumbnail assets.
pub fn sentinel_item_json(id: &str) -> Value {
    json!({
        "type": "Feature",
        "stac_version": "1.0.0",
        "id": id,
        "collection": "sentinel-2-l2a",
        "bbox": [-120.0, 35.0, -119.0, 36.0],
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[-120.0, 35.0], [-119.0, 35.0], [-119.0, 36.0], [-120.0, 36.0], [-120.0, 35.0]]]
        },
        "properties": {
            "datetime": "2024-06-12T18:39:19.024000Z",
            "eo:cloud_cover": 3.5,
            "platform": "Sentinel-2B"
        },
        "assets": {
            "B04": {"href": band_href(id, "B04"), "type": "image/tiff; application=geotiff; profile=cloud-optimized"},
            "B08": {"href": band_href(id, "B08"), "type": "image/tiff; application=geotiff; profile=cloud-optimized"},
            "rendered_preview": {"href": format!("https://preview.example.com/{id}.png"), "type": "image/png"}
        },
        "links": []
    })
}

/// A Sentinel-2 item whose band hrefs follow [`band_href`].
pub fn sentinel_item(id: &str) -> StacItem {
    serde_json::from_value(sentinel_item_json(id)).expect("fixture item parses")
}

/// A Sentinel-2 item with one band asset removed.
pub fn item_without_band(id: &str, band: &str) -> StacItem {
    let mut item = sentinel_item(id);
    item.assets.remove(band);
    item
}

/// An item with no cloud cover, datetime or preview.
pub fn bare_item(id: &str) -> StacItem {
    serde_json::from_value(json!({
        "type": "Feature",
        "id": id,
        "properties": {},
        "assets": {}
    }))
    .expect("fixture item parses")
}

/// GeoJSON areas of interest.
pub mod aoi {
    use serde_json::{json, Value};

    /// Small farmland polygon in the San Joaquin Valley.
    pub fn farmland_polygon() -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[
                [-119.80, 35.10],
                [-119.70, 35.10],
                [-119.70, 35.20],
                [-119.80, 35.20],
                [-119.80, 35.10]
            ]]
        })
    }

    pub fn point(lon: f64, lat: f64) -> Value {
        json!({"type": "Point", "coordinates": [lon, lat]})
    }

    /// Polygon whose ring is not closed.
    pub fn open_ring() -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]
        })
    }

    /// Well-formed JSON that is not a geometry.
    pub fn not_a_geometry() -> Value {
        json!({"type": "Circle", "radius": 5})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_item_assets() {
        let item = sentinel_item("S2B_TEST");
        assert_eq!(item.asset("B04").unwrap().href, "mem://S2B_TEST/B04.tif");
        assert_eq!(item.cloud_cover(), Some(3.5));
        assert!(item.thumbnail_href().is_some());
    }

    #[test]
    fn test_item_without_band() {
        let item = item_without_band("x", "B08");
        assert!(item.asset("B08").is_none());
        assert!(item.asset("B04").is_some());
    }
}
