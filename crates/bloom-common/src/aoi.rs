//! Area of interest geometry.
//!
//! An [`Aoi`] wraps a GeoJSON geometry in WGS84 lon/lat and is only ever
//! used as a spatial filter for catalog searches. Validation is limited to
//! what a STAC `intersects` filter needs: finite coordinates inside the
//! geographic domain and well-formed rings.

use geojson::{Geometry, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating an AOI geometry.
#[derive(Debug, Error, PartialEq)]
pub enum AoiError {
    #[error("geometry is not valid GeoJSON: {0}")]
    Parse(String),

    #[error("geometry has no coordinates")]
    EmptyGeometry,

    #[error("position must have 2 or 3 coordinates, got {0}")]
    BadPosition(usize),

    #[error("coordinate ({lon}, {lat}) is outside the WGS84 domain")]
    OutOfRange { lon: f64, lat: f64 },

    #[error("polygon ring needs at least 4 positions, got {0}")]
    RingTooShort(usize),

    #[error("polygon ring is not closed")]
    RingNotClosed,

    #[error("geometry type {0} is not supported as a search area")]
    Unsupported(&'static str),
}

/// A validated area of interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Aoi(Geometry);

impl Aoi {
    /// Validate a GeoJSON geometry as an AOI.
    pub fn from_geometry(geometry: Geometry) -> Result<Self, AoiError> {
        validate_value(&geometry.value)?;
        Ok(Self(geometry))
    }

    /// Parse and validate an AOI from a raw JSON value.
    pub fn from_json(value: serde_json::Value) -> Result<Self, AoiError> {
        let geometry: Geometry =
            serde_json::from_value(value).map_err(|e| AoiError::Parse(e.to_string()))?;
        Self::from_geometry(geometry)
    }

    /// The underlying GeoJSON geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.0
    }

    /// GeoJSON type name of the geometry.
    pub fn kind(&self) -> &'static str {
        match self.0.value {
            Value::Point(_) => "Point",
            Value::MultiPoint(_) => "MultiPoint",
            Value::LineString(_) => "LineString",
            Value::MultiLineString(_) => "MultiLineString",
            Value::Polygon(_) => "Polygon",
            Value::MultiPolygon(_) => "MultiPolygon",
            Value::GeometryCollection(_) => "GeometryCollection",
        }
    }
}

impl<'de> Deserialize<'de> for Aoi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let geometry = Geometry::deserialize(deserializer)?;
        Aoi::from_geometry(geometry).map_err(serde::de::Error::custom)
    }
}

fn validate_value(value: &Value) -> Result<(), AoiError> {
    match value {
        Value::Point(p) => validate_position(p),
        Value::MultiPoint(points) | Value::LineString(points) => {
            if points.is_empty() {
                return Err(AoiError::EmptyGeometry);
            }
            points.iter().try_for_each(|p| validate_position(p))
        }
        Value::MultiLineString(lines) => {
            if lines.is_empty() {
                return Err(AoiError::EmptyGeometry);
            }
            for line in lines {
                if line.is_empty() {
                    return Err(AoiError::EmptyGeometry);
                }
                line.iter().try_for_each(|p| validate_position(p))?;
            }
            Ok(())
        }
        Value::Polygon(rings) => validate_polygon(rings),
        Value::MultiPolygon(polygons) => {
            if polygons.is_empty() {
                return Err(AoiError::EmptyGeometry);
            }
            polygons.iter().try_for_each(|rings| validate_polygon(rings))
        }
        Value::GeometryCollection(_) => Err(AoiError::Unsupported("GeometryCollection")),
    }
}

fn validate_polygon(rings: &[Vec<Vec<f64>>]) -> Result<(), AoiError> {
    if rings.is_empty() {
        return Err(AoiError::EmptyGeometry);
    }
    for ring in rings {
        if ring.len() < 4 {
            return Err(AoiError::RingTooShort(ring.len()));
        }
        ring.iter().try_for_each(|p| validate_position(p))?;
        if ring.first() != ring.last() {
            return Err(AoiError::RingNotClosed);
        }
    }
    Ok(())
}

fn validate_position(position: &[f64]) -> Result<(), AoiError> {
    if position.len() < 2 || position.len() > 3 {
        return Err(AoiError::BadPosition(position.len()));
    }
    let (lon, lat) = (position[0], position[1]);
    if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180.0 || lat.abs() > 90.0 {
        return Err(AoiError::OutOfRange { lon, lat });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_point_aoi() {
        let aoi = Aoi::from_json(json!({"type": "Point", "coordinates": [-119.75, 35.15]})).unwrap();
        assert_eq!(aoi.kind(), "Point");
        assert_eq!(aoi.geometry().value, Value::Point(vec![-119.75, 35.15]));
    }

    #[test]
    fn test_polygon_aoi() {
        let aoi = Aoi::from_json(json!({
            "type": "Polygon",
            "coordinates": [[[-120.0, 35.0], [-119.5, 35.0], [-119.5, 35.4], [-120.0, 35.4], [-120.0, 35.0]]]
        }))
        .unwrap();
        assert_eq!(aoi.kind(), "Polygon");
    }

    #[test]
    fn test_rejects_open_ring() {
        let err = Aoi::from_json(json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]
        }))
        .unwrap_err();
        assert_eq!(err, AoiError::RingNotClosed);
    }

    #[test]
    fn test_rejects_short_ring() {
        let err = Aoi::from_json(json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]
        }))
        .unwrap_err();
        assert_eq!(err, AoiError::RingTooShort(3));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = Aoi::from_json(json!({"type": "Point", "coordinates": [200.0, 10.0]})).unwrap_err();
        assert!(matches!(err, AoiError::OutOfRange { .. }));
    }

    #[test]
    fn test_rejects_non_geometry() {
        let err = Aoi::from_json(json!({"hello": "world"})).unwrap_err();
        assert!(matches!(err, AoiError::Parse(_)));
    }

    #[test]
    fn test_rejects_geometry_collection() {
        let err = Aoi::from_json(json!({
            "type": "GeometryCollection",
            "geometries": [{"type": "Point", "coordinates": [0.0, 0.0]}]
        }))
        .unwrap_err();
        assert_eq!(err, AoiError::Unsupported("GeometryCollection"));
    }

    #[test]
    fn test_serializes_as_plain_geometry() {
        let raw = json!({"type": "Point", "coordinates": [10.0, 20.0]});
        let aoi = Aoi::from_json(raw.clone()).unwrap();
        let value = serde_json::to_value(&aoi).unwrap();

        assert_eq!(value["type"], "Point");
        assert_eq!(value["coordinates"], raw["coordinates"]);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<Aoi, _> =
            serde_json::from_str(r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#);
        assert!(ok.is_ok());

        let bad: Result<Aoi, _> =
            serde_json::from_str(r#"{"type": "Point", "coordinates": [1.0, 95.0]}"#);
        assert!(bad.is_err());
    }
}
