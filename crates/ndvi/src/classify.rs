//! Vegetation-state classification.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::index::IndexArray;

/// Mean NDVI over vegetated cells above which a scene counts as high vegetation.
pub const NDVI_THRESHOLD: f64 = 0.4;

/// Two-way vegetation label for a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VegetationState {
    #[serde(rename = "High Vegetation")]
    High,
    #[serde(rename = "Low Vegetation")]
    Low,
}

impl VegetationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VegetationState::High => "High Vegetation",
            VegetationState::Low => "Low Vegetation",
        }
    }
}

impl fmt::Display for VegetationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mean of the cells strictly greater than zero.
///
/// Zero cells (including those normalized from 0/0) and negative cells are
/// excluded. Returns `None` when no cell is positive.
pub fn positive_mean(ndvi: &IndexArray) -> Option<f64> {
    let (sum, count) = ndvi
        .values()
        .par_iter()
        .filter(|&&v| v > 0.0)
        .fold(|| (0.0f64, 0usize), |(sum, count), &v| (sum + v as f64, count + 1))
        .reduce(|| (0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Classify a scene from its NDVI array.
///
/// An array with no positive cell is always [`VegetationState::Low`].
pub fn classify(ndvi: &IndexArray) -> VegetationState {
    match positive_mean(ndvi) {
        Some(mean) if mean > NDVI_THRESHOLD => VegetationState::High,
        _ => VegetationState::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(values: &[f32]) -> IndexArray {
        IndexArray::new(1, values.len(), values.to_vec()).unwrap()
    }

    #[test]
    fn test_low_vegetation_one_third() {
        let ndvi = IndexArray::new(2, 2, vec![1.0 / 3.0; 4]).unwrap();
        assert!((positive_mean(&ndvi).unwrap() - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(classify(&ndvi), VegetationState::Low);
    }

    #[test]
    fn test_high_vegetation() {
        let ndvi = array(&[0.6, 0.7, 0.8, 0.5]);
        assert_eq!(classify(&ndvi), VegetationState::High);
    }

    #[test]
    fn test_non_positive_cells_are_ignored() {
        // Water and bare soil drag the full mean down, but only positive
        // cells count toward the classification.
        let ndvi = array(&[0.6, 0.6, -0.5, -0.5, 0.0, 0.0]);
        assert!((positive_mean(&ndvi).unwrap() - 0.6).abs() < 1e-6);
        assert_eq!(classify(&ndvi), VegetationState::High);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let ndvi = array(&[0.4, 0.4]);
        assert_eq!(classify(&ndvi), VegetationState::Low);
    }

    #[test]
    fn test_all_zero_is_low() {
        let ndvi = IndexArray::new(2, 2, vec![0.0; 4]).unwrap();
        assert_eq!(positive_mean(&ndvi), None);
        assert_eq!(classify(&ndvi), VegetationState::Low);
    }

    #[test]
    fn test_all_negative_is_low() {
        let ndvi = array(&[-0.9, -0.2, -1.0]);
        assert_eq!(positive_mean(&ndvi), None);
        assert_eq!(classify(&ndvi), VegetationState::Low);
    }

    #[test]
    fn test_labels() {
        assert_eq!(VegetationState::High.to_string(), "High Vegetation");
        assert_eq!(
            serde_json::to_value(VegetationState::Low).unwrap(),
            serde_json::json!("Low Vegetation")
        );
    }
}
