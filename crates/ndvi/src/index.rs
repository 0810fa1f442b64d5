//! Normalized difference index arrays.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::band::Band;
use crate::error::{NdviError, NdviResult};

/// Per-pixel NDVI values for one scene, row-major.
///
/// Values lie in [-1, 1]. Cells where the ratio is undefined (NIR + Red = 0)
/// hold 0, so "no data" and "zero index" are indistinguishable.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexArray {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

/// Summary statistics over every cell of an [`IndexArray`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NdviStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// `[rows, cols]`
    pub shape: [usize; 2],
}

/// `(nir - red) / (nir + red)`, with non-finite results mapped to 0.
#[inline]
pub fn normalized_difference(nir: f32, red: f32) -> f32 {
    let value = (nir - red) / (nir + red);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl IndexArray {
    /// Build from existing values. `data.len()` must equal `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> NdviResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(NdviError::EmptyRaster);
        }
        if data.len() != rows * cols {
            return Err(NdviError::UnsupportedLayout(format!(
                "{} values do not fill a {}x{} grid",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Compute NDVI from red and near-infrared bands of the same shape.
    pub fn from_bands(red: &Band, nir: &Band) -> NdviResult<Self> {
        if red.shape() != nir.shape() {
            return Err(NdviError::ShapeMismatch {
                red: red.shape(),
                nir: nir.shape(),
            });
        }

        let data: Vec<f32> = nir
            .data
            .par_iter()
            .zip(red.data.par_iter())
            .map(|(&n, &r)| normalized_difference(n, r))
            .collect();

        Self::new(red.height, red.width, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `[rows, cols]`
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Min, max and mean over all cells.
    pub fn stats(&self) -> NdviStats {
        let (min, max, sum) = self
            .data
            .par_iter()
            .fold(
                || (f64::INFINITY, f64::NEG_INFINITY, 0.0f64),
                |(min, max, sum), &v| {
                    let v = v as f64;
                    (min.min(v), max.max(v), sum + v)
                },
            )
            .reduce(
                || (f64::INFINITY, f64::NEG_INFINITY, 0.0f64),
                |a, b| (a.0.min(b.0), a.1.max(b.1), a.2 + b.2),
            );

        NdviStats {
            min,
            max,
            mean: sum / self.data.len() as f64,
            shape: self.shape(),
        }
    }
}
