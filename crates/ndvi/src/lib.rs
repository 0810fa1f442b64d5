//! Vegetation index computation for Sentinel-2 scenes.
//!
//! The pipeline is three steps:
//! 1. [`BandReader`] fetches and decodes the red (B04) and near-infrared
//!    (B08) rasters referenced by a STAC item.
//! 2. [`IndexArray::from_bands`] computes `(NIR - Red) / (NIR + Red)` per
//!    pixel, mapping undefined cells to 0.
//! 3. [`classify`] reduces the array to a [`VegetationState`] using the
//!    mean of strictly positive cells against [`NDVI_THRESHOLD`].
//!
//! [`compute_index`] wires steps 1 and 2 together for one item.

pub mod band;
pub mod calculator;
pub mod classify;
pub mod error;
pub mod index;

pub use band::{decode_tiff, Band, BandReader, HttpBandReader, MemoryBandReader};
pub use calculator::compute_index;
pub use classify::{classify, positive_mean, VegetationState, NDVI_THRESHOLD};
pub use error::{NdviError, NdviResult};
pub use index::{IndexArray, NdviStats};
