//! Error types for index computation.

use thiserror::Error;

/// Errors raised while retrieving bands or computing the index.
#[derive(Debug, Error)]
pub enum NdviError {
    /// The item does not reference a required band.
    #[error("item {item_id} has no '{band}' asset")]
    MissingAsset { item_id: String, band: String },

    /// The raster could not be fetched.
    #[error("failed to retrieve {href}: {message}")]
    Retrieval { href: String, message: String },

    /// The raster payload could not be decoded.
    #[error("failed to decode raster: {0}")]
    Decode(String),

    /// The raster decodes but is not a single-band grid.
    #[error("unsupported raster layout: {0}")]
    UnsupportedLayout(String),

    #[error("raster has no pixels")]
    EmptyRaster,

    #[error("band shapes differ: red {red:?}, nir {nir:?}")]
    ShapeMismatch { red: [usize; 2], nir: [usize; 2] },

    /// A blocking decode/compute task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl NdviError {
    /// True for failures to obtain the input rasters.
    pub fn is_retrieval(&self) -> bool {
        matches!(
            self,
            NdviError::MissingAsset { .. }
                | NdviError::Retrieval { .. }
                | NdviError::Decode(_)
                | NdviError::UnsupportedLayout(_)
                | NdviError::EmptyRaster
        )
    }
}

/// Result alias for index operations.
pub type NdviResult<T> = std::result::Result<T, NdviError>;
