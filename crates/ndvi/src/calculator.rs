//! Per-item NDVI computation.

use std::time::Instant;
use tracing::{debug, info};

use stac_client::{bands, StacItem};

use crate::band::BandReader;
use crate::error::{NdviError, NdviResult};
use crate::index::IndexArray;

fn band_href<'a>(item: &'a StacItem, band: &str) -> NdviResult<&'a str> {
    item.asset(band)
        .map(|asset| asset.href.as_str())
        .ok_or_else(|| NdviError::MissingAsset {
            item_id: item.id.clone(),
            band: band.to_string(),
        })
}

/// Compute the NDVI array for an item from its B04 (red) and B08 (NIR) assets.
///
/// Both bands are read concurrently. The per-pixel arithmetic runs on the
/// blocking pool so large scenes do not stall the async runtime.
pub async fn compute_index(item: &StacItem, reader: &dyn BandReader) -> NdviResult<IndexArray> {
    let red_href = band_href(item, bands::RED)?;
    let nir_href = band_href(item, bands::NIR)?;

    let start = Instant::now();
    let (red, nir) = tokio::try_join!(reader.read_band(red_href), reader.read_band(nir_href))?;
    debug!(
        item_id = %item.id,
        width = red.width,
        height = red.height,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Read red and NIR bands"
    );

    let ndvi = tokio::task::spawn_blocking(move || IndexArray::from_bands(&red, &nir))
        .await
        .map_err(|e| NdviError::Task(e.to_string()))??;

    info!(
        item_id = %item.id,
        rows = ndvi.rows(),
        cols = ndvi.cols(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Computed NDVI"
    );

    Ok(ndvi)
}
