//! Application state for the BloomWatch API.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use ndvi::{BandReader, HttpBandReader};
use stac_client::{Catalog, SasSigner, StacClient};

use crate::config::ApiConfig;
use crate::item_cache::ItemCache;

/// Shared application state, injected into handlers as an `Extension`.
pub struct AppState {
    /// Scene catalog used for search and item lookups.
    pub catalog: Arc<dyn Catalog>,

    /// Reader for the red and NIR rasters.
    pub band_reader: Arc<dyn BandReader>,

    /// Items seen by recent searches.
    pub item_cache: ItemCache,

    pub config: ApiConfig,

    /// Present when a Prometheus recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the production state: an HTTP STAC client and an HTTP band
    /// reader sharing one connection pool.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let catalog = StacClient::with_client(client.clone(), config.stac_client_config());

        let signer = config
            .sign_assets
            .then(|| SasSigner::new(client.clone(), config.sas_url.clone()));
        let band_reader = HttpBandReader::new(client, signer);

        tracing::info!(
            catalog_url = %config.catalog_url,
            collection = %config.collection,
            sign_assets = config.sign_assets,
            resolution = ?config.resolution,
            "Application state initialized"
        );

        Ok(Self::with_components(
            config,
            Arc::new(catalog),
            Arc::new(band_reader),
        ))
    }

    /// Build state around an explicit catalog and band reader.
    pub fn with_components(
        config: ApiConfig,
        catalog: Arc<dyn Catalog>,
        band_reader: Arc<dyn BandReader>,
    ) -> Self {
        Self {
            item_cache: ItemCache::from_config(&config.cache),
            catalog,
            band_reader,
            config,
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
