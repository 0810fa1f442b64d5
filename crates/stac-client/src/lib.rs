//! STAC catalog access for BloomWatch.
//!
//! Provides the serde models for STAC Item Search responses, the
//! [`Catalog`] trait the API service depends on, an HTTP implementation
//! ([`StacClient`]) and Planetary Computer asset signing ([`SasSigner`]).
//!
//! # Example
//!
//! ```no_run
//! use bloom_common::{Aoi, SearchWindow};
//! use stac_client::{Catalog, StacClient, StacClientConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StacClient::new(StacClientConfig::default())?;
//! let aoi = Aoi::from_json(serde_json::json!({"type": "Point", "coordinates": [-119.75, 35.15]}))?;
//! let items = client.search(&aoi, &SearchWindow::default()).await?;
//! println!("{} scenes", items.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod signing;

pub use client::{Catalog, StacClient, StacClientConfig};
pub use error::{StacError, StacResult};
pub use models::{StacAsset, StacItem, StacItemCollection, StacItemProperties, StacLink, StacSearchParams};
pub use signing::{SasSigner, PLANETARY_COMPUTER_BLOB_HOST};

/// Sentinel-2 Level-2A collection on the Planetary Computer.
pub const SENTINEL2_L2A: &str = "sentinel-2-l2a";

/// Microsoft Planetary Computer STAC API root.
pub const PLANETARY_COMPUTER_STAC_URL: &str = "https://planetarycomputer.microsoft.com/api/stac/v1";

/// Planetary Computer SAS signing endpoint.
pub const PLANETARY_COMPUTER_SAS_URL: &str = "https://planetarycomputer.microsoft.com/api/sas/v1";

/// Well-known Sentinel-2 asset keys.
pub mod bands {
    /// Band 4, red (665 nm).
    pub const RED: &str = "B04";
    /// Band 8, near-infrared (842 nm).
    pub const NIR: &str = "B08";
    /// Preview image.
    pub const THUMBNAIL: &str = "thumbnail";
    /// Planetary Computer's rendered preview, used when no thumbnail exists.
    pub const RENDERED_PREVIEW: &str = "rendered_preview";
}
