//! Async STAC client for scene search and item lookup.

use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, info};

use bloom_common::{Aoi, SearchWindow};

use crate::error::{StacError, StacResult};
use crate::models::{StacItem, StacItemCollection, StacLink, StacSearchParams};
use crate::{PLANETARY_COMPUTER_STAC_URL, SENTINEL2_L2A};

/// Scene catalog used by the API handlers.
///
/// `search` returns the full matched set (empty when nothing matches).
/// `fetch_item` distinguishes an unknown id (`Ok(None)`) from an upstream
/// failure (`Err`).
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search(&self, aoi: &Aoi, window: &SearchWindow) -> StacResult<Vec<StacItem>>;

    async fn fetch_item(&self, item_id: &str) -> StacResult<Option<StacItem>>;
}

/// Configuration for [`StacClient`].
#[derive(Debug, Clone)]
pub struct StacClientConfig {
    /// STAC API root, e.g. `https://planetarycomputer.microsoft.com/api/stac/v1`.
    pub catalog_url: String,
    /// Collection searched and used for item lookups.
    pub collection: String,
    /// Items with `eo:cloud_cover` at or above this value are filtered out server-side.
    pub max_cloud_cover: f64,
    /// Page size requested from the catalog.
    pub page_limit: u32,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for StacClientConfig {
    fn default() -> Self {
        Self {
            catalog_url: PLANETARY_COMPUTER_STAC_URL.to_string(),
            collection: SENTINEL2_L2A.to_string(),
            max_cloud_cover: 20.0,
            page_limit: 100,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// HTTP client for a STAC API.
pub struct StacClient {
    client: reqwest::Client,
    config: StacClientConfig,
}

impl StacClient {
    pub fn new(config: StacClientConfig) -> StacResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Build on top of an existing `reqwest::Client` (shares its connection pool).
    pub fn with_client(client: reqwest::Client, config: StacClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &StacClientConfig {
        &self.config
    }

    /// `<root>/search`
    pub fn search_url(&self) -> String {
        format!("{}/search", self.config.catalog_url.trim_end_matches('/'))
    }

    /// `<root>/collections/<collection>/items/<id>`
    pub fn item_url(&self, item_id: &str) -> StacResult<Url> {
        let root = format!("{}/", self.config.catalog_url.trim_end_matches('/'));
        let mut url = Url::parse(&root).map_err(|e| StacError::InvalidUrl(format!("{root}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| StacError::InvalidUrl(root.clone()))?
            .pop_if_empty()
            .extend(["collections", self.config.collection.as_str(), "items", item_id]);
        Ok(url)
    }

    /// Search parameters for one AOI and window.
    pub fn search_params(&self, aoi: &Aoi, window: &SearchWindow) -> StacSearchParams {
        StacSearchParams::new()
            .collection(&self.config.collection)
            .intersects(aoi.geometry().clone())
            .datetime(&window.to_stac_interval())
            .max_cloud_cover(self.config.max_cloud_cover)
            .limit(self.config.page_limit)
    }

    /// Run a search and follow `next` links until the catalog is exhausted.
    pub async fn search_all(&self, params: &StacSearchParams) -> StacResult<Vec<StacItem>> {
        let mut items = Vec::new();
        let mut page = self.post_search(&self.search_url(), params).await?;
        let mut pages = 1usize;

        loop {
            let next = page.next_link().cloned();
            let page_len = page.len();
            items.extend(page.features.drain(..));

            let Some(link) = next else { break };
            if page_len == 0 {
                break;
            }

            page = self.follow_next(&link, params).await?;
            pages += 1;
        }

        debug!(pages, items = items.len(), "STAC search exhausted");
        Ok(items)
    }

    async fn post_search(&self, url: &str, params: &StacSearchParams) -> StacResult<StacItemCollection> {
        let resp = self.client.post(url).json(params).send().await?;
        parse_collection(url, resp).await
    }

    /// Follow a pagination link. Handles both POST (body/merge) and GET links.
    async fn follow_next(
        &self,
        link: &StacLink,
        original: &StacSearchParams,
    ) -> StacResult<StacItemCollection> {
        let method = link.method.as_deref().unwrap_or("GET").to_uppercase();

        if method != "POST" {
            let resp = self.client.get(&link.href).send().await?;
            return parse_collection(&link.href, resp).await;
        }

        let body = match (&link.body, link.merge.unwrap_or(false)) {
            (Some(link_body), true) => {
                let mut base = serde_json::to_value(original)
                    .map_err(|e| StacError::Parse(format!("serializing params: {e}")))?;
                if let (Some(base_obj), Some(link_obj)) = (base.as_object_mut(), link_body.as_object()) {
                    for (k, v) in link_obj {
                        base_obj.insert(k.clone(), v.clone());
                    }
                }
                base
            }
            (Some(link_body), false) => link_body.clone(),
            (None, _) => serde_json::to_value(original)
                .map_err(|e| StacError::Parse(format!("serializing params: {e}")))?,
        };

        let resp = self.client.post(&link.href).json(&body).send().await?;
        parse_collection(&link.href, resp).await
    }
}

async fn parse_collection(url: &str, resp: reqwest::Response) -> StacResult<StacItemCollection> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(StacError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: body.chars().take(500).collect(),
        });
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| StacError::Parse(format!("{url}: {e}")))
}

#[async_trait]
impl Catalog for StacClient {
    async fn search(&self, aoi: &Aoi, window: &SearchWindow) -> StacResult<Vec<StacItem>> {
        let params = self.search_params(aoi, window);
        info!(
            collection = %self.config.collection,
            geometry = aoi.kind(),
            datetime = params.datetime.as_deref().unwrap_or(""),
            "Searching STAC catalog"
        );

        let items = self.search_all(&params).await?;
        info!(count = items.len(), "Found items matching the criteria");
        Ok(items)
    }

    async fn fetch_item(&self, item_id: &str) -> StacResult<Option<StacItem>> {
        let url = self.item_url(item_id)?;
        debug!(item_id, url = %url, "Fetching STAC item");

        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StacError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let body = resp.text().await?;
        let item: StacItem =
            serde_json::from_str(&body).map_err(|e| StacError::Parse(format!("{url}: {e}")))?;
        Ok(Some(item))
    }
}
