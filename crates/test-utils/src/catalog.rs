//! Scripted in-memory catalog.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use bloom_common::{Aoi, SearchWindow};
use stac_client::{Catalog, StacError, StacItem, StacResult};

/// A [`Catalog`] that answers from fixed data and counts its calls.
///
/// Search returns every registered search result regardless of the AOI.
/// Fetch looks items up by id among both search results and items added
/// with [`MemoryCatalog::with_item`].
#[derive(Default)]
pub struct MemoryCatalog {
    search_results: RwLock<Vec<StacItem>>,
    items: RwLock<HashMap<String, StacItem>>,
    failure: RwLock<Option<String>>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items returned by every search, also fetchable by id.
    pub fn with_search_results(self, items: Vec<StacItem>) -> Self {
        if let (Ok(mut results), Ok(mut by_id)) = (self.search_results.write(), self.items.write()) {
            for item in &items {
                by_id.insert(item.id.clone(), item.clone());
            }
            *results = items;
        }
        self
    }

    /// An item only reachable by id.
    pub fn with_item(self, item: StacItem) -> Self {
        if let Ok(mut by_id) = self.items.write() {
            by_id.insert(item.id.clone(), item);
        }
        self
    }

    /// Make every call fail with an upstream 502 carrying `message`.
    pub fn failing(self, message: impl Into<String>) -> Self {
        if let Ok(mut failure) = self.failure.write() {
            *failure = Some(message.into());
        }
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self, url: &str) -> StacResult<()> {
        match self.failure.read().ok().and_then(|f| f.clone()) {
            Some(body) => Err(StacError::Status {
                url: url.to_string(),
                status: 502,
                body,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn search(&self, _aoi: &Aoi, _window: &SearchWindow) -> StacResult<Vec<StacItem>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure("memory://search")?;
        Ok(self
            .search_results
            .read()
            .map(|results| results.clone())
            .unwrap_or_default())
    }

    async fn fetch_item(&self, item_id: &str) -> StacResult<Option<StacItem>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(&format!("memory://items/{item_id}"))?;
        Ok(self
            .items
            .read()
            .ok()
            .and_then(|items| items.get(item_id).cloned()))
    }
}
