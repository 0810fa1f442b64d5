//! Service configuration loading and types.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use bloom_common::time::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use stac_client::{StacClientConfig, PLANETARY_COMPUTER_SAS_URL, PLANETARY_COMPUTER_STAC_URL, SENTINEL2_L2A};

/// How `POST /process/{itemId}` finds the item to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMode {
    /// Only items seen by a previous search.
    Cache,
    /// Always fetch from the catalog.
    Catalog,
    /// Cache first, then the catalog on a miss.
    #[default]
    CacheThenCatalog,
}

impl FromStr for ResolutionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cache" => Ok(ResolutionMode::Cache),
            "catalog" => Ok(ResolutionMode::Catalog),
            "cache-then-catalog" | "cache_then_catalog" => Ok(ResolutionMode::CacheThenCatalog),
            other => Err(format!("unknown resolution mode '{}'", other)),
        }
    }
}

/// Item cache limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            max_entries: 10_000,
        }
    }
}

/// Service configuration, loaded from an optional YAML file and then
/// overridden by `BLOOMWATCH_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub catalog_url: String,
    pub collection: String,
    pub max_cloud_cover: f64,
    /// Trailing search window, 1 to `MAX_WINDOW_DAYS` days.
    pub search_window_days: u32,
    pub page_limit: u32,
    pub request_timeout_secs: u64,
    /// Sign band hrefs through the SAS endpoint before reading them.
    pub sign_assets: bool,
    pub sas_url: String,
    pub cache: CacheConfig,
    pub resolution: ResolutionMode,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            catalog_url: PLANETARY_COMPUTER_STAC_URL.to_string(),
            collection: SENTINEL2_L2A.to_string(),
            max_cloud_cover: 20.0,
            search_window_days: DEFAULT_WINDOW_DAYS,
            page_limit: 100,
            request_timeout_secs: 60,
            sign_assets: true,
            sas_url: PLANETARY_COMPUTER_SAS_URL.to_string(),
            cache: CacheConfig::default(),
            resolution: ResolutionMode::default(),
        }
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", name, e))
}

impl ApiConfig {
    /// Load from `path` (if given), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce an unusable catalog query.
    pub fn validate(&self) -> Result<()> {
        if self.search_window_days == 0 || self.search_window_days > MAX_WINDOW_DAYS {
            anyhow::bail!(
                "search_window_days must be between 1 and {}, got {}",
                MAX_WINDOW_DAYS,
                self.search_window_days
            );
        }
        if self.page_limit == 0 {
            anyhow::bail!("page_limit must be at least 1");
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: ApiConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;
        tracing::info!(path = ?path, "Loaded service config");
        Ok(config)
    }

    /// Apply `BLOOMWATCH_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BLOOMWATCH_CATALOG_URL") {
            self.catalog_url = v;
        }
        if let Some(v) = lookup("BLOOMWATCH_COLLECTION") {
            self.collection = v;
        }
        if let Some(v) = lookup("BLOOMWATCH_MAX_CLOUD_COVER") {
            self.max_cloud_cover = parse_var("BLOOMWATCH_MAX_CLOUD_COVER", &v)?;
        }
        if let Some(v) = lookup("BLOOMWATCH_SEARCH_WINDOW_DAYS") {
            self.search_window_days = parse_var("BLOOMWATCH_SEARCH_WINDOW_DAYS", &v)?;
        }
        if let Some(v) = lookup("BLOOMWATCH_PAGE_LIMIT") {
            self.page_limit = parse_var("BLOOMWATCH_PAGE_LIMIT", &v)?;
        }
        if let Some(v) = lookup("BLOOMWATCH_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("BLOOMWATCH_REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("BLOOMWATCH_SIGN_ASSETS") {
            self.sign_assets = parse_var("BLOOMWATCH_SIGN_ASSETS", &v)?;
        }
        if let Some(v) = lookup("BLOOMWATCH_SAS_URL") {
            self.sas_url = v;
        }
        if let Some(v) = lookup("BLOOMWATCH_CACHE_TTL_SECS") {
            self.cache.ttl_secs = parse_var("BLOOMWATCH_CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = lookup("BLOOMWATCH_CACHE_MAX_ENTRIES") {
            self.cache.max_entries = parse_var("BLOOMWATCH_CACHE_MAX_ENTRIES", &v)?;
        }
        if let Some(v) = lookup("BLOOMWATCH_RESOLUTION") {
            self.resolution = parse_var("BLOOMWATCH_RESOLUTION", &v)?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn stac_client_config(&self) -> StacClientConfig {
        StacClientConfig {
            catalog_url: self.catalog_url.clone(),
            collection: self.collection.clone(),
            max_cloud_cover: self.max_cloud_cover,
            page_limit: self.page_limit,
            request_timeout: self.request_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.collection, "sentinel-2-l2a");
        assert_eq!(config.max_cloud_cover, 20.0);
        assert_eq!(config.search_window_days, 30);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.cache.max_entries, 10_000);
        assert_eq!(config.resolution, ResolutionMode::CacheThenCatalog);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ApiConfig = serde_yaml::from_str(
            "catalog_url: http://localhost:8082\nresolution: cache\ncache:\n  ttl_secs: 60\n",
        )
        .unwrap();

        assert_eq!(config.catalog_url, "http://localhost:8082");
        assert_eq!(config.resolution, ResolutionMode::Cache);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.max_entries, 10_000);
        assert!(config.sign_assets);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ApiConfig::default();
        config
            .apply_overrides(lookup(&[
                ("BLOOMWATCH_SIGN_ASSETS", "false"),
                ("BLOOMWATCH_CACHE_MAX_ENTRIES", "5"),
                ("BLOOMWATCH_RESOLUTION", "catalog"),
            ]))
            .unwrap();

        assert!(!config.sign_assets);
        assert_eq!(config.cache.max_entries, 5);
        assert_eq!(config.resolution, ResolutionMode::Catalog);
    }

    #[test]
    fn test_search_window_bounds() {
        assert!(ApiConfig::default().validate().is_ok());

        for days in [0, MAX_WINDOW_DAYS + 1, 1_000_000_000] {
            let config = ApiConfig {
                search_window_days: days,
                ..ApiConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("search_window_days"), "days: {days}");
        }
    }

    #[test]
    fn test_negative_window_env_rejected() {
        let mut config = ApiConfig::default();
        let err = config
            .apply_overrides(lookup(&[("BLOOMWATCH_SEARCH_WINDOW_DAYS", "-30")]))
            .unwrap_err();
        assert!(err.to_string().contains("BLOOMWATCH_SEARCH_WINDOW_DAYS"));
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = ApiConfig::default();
        let err = config
            .apply_overrides(lookup(&[("BLOOMWATCH_CACHE_TTL_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("BLOOMWATCH_CACHE_TTL_SECS"));
    }

    #[test]
    fn test_stac_client_config() {
        let config = ApiConfig {
            max_cloud_cover: 10.0,
            request_timeout_secs: 5,
            ..ApiConfig::default()
        };
        let stac = config.stac_client_config();
        assert_eq!(stac.max_cloud_cover, 10.0);
        assert_eq!(stac.request_timeout, Duration::from_secs(5));
    }
}
