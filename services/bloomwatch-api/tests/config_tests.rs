//! Tests for loading the service configuration from YAML files.

use std::io::Write;

use bloomwatch_api::config::{ApiConfig, ResolutionMode};

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "catalog_url: http://stac.internal:8082\nmax_cloud_cover: 10\nsign_assets: false\nresolution: catalog\ncache:\n  max_entries: 50"
    )
    .unwrap();

    let config = ApiConfig::from_file(file.path()).unwrap();

    assert_eq!(config.catalog_url, "http://stac.internal:8082");
    assert_eq!(config.max_cloud_cover, 10.0);
    assert!(!config.sign_assets);
    assert_eq!(config.resolution, ResolutionMode::Catalog);
    assert_eq!(config.cache.max_entries, 50);
    assert_eq!(config.cache.ttl_secs, 3600);
    assert_eq!(config.collection, "sentinel-2-l2a");
}

#[test]
fn test_from_file_rejects_unknown_mode() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "resolution: sometimes").unwrap();

    let err = ApiConfig::from_file(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config"));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ApiConfig::from_file(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}
