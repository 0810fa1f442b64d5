//! Prometheus metric names and recording helpers.
//!
//! Without an installed recorder (e.g. in tests) every call is a no-op.

use metrics::{counter, gauge, histogram};
use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::item_cache::ItemCacheStats;

pub const SEARCH_REQUESTS: &str = "bloomwatch_search_requests_total";
pub const SEARCH_RESULTS: &str = "bloomwatch_search_results";
pub const PROCESS_REQUESTS: &str = "bloomwatch_process_requests_total";
pub const PROCESS_DURATION: &str = "bloomwatch_process_duration_seconds";

/// Request outcome label values.
pub mod outcome {
    pub const OK: &str = "ok";
    pub const NOT_FOUND: &str = "not_found";
    pub const INVALID: &str = "invalid";
    pub const ERROR: &str = "error";
}

pub fn record_search(label: &'static str, results: usize) {
    counter!(SEARCH_REQUESTS, "outcome" => label).increment(1);
    if label == outcome::OK {
        histogram!(SEARCH_RESULTS).record(results as f64);
    }
}

pub fn record_process(label: &'static str, elapsed: Duration) {
    counter!(PROCESS_REQUESTS, "outcome" => label).increment(1);
    histogram!(PROCESS_DURATION, "outcome" => label).record(elapsed.as_secs_f64());
}

/// Publish the item cache counters as gauges.
pub fn record_cache_stats(stats: &ItemCacheStats) {
    gauge!("bloomwatch_item_cache_hits").set(stats.hits.load(Ordering::Relaxed) as f64);
    gauge!("bloomwatch_item_cache_misses").set(stats.misses.load(Ordering::Relaxed) as f64);
    gauge!("bloomwatch_item_cache_evictions").set(stats.evictions.load(Ordering::Relaxed) as f64);
    gauge!("bloomwatch_item_cache_expired").set(stats.expired.load(Ordering::Relaxed) as f64);
    gauge!("bloomwatch_item_cache_entries").set(stats.entry_count.load(Ordering::Relaxed) as f64);
    gauge!("bloomwatch_item_cache_hit_rate_percent").set(stats.hit_rate());
}
