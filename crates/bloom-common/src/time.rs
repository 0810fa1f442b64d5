//! Search window handling.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default trailing window for scene searches.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Longest trailing window accepted by configuration (Sentinel-2 launched in 2015).
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// A closed date interval used to filter catalog searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SearchWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window ending at `now` and starting `days` earlier.
    ///
    /// A start before the representable range saturates at the earliest
    /// representable instant.
    pub fn trailing(now: DateTime<Utc>, days: u32) -> Self {
        let start = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    /// Trailing window ending at the current instant.
    pub fn trailing_from_now(days: u32) -> Self {
        Self::trailing(Utc::now(), days)
    }

    /// STAC `datetime` interval string at day precision: `YYYY-MM-DD/YYYY-MM-DD`.
    pub fn to_stac_interval(&self) -> String {
        format!(
            "{}/{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self::trailing_from_now(DEFAULT_WINDOW_DAYS)
    }
}
