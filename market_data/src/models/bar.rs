//! Canonical in-memory representation of a daily price bar (OHLCV).
//!
//! This struct is used as the standard output for all [`DataProvider`](crate::providers::DataProvider)
//! implementations, regardless of which vendor the bars came from.

use chrono::NaiveDate;

/// A single daily OHLCV bar.
///
/// This struct is vendor-agnostic and is used throughout the charting pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    /// The trading day this bar covers.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price of the day.
    pub high: f64,

    /// Lowest price of the day.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Shares traded during the day.
    pub volume: u64,
}

impl DailyBar {
    /// Checks the bar for internal consistency.
    ///
    /// A sane bar has finite, strictly positive prices, `high` at or above
    /// `open`, `low` and `close`, and `low` at or below all three. Providers
    /// drop bars that fail this check instead of surfacing them.
    pub fn is_sane(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return false;
        }
        let max = self.open.max(self.close).max(self.low);
        let min = self.open.min(self.close).min(self.high);
        self.high >= max && self.low <= min
    }
}
