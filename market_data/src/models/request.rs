use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parameters for requesting daily bars from a market data provider.
///
/// The struct is vendor-agnostic and doubles as the memoization key in
/// [`QuoteCache`](crate::cache::QuoteCache): two requests are the same cache
/// entry exactly when symbol, start and end all match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarsRequest {
    /// The symbol to request (e.g., `"AAPL"`, `"005930.KS"`).
    pub symbol: String,

    /// First trading day of the requested range (inclusive).
    pub start: NaiveDate,

    /// Last trading day of the requested range (inclusive).
    pub end: NaiveDate,
}

impl BarsRequest {
    /// Builds a request for `symbol` covering `start..=end`.
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
        }
    }

    /// Whether the range is inverted (`start` after `end`).
    ///
    /// Inverted ranges are not an error; they resolve to an empty series
    /// without a provider round-trip.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}
