//! A date-ordered collection of daily bars for a single symbol.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::bar::DailyBar;

/// Violations of the [`PriceSeries`] ordering invariant.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// A bar's date does not advance past its predecessor.
    #[error("bar dates must be strictly increasing: {date} at position {position} does not advance")]
    NonMonotonicDate {
        /// Index of the offending bar.
        position: usize,
        /// Date of the offending bar.
        date: NaiveDate,
    },
}

/// Represents a complete set of daily bars for a single symbol.
///
/// Bars are guaranteed to be in strictly increasing date order with no
/// duplicate dates; the constructor rejects anything else. An empty series
/// is valid and means "the provider had no rows for this range".
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<DailyBar>,
}

impl PriceSeries {
    /// Builds a series from bars that are already sorted by date.
    pub fn new(symbol: impl Into<String>, bars: Vec<DailyBar>) -> Result<Self, SeriesError> {
        for (position, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NonMonotonicDate {
                    position: position + 1,
                    date: pair[1].date,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// An empty series for `symbol`.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// The symbol this series belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The bars, oldest first.
    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    /// Number of bars in the series.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the series holds no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in bar order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// First and last bar dates, or `None` for an empty series.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
