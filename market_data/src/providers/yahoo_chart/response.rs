use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;

use crate::models::{bar::DailyBar, series::PriceSeries};
use crate::providers::{ApiSnafu, PayloadSnafu, ProviderError};

/// Top-level chart envelope. Exactly one of `result`/`error` is populated.
#[derive(Deserialize, Debug)]
pub(crate) struct ChartEnvelope {
    chart: Chart,
}

#[derive(Deserialize, Debug)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    /// Bar timestamps in unix seconds. Absent entirely when the range holds
    /// no trading days.
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

/// Parallel per-day columns. A `null` slot marks a day the vendor could not
/// price; the whole row is skipped rather than zero-filled.
#[derive(Deserialize, Debug, Default)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

fn slot<T: Copy>(column: &[Option<T>], index: usize) -> Option<T> {
    column.get(index).copied().flatten()
}

/// Converts a decoded envelope into a [`PriceSeries`].
///
/// Rows are sorted by date and deduplicated (the later wire row wins), and
/// internally inconsistent bars are dropped with a warning. A missing or
/// empty result decodes to an empty series, not an error.
pub(crate) fn into_price_series(
    envelope: ChartEnvelope,
    symbol: &str,
) -> Result<PriceSeries, ProviderError> {
    if let Some(error) = envelope.chart.error {
        return ApiSnafu {
            code: error.code,
            message: error.description,
        }
        .fail();
    }

    let Some(result) = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
    else {
        return Ok(PriceSeries::empty(symbol));
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars: Vec<DailyBar> = Vec::with_capacity(result.timestamp.len());
    for (index, &ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            slot(&quote.open, index),
            slot(&quote.high, index),
            slot(&quote.low, index),
            slot(&quote.close, index),
            slot(&quote.volume, index),
        ) else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
            warn!(symbol, timestamp = ts, "dropping bar with out-of-range timestamp");
            continue;
        };

        let bar = DailyBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        };
        if !bar.is_sane() {
            warn!(symbol, %date, "dropping inconsistent bar from provider");
            continue;
        }
        bars.push(bar);
    }

    // Stable sort keeps wire order within a date, so "last row wins" below
    // picks the vendor's most recent correction.
    bars.sort_by_key(|bar| bar.date);
    let mut deduped: Vec<DailyBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => deduped.push(bar),
        }
    }

    PriceSeries::new(symbol, deduped).map_err(|err| {
        PayloadSnafu {
            message: err.to_string(),
        }
        .build()
    })
}
