//! Ticker and date-range selection.
//!
//! Resolves raw user input (ticker text plus optional date strings) against
//! the configured watchlist. Everything here happens before any fetch: a
//! selection that does not resolve never touches the network.

use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use thiserror::Error;

/// Days of history charted when no start date is given.
const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// A fully resolved chart selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Display label from the watchlist.
    pub label: String,
    /// Vendor symbol to fetch.
    pub symbol: String,
    /// First requested day (inclusive).
    pub start: NaiveDate,
    /// Last requested day (inclusive).
    pub end: NaiveDate,
}

/// Rejected user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// No ticker text was given.
    #[error("no ticker selected; choose one of: {available}")]
    MissingTicker {
        /// Comma-separated symbols the watchlist offers.
        available: String,
    },

    /// The ticker text matches neither a symbol nor a label.
    #[error("unknown ticker {input:?}; choose one of: {available}")]
    UnknownTicker {
        /// The rejected input.
        input: String,
        /// Comma-separated symbols the watchlist offers.
        available: String,
    },

    /// A date string did not parse as `YYYY-MM-DD`.
    #[error("invalid {field} date {input:?}; expected YYYY-MM-DD")]
    InvalidDate {
        /// Which argument was malformed ("start" or "end").
        field: &'static str,
        /// The rejected input.
        input: String,
    },
}

/// Default chart range: the 365 days ending today.
pub fn default_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(DEFAULT_LOOKBACK_DAYS), today)
}

/// Resolves raw input against the watchlist.
///
/// The ticker matches case-insensitively against both symbols and labels.
/// Omitted dates fall back to [`default_range`]. The range is deliberately
/// not checked for order; an inverted range resolves fine and later yields
/// an empty chart.
pub fn resolve_selection(
    watchlist: &IndexMap<String, String>,
    ticker: &str,
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<Selection, SelectionError> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(SelectionError::MissingTicker {
            available: available(watchlist),
        });
    }

    let needle = ticker.to_uppercase();
    let Some((label, symbol)) = watchlist
        .iter()
        .find(|(label, symbol)| symbol.to_uppercase() == needle || label.to_uppercase() == needle)
    else {
        return Err(SelectionError::UnknownTicker {
            input: ticker.to_string(),
            available: available(watchlist),
        });
    };

    let (default_start, default_end) = default_range(today);
    Ok(Selection {
        label: label.clone(),
        symbol: symbol.clone(),
        start: parse_date(start, "start", default_start)?,
        end: parse_date(end, "end", default_end)?,
    })
}

fn parse_date(
    input: Option<&str>,
    field: &'static str,
    default: NaiveDate,
) -> Result<NaiveDate, SelectionError> {
    match input {
        None => Ok(default),
        Some(raw) => {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                SelectionError::InvalidDate {
                    field,
                    input: raw.to_string(),
                }
            })
        }
    }
}

fn available(watchlist: &IndexMap<String, String>) -> String {
    let symbols: Vec<&str> = watchlist.values().map(String::as_str).collect();
    symbols.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;

    fn watchlist() -> IndexMap<String, String> {
        ChartConfig::default().watchlist
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn symbol_matches_case_insensitively() {
        let selection =
            resolve_selection(&watchlist(), "aapl", None, None, today()).unwrap();
        assert_eq!(selection.symbol, "AAPL");
        assert_eq!(selection.label, "Apple");
    }

    #[test]
    fn label_matches_case_insensitively() {
        let selection =
            resolve_selection(&watchlist(), "samsung electronics", None, None, today())
                .unwrap();
        assert_eq!(selection.symbol, "005930.KS");
        assert_eq!(selection.label, "Samsung Electronics");
    }

    #[test]
    fn korean_listing_suffix_resolves() {
        let selection =
            resolve_selection(&watchlist(), "035720.ks", None, None, today()).unwrap();
        assert_eq!(selection.symbol, "035720.KS");
        assert_eq!(selection.label, "Kakao");
    }

    #[test]
    fn omitted_dates_use_the_default_year() {
        let selection =
            resolve_selection(&watchlist(), "TSLA", None, None, today()).unwrap();
        assert_eq!(selection.end, today());
        assert_eq!(selection.start, today() - Duration::days(365));
    }

    #[test]
    fn explicit_dates_are_parsed() {
        let selection = resolve_selection(
            &watchlist(),
            "TSLA",
            Some("2024-01-02"),
            Some(" 2024-03-28 "),
            today(),
        )
        .unwrap();
        assert_eq!(selection.start.to_string(), "2024-01-02");
        assert_eq!(selection.end.to_string(), "2024-03-28");
    }

    #[test]
    fn inverted_range_is_not_rejected_here() {
        let selection = resolve_selection(
            &watchlist(),
            "TSLA",
            Some("2024-06-01"),
            Some("2024-01-01"),
            today(),
        )
        .unwrap();
        assert!(selection.start > selection.end);
    }

    #[test]
    fn blank_ticker_is_missing() {
        let err = resolve_selection(&watchlist(), "  ", None, None, today()).unwrap_err();
        assert!(matches!(err, SelectionError::MissingTicker { .. }));
        assert!(err.to_string().contains("AAPL"));
    }

    #[test]
    fn unknown_ticker_lists_the_choices() {
        let err = resolve_selection(&watchlist(), "NFLX", None, None, today()).unwrap_err();
        assert!(matches!(err, SelectionError::UnknownTicker { .. }));
        let message = err.to_string();
        assert!(message.contains("NFLX"));
        assert!(message.contains("005930.KS"));
    }

    #[test]
    fn malformed_dates_name_the_field() {
        let err = resolve_selection(
            &watchlist(),
            "AAPL",
            Some("2024-13-01"),
            None,
            today(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SelectionError::InvalidDate {
                field: "start",
                input: "2024-13-01".to_string(),
            }
        );

        let err = resolve_selection(
            &watchlist(),
            "AAPL",
            None,
            Some("28/03/2024"),
            today(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SelectionError::InvalidDate { field: "end", .. }
        ));
    }
}
