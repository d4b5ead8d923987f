//! Moving-average overlay columns.

use std::sync::Arc;

use market_data::models::series::PriceSeries;

use crate::rolling::trailing_sma;

/// Overlay windows derived for every chart, in trading days.
pub const MA_WINDOWS: [usize; 3] = [5, 20, 120];

/// One derived overlay column: the trailing mean of close over `window` bars.
#[derive(Debug, Clone, PartialEq)]
pub struct MaColumn {
    /// Window length in trading days.
    pub window: usize,
    /// Per-bar values aligned with the source series; `None` during warm-up.
    pub values: Vec<Option<f64>>,
}

impl MaColumn {
    /// The most recent defined value, if the window ever filled.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Whether the window never filled for this series.
    pub fn is_undefined(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// A price series augmented with derived overlay columns.
///
/// Every column holds exactly one value slot per bar of the source series.
#[derive(Debug, Clone)]
pub struct DerivedSeries {
    /// The source bars.
    pub series: Arc<PriceSeries>,
    /// One column per requested window, in request order.
    pub columns: Vec<MaColumn>,
}

impl DerivedSeries {
    /// Number of bars (and value slots per column).
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the source series holds no bars.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The column derived for `window`, if one was requested.
    pub fn column(&self, window: usize) -> Option<&MaColumn> {
        self.columns.iter().find(|column| column.window == window)
    }
}

/// Derives one trailing-mean column per window over the series' closes.
///
/// Windows are taken as given: order is preserved and a duplicate window
/// yields a duplicate column. The source series is shared, never copied or
/// modified; an empty series yields empty columns.
pub fn derive_moving_averages(series: Arc<PriceSeries>, windows: &[usize]) -> DerivedSeries {
    let closes = series.closes();
    let columns = windows
        .iter()
        .map(|&window| MaColumn {
            window,
            values: trailing_sma(&closes, window),
        })
        .collect();
    DerivedSeries { series, columns }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use market_data::models::bar::DailyBar;

    use super::*;

    /// A series of consecutive days closing at `closes`.
    fn series(closes: &[f64]) -> Arc<PriceSeries> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| DailyBar {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect();
        Arc::new(PriceSeries::new("TEST", bars).unwrap())
    }

    #[test]
    fn standard_windows_fill_at_their_own_pace() {
        let closes: Vec<f64> = (1..=130).map(f64::from).collect();
        let derived = derive_moving_averages(series(&closes), &MA_WINDOWS);

        assert_eq!(derived.columns.len(), 3);
        for column in &derived.columns {
            assert_eq!(column.values.len(), 130);
            let first_defined = column.values.iter().position(Option::is_some);
            assert_eq!(first_defined, Some(column.window - 1));
        }

        // Mean of an arithmetic run is its midpoint.
        let ma5 = derived.column(5).unwrap();
        assert_eq!(ma5.values[4], Some(3.0));
        let ma120 = derived.column(120).unwrap();
        assert_eq!(ma120.values[119], Some(60.5));
    }

    #[test]
    fn exactly_filled_window_defines_only_the_last_bar() {
        let closes: Vec<f64> = (1..=120).map(f64::from).collect();
        let derived = derive_moving_averages(series(&closes), &MA_WINDOWS);

        let ma120 = derived.column(120).unwrap();
        assert!(ma120.values[..119].iter().all(Option::is_none));
        assert_eq!(ma120.values[119], Some(60.5));
        assert_eq!(ma120.latest(), Some(60.5));
    }

    #[test]
    fn short_series_leaves_long_windows_undefined() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let derived = derive_moving_averages(series(&closes), &MA_WINDOWS);

        assert!(!derived.column(5).unwrap().is_undefined());
        assert!(derived.column(20).unwrap().is_undefined());
        assert!(derived.column(120).unwrap().is_undefined());
        assert_eq!(derived.column(20).unwrap().latest(), None);
    }

    #[test]
    fn empty_series_yields_empty_columns() {
        let derived =
            derive_moving_averages(Arc::new(PriceSeries::empty("TEST")), &MA_WINDOWS);
        assert!(derived.is_empty());
        assert_eq!(derived.columns.len(), 3);
        assert!(derived.columns.iter().all(|c| c.values.is_empty()));
    }

    #[test]
    fn source_series_is_shared_not_copied() {
        let source = series(&[10.0, 12.0, 11.0]);
        let derived = derive_moving_averages(Arc::clone(&source), &[2]);
        assert!(Arc::ptr_eq(&derived.series, &source));
    }

    #[test]
    fn unknown_window_lookup_is_none() {
        let derived = derive_moving_averages(series(&[1.0, 2.0]), &MA_WINDOWS);
        assert!(derived.column(7).is_none());
    }
}
