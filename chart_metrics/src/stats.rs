//! Close-price summary statistics.
//!
//! Follows dataframe describe() conventions: sample standard deviation
//! (`n - 1` denominator) and linearly interpolated quartiles.

use market_data::models::{bar::DailyBar, series::PriceSeries};

/// Descriptive statistics over a set of closing prices.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    /// Number of observations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation; `None` for a single observation.
    pub std_dev: Option<f64>,
    /// Smallest close.
    pub min: f64,
    /// First quartile (25th percentile).
    pub q25: f64,
    /// Median (50th percentile).
    pub median: f64,
    /// Third quartile (75th percentile).
    pub q75: f64,
    /// Largest close.
    pub max: f64,
}

impl SummaryStats {
    /// Computes statistics over `closes`, or `None` when there are none.
    pub fn from_closes(closes: &[f64]) -> Option<Self> {
        if closes.is_empty() {
            return None;
        }

        let count = closes.len();
        let mean = closes.iter().sum::<f64>() / count as f64;
        let std_dev = (count > 1).then(|| {
            let squared_error = closes.iter().map(|c| (c - mean).powi(2)).sum::<f64>();
            (squared_error / (count - 1) as f64).sqrt()
        });

        let mut sorted = closes.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            count,
            mean,
            std_dev,
            min: sorted[0],
            q25: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.50),
            q75: percentile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linearly interpolated percentile over pre-sorted values.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let index = position.floor() as usize;
    let fraction = position - index as f64;
    if index + 1 < sorted.len() {
        sorted[index] + (sorted[index + 1] - sorted[index]) * fraction
    } else {
        sorted[index]
    }
}

/// Percentage change from the first close to the last.
///
/// `None` when fewer than two closes are present; a single day has no
/// return to report.
pub fn total_return_pct(closes: &[f64]) -> Option<f64> {
    match (closes.first(), closes.last()) {
        (Some(&first), Some(&last)) if closes.len() > 1 && first != 0.0 => {
            Some((last - first) / first * 100.0)
        }
        _ => None,
    }
}

/// The last `n` bars of the series, oldest first.
///
/// When `n` exceeds the series length the whole series is returned.
pub fn tail(series: &PriceSeries, n: usize) -> &[DailyBar] {
    let bars = series.bars();
    &bars[bars.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use proptest::prelude::*;

    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn describe_matches_dataframe_conventions() {
        let stats = SummaryStats::from_closes(&[1.0, 2.0, 3.0, 4.0]).unwrap();

        assert_eq!(stats.count, 4);
        assert_close(stats.mean, 2.5);
        // Sample std of 1..4 is sqrt(5/3).
        assert_close(stats.std_dev.unwrap(), (5.0f64 / 3.0).sqrt());
        assert_close(stats.min, 1.0);
        assert_close(stats.q25, 1.75);
        assert_close(stats.median, 2.5);
        assert_close(stats.q75, 3.25);
        assert_close(stats.max, 4.0);
    }

    #[test]
    fn five_bar_fixture_describes_exactly() {
        let stats = SummaryStats::from_closes(&[10.0, 12.0, 11.0, 13.0, 15.0]).unwrap();

        assert_eq!(stats.count, 5);
        assert_close(stats.mean, 12.2);
        assert_close(stats.std_dev.unwrap(), 3.7f64.sqrt());
        assert_close(stats.q25, 11.0);
        assert_close(stats.median, 12.0);
        assert_close(stats.q75, 13.0);
    }

    #[test]
    fn single_observation_has_no_std() {
        let stats = SummaryStats::from_closes(&[42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std_dev, None);
        assert_close(stats.min, 42.0);
        assert_close(stats.median, 42.0);
        assert_close(stats.max, 42.0);
    }

    #[test]
    fn no_observations_no_stats() {
        assert_eq!(SummaryStats::from_closes(&[]), None);
    }

    #[test]
    fn ten_percent_return() {
        assert_close(total_return_pct(&[100.0, 110.0]).unwrap(), 10.0);
    }

    #[test]
    fn negative_return() {
        assert_close(total_return_pct(&[100.0, 90.0]).unwrap(), -10.0);
    }

    #[test]
    fn return_needs_two_closes() {
        assert_eq!(total_return_pct(&[100.0]), None);
        assert_eq!(total_return_pct(&[]), None);
    }

    fn fixture_series(len: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..len)
            .map(|i| {
                let close = 100.0 + i as f64;
                market_data::models::bar::DailyBar {
                    date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1_000,
                }
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn tail_keeps_the_most_recent_bars() {
        let series = fixture_series(8);
        let tail = tail(&series, 5);
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0].close, 103.0);
        assert_eq!(tail[4].close, 107.0);
    }

    #[test]
    fn tail_of_a_short_series_is_the_whole_series() {
        let series = fixture_series(3);
        assert_eq!(tail(&series, 5).len(), 3);
        assert!(tail(&PriceSeries::empty("TEST"), 5).is_empty());
    }

    proptest! {
        #[test]
        fn quartiles_are_ordered(
            closes in prop::collection::vec(0.01f64..1e6, 1..200),
        ) {
            let stats = SummaryStats::from_closes(&closes).unwrap();
            prop_assert!(stats.min <= stats.q25);
            prop_assert!(stats.q25 <= stats.median);
            prop_assert!(stats.median <= stats.q75);
            prop_assert!(stats.q75 <= stats.max);
        }
    }
}
