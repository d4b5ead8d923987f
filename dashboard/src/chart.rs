//! Chart assembly and the rendering seam.
//!
//! [`assemble_chart`] folds a derived series and the overlay configuration
//! into a renderer-agnostic [`ChartSpec`]. [`ChartRenderer`] is the seam a
//! presentation backend implements; the bundled [`TextRenderer`] prints the
//! chart as aligned text tables for the terminal.

use std::fmt::Write;
use std::sync::Arc;

use chart_metrics::derive::DerivedSeries;
use chart_metrics::stats::{SummaryStats, tail, total_return_pct};
use market_data::models::series::PriceSeries;
use thiserror::Error;
use tracing::warn;

use crate::config::OverlayConfig;

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// Chart heading (e.g., "Apple Stock Chart").
    pub title: String,
    /// The bars behind the candlesticks.
    pub series: Arc<PriceSeries>,
    /// Overlay lines to draw, in configured order. Disabled overlays are
    /// already filtered out.
    pub overlays: Vec<OverlayLine>,
    /// Close-price summary; absent for an empty series.
    pub stats: Option<SummaryStats>,
    /// Percentage change from first to last close; absent below two bars.
    pub total_return_pct: Option<f64>,
    /// How many recent bars the renderer should tabulate.
    pub tail_rows: usize,
}

/// One overlay line, aligned slot-for-slot with the series bars.
#[derive(Debug, Clone)]
pub struct OverlayLine {
    /// Legend label.
    pub label: String,
    /// Line color, as configured.
    pub color: String,
    /// Window the values were derived with.
    pub window: usize,
    /// Per-bar values; `None` while the window is still warming up.
    pub values: Vec<Option<f64>>,
}

impl OverlayLine {
    /// Whether the window never filled, i.e. there is nothing to draw.
    pub fn is_undefined(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// Folds derived columns and overlay settings into a [`ChartSpec`].
///
/// Overlays are walked in configured order: disabled entries are skipped,
/// and an enabled entry without a matching derived column is dropped with a
/// warning. Kept columns stay aligned with the source bars; a column that
/// never filled is kept so the renderer can say "no overlay" instead of
/// silently drawing nothing.
pub fn assemble_chart(
    title: impl Into<String>,
    derived: DerivedSeries,
    overlays: &[OverlayConfig],
    tail_rows: usize,
) -> ChartSpec {
    let DerivedSeries {
        series,
        mut columns,
    } = derived;

    let closes = series.closes();
    let stats = SummaryStats::from_closes(&closes);
    let total_return_pct = total_return_pct(&closes);

    let mut lines = Vec::new();
    for overlay in overlays.iter().filter(|overlay| overlay.enabled) {
        let Some(position) = columns
            .iter()
            .position(|column| column.window == overlay.window)
        else {
            warn!(window = overlay.window, "overlay window has no derived column");
            continue;
        };
        let column = columns.swap_remove(position);
        lines.push(OverlayLine {
            label: overlay.label.clone(),
            color: overlay.color.clone(),
            window: column.window,
            values: column.values,
        });
    }

    ChartSpec {
        title: title.into(),
        series,
        overlays: lines,
        stats,
        total_return_pct,
        tail_rows,
    }
}

/// Rendering failures.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Text formatting failed.
    #[error("failed to format chart output: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Presentation seam: turns an assembled [`ChartSpec`] into output.
///
/// Implementations decide what "output" means: a string for terminals, a
/// file path for image backends, a widget tree for GUIs.
pub trait ChartRenderer {
    /// What rendering produces.
    type Output;

    /// Renders the chart.
    fn render(&self, spec: &ChartSpec) -> Result<Self::Output, RenderError>;
}

/// Renders the chart spec as aligned text tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl ChartRenderer for TextRenderer {
    type Output = String;

    fn render(&self, spec: &ChartSpec) -> Result<String, RenderError> {
        let mut out = String::new();

        writeln!(out, "{}", spec.title)?;
        if let Some((first, last)) = spec.series.date_range() {
            writeln!(
                out,
                "{}: {} to {} ({} trading days)",
                spec.series.symbol(),
                first,
                last,
                spec.series.len()
            )?;
        }

        for overlay in &spec.overlays {
            if overlay.is_undefined() {
                writeln!(
                    out,
                    "{} ({}): no overlay, needs {} bars but only {} available",
                    overlay.label,
                    overlay.color,
                    overlay.window,
                    spec.series.len()
                )?;
            } else {
                writeln!(
                    out,
                    "{} ({}): trailing {}-day mean of close",
                    overlay.label, overlay.color, overlay.window
                )?;
            }
        }

        if spec.tail_rows > 0 && !spec.series.is_empty() {
            writeln!(out)?;
            write!(
                out,
                "{:<12} {:>10} {:>10} {:>10} {:>10} {:>12}",
                "date", "open", "high", "low", "close", "volume"
            )?;
            for overlay in &spec.overlays {
                write!(out, " {:>10}", overlay.label)?;
            }
            writeln!(out)?;

            let bars = tail(&spec.series, spec.tail_rows);
            let offset = spec.series.len() - bars.len();
            for (row, bar) in bars.iter().enumerate() {
                write!(
                    out,
                    "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}",
                    bar.date.to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                )?;
                for overlay in &spec.overlays {
                    match overlay.values[offset + row] {
                        Some(value) => write!(out, " {value:>10.2}")?,
                        None => write!(out, " {:>10}", "-")?,
                    }
                }
                writeln!(out)?;
            }
        }

        if let Some(stats) = &spec.stats {
            writeln!(out)?;
            writeln!(out, "Close summary:")?;
            writeln!(out, "  count {:>12}", stats.count)?;
            writeln!(out, "  mean  {:>12.4}", stats.mean)?;
            match stats.std_dev {
                Some(std_dev) => writeln!(out, "  std   {:>12.4}", std_dev)?,
                None => writeln!(out, "  std   {:>12}", "n/a")?,
            }
            writeln!(out, "  min   {:>12.4}", stats.min)?;
            writeln!(out, "  25%   {:>12.4}", stats.q25)?;
            writeln!(out, "  50%   {:>12.4}", stats.median)?;
            writeln!(out, "  75%   {:>12.4}", stats.q75)?;
            writeln!(out, "  max   {:>12.4}", stats.max)?;
        }

        if let Some(total_return) = spec.total_return_pct {
            writeln!(out)?;
            writeln!(out, "Period return: {total_return:+.2}%")?;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use chart_metrics::derive::{MA_WINDOWS, derive_moving_averages};
    use chrono::{Days, NaiveDate};
    use market_data::models::bar::DailyBar;

    use super::*;
    use crate::config::ChartConfig;

    fn series(closes: &[f64]) -> Arc<PriceSeries> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| DailyBar {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10_000 + i as u64,
            })
            .collect();
        Arc::new(PriceSeries::new("TEST", bars).unwrap())
    }

    fn spec_for(closes: &[f64], overlays: &[OverlayConfig], tail_rows: usize) -> ChartSpec {
        let derived = derive_moving_averages(series(closes), &MA_WINDOWS);
        assemble_chart("Test Stock Chart", derived, overlays, tail_rows)
    }

    #[test]
    fn disabled_overlays_are_left_out() {
        let mut overlays = ChartConfig::default().overlays;
        overlays[1].enabled = false; // hide MA20

        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        let spec = spec_for(&closes, &overlays, 5);

        let labels: Vec<&str> = spec.overlays.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["MA5", "MA120"]);
        assert_eq!(spec.overlays[0].values.len(), 30);
    }

    #[test]
    fn unmatched_window_is_dropped() {
        let overlays = vec![OverlayConfig {
            window: 7,
            label: "MA7".to_string(),
            color: "green".to_string(),
            enabled: true,
        }];
        let spec = spec_for(&[1.0, 2.0, 3.0], &overlays, 5);
        assert!(spec.overlays.is_empty());
    }

    #[test]
    fn stats_and_return_ride_along() {
        let spec = spec_for(&[100.0, 105.0, 110.0], &ChartConfig::default().overlays, 5);
        let stats = spec.stats.as_ref().unwrap();
        assert_eq!(stats.count, 3);
        assert!((spec.total_return_pct.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn text_renderer_prints_the_chart_blocks() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + f64::from(i)).collect();
        let spec = spec_for(&closes, &ChartConfig::default().overlays, 5);
        let text = TextRenderer.render(&spec).unwrap();

        assert!(text.starts_with("Test Stock Chart\n"));
        assert!(text.contains("TEST: 2024-01-01 to 2024-01-30 (30 trading days)"));
        assert!(text.contains("MA5 (blue): trailing 5-day mean of close"));
        assert!(text.contains("MA20 (orange): trailing 20-day mean of close"));
        // 120-day window cannot fill on 30 bars.
        assert!(text.contains("MA120 (red): no overlay, needs 120 bars but only 30 available"));

        // Tail shows the last five days; 2024-01-25 is row one of five.
        assert!(text.contains("2024-01-26"));
        assert!(text.contains("2024-01-30"));
        assert!(!text.contains("2024-01-25 "));

        // The last bar closes at 129; MA5 there is 127, MA20 is 119.5.
        assert!(text.contains("127.00"));
        assert!(text.contains("119.50"));

        assert!(text.contains("Close summary:"));
        assert!(text.contains("count"));
        assert!(text.contains("Period return: +29.00%"));
    }

    #[test]
    fn warmup_rows_render_a_dash_not_zero() {
        let spec = spec_for(&[10.0, 12.0, 11.0], &ChartConfig::default().overlays, 5);
        let text = TextRenderer.render(&spec).unwrap();

        // Three bars cannot fill any window, so every overlay cell is a dash.
        let row = text
            .lines()
            .find(|line| line.starts_with("2024-01-01"))
            .unwrap();
        let dashes = row.split_whitespace().filter(|cell| *cell == "-").count();
        assert_eq!(dashes, 3);
    }

    #[test]
    fn single_bar_has_no_std_and_no_return() {
        let spec = spec_for(&[42.0], &ChartConfig::default().overlays, 5);
        let text = TextRenderer.render(&spec).unwrap();

        let std_line = text
            .lines()
            .find(|line| line.trim_start().starts_with("std"))
            .unwrap();
        assert!(std_line.ends_with("n/a"));
        assert!(!text.contains("Period return"));
    }

    #[test]
    fn zero_tail_rows_skips_the_table() {
        let spec = spec_for(&[10.0, 12.0], &ChartConfig::default().overlays, 0);
        let text = TextRenderer.render(&spec).unwrap();
        assert!(!text.contains("date"));
        assert!(text.contains("Close summary:"));
    }
}
