//! The chart flow: fetch, derive, assemble, render.

use chart_metrics::derive::{MA_WINDOWS, derive_moving_averages};
use market_data::cache::CachedFetcher;
use market_data::models::request::BarsRequest;
use market_data::providers::ProviderError;
use thiserror::Error;
use tracing::info;

use crate::chart::{ChartRenderer, RenderError, assemble_chart};
use crate::config::OverlayConfig;
use crate::selection::Selection;

/// Failures while producing a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The provider could not deliver bars.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The renderer rejected the assembled chart.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What running the chart flow produced.
#[derive(Debug)]
pub enum ChartOutcome<O> {
    /// The rendered chart.
    Rendered(O),
    /// The provider answered with zero bars for this selection.
    ///
    /// Not an error: thin listings and weekend-only ranges do this. The
    /// caller decides how to tell the user.
    NoData(Selection),
}

/// Runs the full chart flow for one selection.
///
/// Fetches daily bars through the memoizing fetcher, derives the standard
/// moving-average columns, assembles the chart spec with the configured
/// overlays, and hands it to the renderer. An empty fetch short-circuits to
/// [`ChartOutcome::NoData`] before any derivation.
pub async fn run_chart<R: ChartRenderer>(
    fetcher: &CachedFetcher,
    selection: &Selection,
    overlays: &[OverlayConfig],
    tail_rows: usize,
    renderer: &R,
) -> Result<ChartOutcome<R::Output>, ChartError> {
    let request = BarsRequest::new(&selection.symbol, selection.start, selection.end);
    let series = fetcher.fetch(&request).await?;

    if series.is_empty() {
        info!(
            symbol = %selection.symbol,
            start = %selection.start,
            end = %selection.end,
            "no bars for selection"
        );
        return Ok(ChartOutcome::NoData(selection.clone()));
    }

    let derived = derive_moving_averages(series, &MA_WINDOWS);
    let spec = assemble_chart(
        format!("{} Stock Chart", selection.label),
        derived,
        overlays,
        tail_rows,
    );
    let output = renderer.render(&spec)?;
    Ok(ChartOutcome::Rendered(output))
}
