//! Yahoo Finance chart-API provider.
//!
//! Speaks the public `v8/finance/chart` endpoint: one GET per symbol with
//! unix-second period bounds, answered by a JSON envelope of parallel
//! per-day column arrays.

mod params;
mod provider;
mod response;

pub use provider::{YahooChartConfig, YahooChartProvider};
