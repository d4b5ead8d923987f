//! The stock-charter dashboard.
//!
//! Thin orchestration on top of [`market_data`] and [`chart_metrics`]:
//! configuration and watchlist handling, user selection, chart assembly,
//! and a text renderer for the terminal.

pub mod app;
pub mod batch;
pub mod chart;
pub mod config;
pub mod logging;
pub mod selection;
