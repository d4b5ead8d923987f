//! Derived chart metrics for daily price series.
//!
//! Everything here is a pure function over [`market_data`] types: trailing
//! moving averages for chart overlays and close-price summary statistics.
//! No I/O, no caching, no provider knowledge.

#![deny(missing_docs)]

pub mod derive;
pub mod rolling;
pub mod stats;
