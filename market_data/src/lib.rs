//! Daily market data retrieval for the stock charter.
//!
//! The crate is split along the fetch pipeline:
//! [`models`] holds the vendor-agnostic bar and request types,
//! [`providers`] defines the [`providers::DataProvider`] trait plus the
//! Yahoo chart-API implementation, and [`cache`] wraps any provider with
//! request-keyed memoization.

pub mod cache;
pub mod models;
pub mod providers;
