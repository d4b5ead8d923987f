//! Vendor-neutral access to daily bar data.
//!
//! [`DataProvider`] is the seam between the rest of the workspace and
//! whichever vendor (Yahoo, Alpaca, ...) answers a request. A concrete
//! provider owns its vendor's endpoint layout and payload decoding; nothing
//! vendor-specific leaks past the trait.
//!
//! Implementations are async and object-safe, so a caller can hold a
//! `Box<dyn DataProvider>` and pick the vendor at runtime.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data::models::{request::BarsRequest, series::PriceSeries};
//! use market_data::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_daily_bars(
//!         &self,
//!         request: &BarsRequest,
//!     ) -> Result<PriceSeries, ProviderError> {
//!         Ok(PriceSeries::empty(&request.symbol))
//!     }
//! }
//! ```

pub mod yahoo_chart;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{request::BarsRequest, series::PriceSeries};

/// A source of daily bars for one market data vendor.
///
/// Implemented once per vendor. The trait is object-safe; callers that need
/// runtime vendor selection hold a `Box<dyn DataProvider>`.
#[async_trait]
pub trait DataProvider {
    /// Fetches daily bars for the given request.
    ///
    /// # Arguments
    ///
    /// * `request` - The symbol and inclusive date range to fetch.
    ///
    /// # Returns
    ///
    /// * `Ok(PriceSeries)` - The bars in date order. An empty series is a
    ///   valid outcome, distinct from an error: it means the vendor had no
    ///   rows for the range.
    /// * `Err(ProviderError)` - The request could not be answered; the
    ///   variant records where it broke down.
    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<PriceSeries, ProviderError>;
}

/// Failures while building a provider instance, before any request is made.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// could not assemble the shared reqwest client
    #[snafu(display("HTTP client construction failed: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors a `DataProvider` implementation can surface.
///
/// Every variant means the provider could not produce an answer; "no rows
/// for this range" is `Ok` with an empty series, never an error.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// The HTTP round-trip itself failed (connect error, timeout).
    #[snafu(display("HTTP request failed: {source}"))]
    Transport {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The vendor answered with an error object instead of chart data.
    #[snafu(display("API error ({code}): {message}"))]
    Api {
        code: String,
        message: String,
        backtrace: Backtrace,
    },

    /// The response body could not be decoded into a price series.
    #[snafu(display("Malformed provider payload: {message}"))]
    Payload {
        message: String,
        backtrace: Backtrace,
    },

    /// The provider itself could not be constructed.
    #[snafu(display("Provider setup failed: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}
