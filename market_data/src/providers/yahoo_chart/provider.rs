use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{header, Client};
use snafu::ResultExt;
use tracing::debug;

use crate::models::{request::BarsRequest, series::PriceSeries};
use crate::providers::yahoo_chart::params::ChartQuery;
use crate::providers::yahoo_chart::response::{self, ChartEnvelope};
use crate::providers::{
    ApiSnafu, ClientBuildSnafu, DataProvider, PayloadSnafu, ProviderError, ProviderInitError,
    TransportSnafu,
};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_REQUESTS_PER_MINUTE: NonZeroU32 = nonzero!(30u32);

// The public endpoint refuses requests that carry no browser user agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Tuning knobs for [`YahooChartProvider`].
#[derive(Debug, Clone)]
pub struct YahooChartConfig {
    /// Chart endpoint base, without the trailing symbol segment.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Upper bound on the request rate against the endpoint.
    pub requests_per_minute: NonZeroU32,
}

impl Default for YahooChartConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }
}

/// Daily-bar provider backed by Yahoo's unauthenticated chart endpoint.
pub struct YahooChartProvider {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl YahooChartProvider {
    /// Creates a provider against the public Yahoo endpoint with default limits.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_config(YahooChartConfig::default())
    }

    /// Creates a provider with explicit endpoint and rate settings.
    pub fn with_config(config: YahooChartConfig) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url,
            limiter: RateLimiter::direct(Quota::per_minute(config.requests_per_minute)),
        })
    }
}

#[async_trait]
impl DataProvider for YahooChartProvider {
    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<PriceSeries, ProviderError> {
        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url, request.symbol);
        let response = self
            .client
            .get(&url)
            .query(&ChartQuery::daily(request))
            .send()
            .await
            .context(TransportSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu {
                code: status.as_str(),
                message,
            }
            .fail();
        }

        let body = response.text().await.context(TransportSnafu)?;
        let envelope: ChartEnvelope = serde_json::from_str(&body).map_err(|err| {
            PayloadSnafu {
                message: err.to_string(),
            }
            .build()
        })?;

        let series = response::into_price_series(envelope, &request.symbol)?;
        debug!(symbol = %request.symbol, rows = series.len(), "decoded chart response");
        Ok(series)
    }
}
