//! Request-keyed memoization for provider fetches.
//!
//! [`QuoteCache`] remembers every successful fetch for the lifetime of the
//! process; there is no invalidation and no eviction, so a bar revised
//! upstream mid-session is not observed until the next run. The cache is an
//! explicit object owned by a [`CachedFetcher`] rather than process-global
//! state, so two fetchers never share entries by accident.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::models::{request::BarsRequest, series::PriceSeries};
use crate::providers::{DataProvider, ProviderError};

/// Memoized fetch results, keyed by the exact request triple.
///
/// Two requests share an entry only when symbol, start and end all match;
/// overlapping ranges are separate entries and are fetched separately.
#[derive(Debug, Default)]
pub struct QuoteCache {
    entries: Mutex<HashMap<BarsRequest, Arc<PriceSeries>>>,
    hits: AtomicU64,
}

impl QuoteCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a previously cached series.
    pub fn get(&self, request: &BarsRequest) -> Option<Arc<PriceSeries>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let hit = entries.get(request).cloned();
        if hit.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// Stores a fetched series and returns the shared handle.
    pub fn insert(&self, request: BarsRequest, series: PriceSeries) -> Arc<PriceSeries> {
        let series = Arc::new(series);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(request, Arc::clone(&series));
        series
    }

    /// Number of cached requests.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many lookups were answered from memory.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// A [`DataProvider`] wrapped with request-keyed memoization.
///
/// Owns both the provider and the cache. Only successful fetches are
/// memoized; a failed request leaves no entry behind and is retried on the
/// next call with the same key.
pub struct CachedFetcher {
    provider: Box<dyn DataProvider + Send + Sync>,
    cache: QuoteCache,
}

impl CachedFetcher {
    /// Wraps `provider` with a fresh, empty cache.
    pub fn new(provider: Box<dyn DataProvider + Send + Sync>) -> Self {
        Self {
            provider,
            cache: QuoteCache::new(),
        }
    }

    /// Read access to the underlying cache.
    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Fetches the series for `request`, answering from memory when possible.
    ///
    /// An inverted range (start after end) resolves to an empty series
    /// without a provider round-trip, mirroring the provider's own "no rows
    /// for this range" outcome.
    pub async fn fetch(&self, request: &BarsRequest) -> Result<Arc<PriceSeries>, ProviderError> {
        if let Some(series) = self.cache.get(request) {
            debug!(symbol = %request.symbol, "answering fetch from cache");
            return Ok(series);
        }

        let series = if request.is_inverted() {
            debug!(symbol = %request.symbol, "inverted range, skipping provider");
            PriceSeries::empty(&request.symbol)
        } else {
            debug!(
                symbol = %request.symbol,
                start = %request.start,
                end = %request.end,
                "cache miss, querying provider"
            );
            self.provider.fetch_daily_bars(request).await?
        };

        info!(
            symbol = %request.symbol,
            start = %request.start,
            end = %request.end,
            rows = series.len(),
            "fetched daily bars"
        );
        Ok(self.cache.insert(request.clone(), series))
    }
}
