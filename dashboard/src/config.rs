//! Dashboard configuration: parsing, normalization, and loading.
//!
//! A TOML-backed config that describes:
//! - The watchlist (display label -> vendor symbol), order preserved
//! - Moving-average overlays (window, label, color, default visibility)
//! - Fetch settings for the chart provider (endpoint, timeout, rate limit)
//!
//! Key behaviors:
//! - Normalization trims labels, trims + uppercases symbols, and
//!   de-duplicates watchlist entries by symbol while preserving order.
//! - Overlays are de-duplicated by window, first occurrence wins.
//! - Every section is optional; omitted sections fall back to the built-in
//!   defaults, so an empty file is a valid config.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]
//! - Resolve flag, then `STOCK_CHARTER_CONFIG`, then defaults: [`load_config`]

use std::collections::HashSet;
use std::mem;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use indexmap::IndexMap;
use market_data::providers::yahoo_chart::YahooChartConfig;
use serde::{Deserialize, Serialize};
use shared_utils::env::get_env_var_opt;
use toml::from_str;
use tracing::debug;

use chart_metrics::derive::MA_WINDOWS;

/// Environment variable consulted when no `--config` flag is given.
pub const CONFIG_ENV: &str = "STOCK_CHARTER_CONFIG";

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    /// Watchlist mapping display label -> vendor symbol, in display order.
    ///
    /// Labels are what the user sees and types; symbols are what the
    /// provider is asked for.
    #[serde(default = "default_watchlist")]
    pub watchlist: IndexMap<String, String>,

    /// Moving-average overlays, in display order.
    #[serde(default = "default_overlays")]
    pub overlays: Vec<OverlayConfig>,

    /// Provider fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            watchlist: default_watchlist(),
            overlays: default_overlays(),
            fetch: FetchConfig::default(),
        }
    }
}

/// One moving-average overlay.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayConfig {
    /// Window length in trading days.
    pub window: usize,
    /// Legend label (e.g., "MA5").
    pub label: String,
    /// Line color, passed through to the renderer untouched.
    pub color: String,
    /// Whether the overlay is drawn. Defaults to `true`.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Provider fetch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct FetchConfig {
    /// Chart endpoint base, without the trailing symbol segment.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Upper bound on the request rate against the endpoint.
    pub requests_per_minute: NonZeroU32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let provider = YahooChartConfig::default();
        Self {
            base_url: provider.base_url,
            timeout_secs: provider.timeout.as_secs(),
            requests_per_minute: provider.requests_per_minute,
        }
    }
}

impl FetchConfig {
    /// Provider construction settings for these fetch options.
    pub fn provider_config(&self) -> YahooChartConfig {
        YahooChartConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            requests_per_minute: self.requests_per_minute,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_watchlist() -> IndexMap<String, String> {
    [
        ("Apple", "AAPL"),
        ("Microsoft", "MSFT"),
        ("Google", "GOOGL"),
        ("Amazon", "AMZN"),
        ("Tesla", "TSLA"),
        ("Samsung Electronics", "005930.KS"),
        ("Naver", "035420.KS"),
        ("Kakao", "035720.KS"),
    ]
    .into_iter()
    .map(|(label, symbol)| (label.to_string(), symbol.to_string()))
    .collect()
}

fn default_overlays() -> Vec<OverlayConfig> {
    const COLORS: [&str; 3] = ["blue", "orange", "red"];
    MA_WINDOWS
        .iter()
        .zip(COLORS)
        .map(|(&window, color)| OverlayConfig {
            window,
            label: format!("MA{window}"),
            color: color.to_string(),
            enabled: true,
        })
        .collect()
}

/// Summary of changes performed during normalization.
///
/// All counters are additive for the processed config.
#[derive(Debug, Default)]
pub struct NormalizationReport {
    /// Watchlist entries whose label or symbol changed while trimming/uppercasing.
    pub entries_rewritten: usize,
    /// Count of removed watchlist entries with a duplicate symbol.
    pub symbols_deduped: usize,
    /// Count of removed overlays with a duplicate window.
    pub overlays_deduped: usize,
}

/// Normalize a config in-place.
///
/// What normalization does:
/// - Trim watchlist labels; trim + uppercase symbols; reject empties and
///   duplicate labels; drop duplicate symbols preserving first occurrence
/// - Trim overlay labels and colors; reject zero windows; drop duplicate
///   windows preserving first occurrence
/// - Trim the fetch base URL and strip its trailing slash
///
/// Returns:
/// - A [`NormalizationReport`] detailing the changes made
///
/// Errors:
/// - Empty labels, symbols, overlay labels or colors after trimming
/// - Duplicate watchlist labels after normalization
/// - An empty watchlist, a zero overlay window, an empty base URL, or a
///   zero timeout
pub fn normalize_config(config: &mut ChartConfig) -> anyhow::Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    // Rebuild the watchlist map
    let mut rebuilt: IndexMap<String, String> = IndexMap::new();
    let mut seen_symbols: HashSet<String> = HashSet::new();

    for (raw_label, raw_symbol) in mem::take(&mut config.watchlist) {
        let label = raw_label.trim().to_string();
        if label.is_empty() {
            bail!("watchlist label cannot be empty after trimming");
        }
        let symbol = raw_symbol.trim().to_uppercase();
        if symbol.is_empty() {
            bail!("watchlist symbol for '{label}' cannot be empty after trimming");
        }
        if label != raw_label || symbol != raw_symbol {
            report.entries_rewritten += 1;
        }
        if rebuilt.contains_key(&label) {
            bail!("duplicate watchlist label after normalization: {label}");
        }
        if !seen_symbols.insert(symbol.clone()) {
            report.symbols_deduped += 1;
            continue;
        }
        rebuilt.insert(label, symbol);
    }
    if rebuilt.is_empty() {
        bail!("watchlist cannot be empty");
    }
    config.watchlist = rebuilt;

    // Overlays: dedupe by window, first occurrence wins
    let before_len = config.overlays.len();
    let mut seen_windows = HashSet::new();
    let mut overlays = Vec::with_capacity(before_len);

    for mut overlay in mem::take(&mut config.overlays) {
        if overlay.window == 0 {
            bail!("overlay window must be at least 1");
        }
        overlay.label = overlay.label.trim().to_string();
        if overlay.label.is_empty() {
            bail!("overlay label cannot be empty after trimming");
        }
        overlay.color = overlay.color.trim().to_string();
        if overlay.color.is_empty() {
            bail!("overlay color cannot be empty after trimming");
        }
        if seen_windows.insert(overlay.window) {
            overlays.push(overlay);
        }
    }
    report.overlays_deduped = before_len.saturating_sub(overlays.len());
    config.overlays = overlays;

    // Fetch settings
    config.fetch.base_url = config
        .fetch
        .base_url
        .trim()
        .trim_end_matches('/')
        .to_string();
    if config.fetch.base_url.is_empty() {
        bail!("fetch.base_url cannot be empty");
    }
    if config.fetch.timeout_secs == 0 {
        bail!("fetch.timeout_secs must be at least 1");
    }

    Ok(report)
}

/// Parse and normalize a config from a TOML string.
///
/// Steps:
/// - Deserialize TOML into [`ChartConfig`]
/// - Normalize via [`normalize_config`]
///
/// Errors:
/// - TOML parse failures (including unknown fields)
/// - Normalization errors (see [`normalize_config`])
pub fn load_config_str(toml_str: &str) -> anyhow::Result<ChartConfig> {
    let mut config: ChartConfig = from_str(toml_str).context("failed to parse config TOML")?;
    let report = normalize_config(&mut config).context("normalize_config failed")?;
    debug!(?report, "loaded dashboard config");
    Ok(config)
}

/// Read a config TOML file from disk, parse, and normalize it.
///
/// See [`load_config_str`] for details on parsing and normalization.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<ChartConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}

/// Loads the effective config.
///
/// Sources, in order: the explicit path (from `--config`), the
/// [`CONFIG_ENV`] environment variable, then the built-in defaults. A path
/// that is given but unreadable is an error, not a silent fallback.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ChartConfig> {
    if let Some(path) = explicit {
        return load_config_path(path);
    }
    if let Some(path) = get_env_var_opt(CONFIG_ENV) {
        return load_config_path(&path);
    }
    Ok(ChartConfig::default())
}
