//! Batch chart requests: many charts from one JSON document.
//!
//! The document is a JSON array of items. Dates are optional; an item
//! without them charts the default lookback window:
//!
//! ```json
//! [
//!     {"symbol": "AAPL", "start": "2024-01-01", "end": "2024-06-30"},
//!     {"symbol": "Kakao"}
//! ]
//! ```

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

/// One batch entry: a ticker plus an optional explicit date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    /// Watchlist label or vendor symbol, resolved like the `--symbol` flag.
    pub symbol: String,
    /// Inclusive range start, `YYYY-MM-DD`; defaults like the CLI.
    #[serde(default)]
    pub start: Option<String>,
    /// Inclusive range end, `YYYY-MM-DD`; defaults like the CLI.
    #[serde(default)]
    pub end: Option<String>,
}

/// Parses batch items from an inline JSON string.
pub fn items_from_json_str(json: &str) -> anyhow::Result<Vec<BatchItem>> {
    serde_json::from_str(json).context("failed to parse batch items JSON")
}

/// Reads and parses batch items from a JSON file.
pub fn items_from_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<BatchItem>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("read batch file {}", path.as_ref().display()))?;
    items_from_json_str(&content)
}

/// Reads and parses batch items from a reader, typically stdin.
pub fn items_from_reader(mut reader: impl Read) -> anyhow::Result<Vec<BatchItem>> {
    let mut buffer = String::new();
    reader
        .read_to_string(&mut buffer)
        .context("read batch items")?;
    items_from_json_str(&buffer)
}

/// Resolves the `--source`/`--input` flag pair into parsed items.
///
/// `source` is one of `file`, `stdin`, or `json`; `file` wants `input` as a
/// path and `json` wants it as an inline JSON string.
pub fn load_items(source: &str, input: Option<&str>) -> anyhow::Result<Vec<BatchItem>> {
    match source {
        "file" => {
            let path = input.context("--input is required when --source=file")?;
            items_from_file(path)
        }
        "stdin" => items_from_reader(std::io::stdin().lock()),
        "json" => {
            let json = input.context("--input is required when --source=json")?;
            items_from_json_str(json)
        }
        other => bail!("invalid batch source {other:?}; use 'file', 'stdin', or 'json'"),
    }
}
