//! Process-wide tracing setup.

use std::io;
use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static LOGGER_ONCE: OnceLock<()> = OnceLock::new();

const DEFAULT_FILTER: &str = "info";

/// Initializes the global tracing subscriber. Idempotent.
///
/// Log lines go to stderr; stdout belongs to rendered charts and batch
/// output. `RUST_LOG` overrides the default `info` filter.
pub fn init_logging() {
    LOGGER_ONCE.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let fmt_layer = fmt::layer().with_target(true).with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    });
}
