//! Logging setup.
//!
//! Console output through `tracing-subscriber`. The filter comes from
//! `RUST_LOG` if set, else `LOG_LEVEL`, else `info`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when neither variable is set.
pub const DEFAULT_LEVEL: &str = "info";

/// Build a filter from the given `RUST_LOG` and `LOG_LEVEL` values.
///
/// Invalid directives fall through to the next source.
pub fn build_filter(rust_log: Option<&str>, log_level: Option<&str>) -> EnvFilter {
    [rust_log, log_level]
        .into_iter()
        .flatten()
        .filter(|directives| !directives.trim().is_empty())
        .find_map(|directives| EnvFilter::try_new(directives.to_lowercase()).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging() -> Result<(), tracing_subscriber::util::TryInitError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let filter = build_filter(rust_log.as_deref(), log_level.as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}
