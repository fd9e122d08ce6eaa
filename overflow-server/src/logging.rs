//! Structured logging setup.
//!
//! Logs go to stderr, either human-readable or as JSON lines. `RUST_LOG`
//! takes precedence over the configured level when set.

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Build the filter: `RUST_LOG` if set and valid, otherwise `level` for
/// this workspace's crates and `warn` for everything else.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,overflow_server={level},overflow_detector={level}"
        ))
    })
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(level: &str, format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .with_target(true);

    match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}
