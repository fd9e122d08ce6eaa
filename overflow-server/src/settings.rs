//! Server settings.
//!
//! Settings are layered: built-in defaults, then an optional config file
//! (TOML, YAML or JSON by extension), then `OVERFLOW_*` environment
//! variables. Command-line flags are applied on top by the binary.
//!
//! ```toml
//! listen_addr = "0.0.0.0:8080"
//! dataset_path = "/data/overflow-timeseries.json"
//! default_min_duration_minutes = 5.0
//! default_max_gap_minutes = 10.0
//! log_format = "json"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::logging::LogFormat;
use crate::query::EventsQuery;

/// Runtime settings for the events server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub listen_addr: String,
    /// Path of the sample dataset.
    pub dataset_path: PathBuf,
    /// Threshold used when a request omits it.
    pub default_threshold: f64,
    /// Minimum duration in minutes used when a request omits it.
    pub default_min_duration_minutes: f64,
    /// Maximum gap in minutes used when a request omits it.
    pub default_max_gap_minutes: f64,
    /// Base log level (overridden by `RUST_LOG`).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let defaults = EventsQuery::default();
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            dataset_path: PathBuf::from("overflow-timeseries.json"),
            default_threshold: defaults.threshold,
            default_min_duration_minutes: defaults.min_duration_minutes,
            default_max_gap_minutes: defaults.max_gap_minutes,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix("OVERFLOW"))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(env.try_parsing(true))
            .build()
            .with_context(|| match path {
                Some(p) => format!("failed to load config from {}", p.display()),
                None => "failed to load config from environment".to_string(),
            })?;

        config
            .try_deserialize()
            .context("invalid server configuration")
    }

    /// Defaults applied to `/events` requests.
    pub fn query_defaults(&self) -> EventsQuery {
        EventsQuery {
            threshold: self.default_threshold,
            min_duration_minutes: self.default_min_duration_minutes,
            max_gap_minutes: self.default_max_gap_minutes,
        }
    }
}
