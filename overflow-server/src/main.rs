use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use overflow_server::{logging, EventsApi, LogFormat, SampleStore, Server, ServerConfig};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "overflow-server")]
#[command(about = "Serve overflow events detected in a sensor time series")]
struct Args {
    /// Config file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (e.g., "0.0.0.0:8080")
    #[arg(short, long)]
    listen: Option<String>,

    /// Path to the sample dataset JSON file
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Log level (e.g., "info", "debug")
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(listen) = self.listen {
            config.listen_addr = listen;
        }
        if let Some(dataset) = self.dataset {
            config.dataset_path = dataset;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.log_json {
            config.log_format = LogFormat::Json;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::load(args.config.as_deref())?;
    let config = args.apply(config);

    logging::init(&config.log_level, config.log_format);

    let store = Arc::new(SampleStore::new(&config.dataset_path));
    // Load in the background; the listener does not wait for it.
    store.warm();

    let api = EventsApi::new(Arc::clone(&store), config.query_defaults());
    let server = Server::bind(&config.listen_addr, api)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    info!(
        addr = %server.local_addr()?,
        dataset = %store.description(),
        "overflow-server started"
    );

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("overflow-server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "overflow-server",
            "--listen",
            "0.0.0.0:9000",
            "--dataset",
            "/data/series.json",
            "--log-level",
            "debug",
            "--log-json",
        ]);

        let config = args.apply(ServerConfig::default());
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.dataset_path, PathBuf::from("/data/series.json"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn no_flags_keep_config() {
        let args = Args::parse_from(["overflow-server"]);
        assert_eq!(args.apply(ServerConfig::default()), ServerConfig::default());
    }
}
