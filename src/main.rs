//! Virtual Table Server (vts)
//!
//! Named in-memory tables of delimited rows, served over a minimal
//! HTTP/1.x interface.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────▶ net::listener ──▶ http::server ──▶ routing::router ──▶ modules::vts
//!                                                                          │
//!                                                                          ▼
//!     Client Response                                               table::registry
//!     ◀────────── http::response ◀──────────────────────────────── table::engine
//!
//!     Cross-cutting: config, observability, lifecycle (startup / stop / drain)
//! ```

use std::path::PathBuf;

use clap::Parser;

use vts::config::loader::check;
use vts::config::{load_config, TableConfig, VtsConfig};
use vts::lifecycle::{self, signals, Shutdown};
use vts::net::Listener;
use vts::observability;

#[derive(Parser, Debug)]
#[command(name = "vts", version, about = "Virtual table server")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the config file
    #[arg(short, long)]
    bind: Option<String>,

    /// Table to create at startup: name[,filename[,delimiter]] (repeatable)
    #[arg(short, long = "table", value_parser = parse_table)]
    tables: Vec<TableConfig>,

    /// Log level, overrides the config file (RUST_LOG wins over both)
    #[arg(long)]
    log_level: Option<String>,
}

fn parse_table(value: &str) -> Result<TableConfig, String> {
    let mut parts = value.splitn(3, ',');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err("table name is empty".to_string());
    }
    let non_empty = |part: Option<&str>| part.filter(|p| !p.is_empty()).map(str::to_string);
    Ok(TableConfig {
        name: name.to_string(),
        filename: non_empty(parts.next()),
        delimiter: non_empty(parts.next()),
    })
}

fn apply_overrides(mut config: VtsConfig, cli: Cli) -> VtsConfig {
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    config.tables.extend(cli.tables);
    config
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => VtsConfig::default(),
    };
    let config = apply_overrides(config, cli);

    observability::logging::init(&config.observability.log_level);
    tracing::info!("vts v{} starting", env!("CARGO_PKG_VERSION"));

    check(&config)?;
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tables = config.tables.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let services = lifecycle::initialize(&config)?;
    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let stopped = shutdown.subscribe();
    tokio::spawn(signals::wait_for_stop(shutdown.clone()));

    services.server.run(listener, stopped).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
