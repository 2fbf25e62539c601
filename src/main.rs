//! GridScope Server
//!
//! Run with: cargo run --bin gridscope
//!
//! # Configuration
//!
//! Loaded from `--config`, or from the first of
//! `~/.config/gridscope/config.toml`, `/etc/gridscope/config.toml` and
//! `./config.toml`. `GRIDSCOPE_*` environment variables override file
//! values; `RUST_LOG` overrides the configured log level.

use anyhow::Context;
use clap::Parser;
use gridscope::api::{serve, AppState};
use gridscope::config::{Config, LoggingConfig};
use gridscope::dashboard::Dashboard;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "gridscope")]
#[command(author, version, about = "Power quality monitoring dashboard server", long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Fixed seed for simulated values
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(seed) = args.seed {
        config.dashboard.rng_seed = Some(seed);
    }

    init_tracing(&config.logging);

    tracing::info!("Starting GridScope server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        metrics_interval_ms = config.dashboard.metrics_interval_ms,
        notification_ttl_ms = config.dashboard.notification_ttl_ms,
        seeded = config.dashboard.rng_seed.is_some(),
        "Dashboard settings"
    );

    let dashboard = Dashboard::new(config.dashboard.clone());
    dashboard
        .start()
        .await
        .context("starting dashboard engine")?;

    serve(AppState::new(dashboard, config.api.clone()))
        .await
        .with_context(|| format!("serving API on {}", config.api.addr()))?;

    tracing::info!("GridScope server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.directive()));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
