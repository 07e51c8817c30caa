//! Painel Server
//!
//! Run with: cargo run --bin painel
//!
//! # Configuration
//!
//! Reads `--config <path>` when given, otherwise the first of
//! `$XDG_CONFIG_HOME/painel/config.toml`, `/etc/painel/config.toml` and
//! `./painel.toml`. Environment variables override file values:
//! - `PAINEL_HOST`, `PAINEL_PORT`: Bind address (default: 0.0.0.0:8084)
//! - `PAINEL_PUBLIC_DIR`: Site root (default: ./public)
//! - `PAINEL_DOCUMENT`: Metrics document name (default: dados_oraculares.json)
//! - `PAINEL_CLICKS_CSV`, `PAINEL_IMPRESSIONS_CSV`, `PAINEL_HISTORY_CSV`: Oracle files
//! - `PAINEL_LOG_LEVEL`, `PAINEL_LOG_FORMAT`: Logging (`RUST_LOG` wins when set)

use anyhow::Context;
use clap::Parser;
use painel::api::{serve, AppState};
use painel::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "painel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the Painel dashboard and its oracle endpoint")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let source = args.config.or_else(Config::find_default_path);
    let config = match &source {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::from_env(),
    };

    painel::init_tracing(&config.logging);

    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    tracing::info!("Starting Painel server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Public directory: {:?}", config.server.public_dir);
    tracing::info!("Metrics document: {:?}", config.server.document_path());
    tracing::info!(
        "Oracle inputs: clicks={:?} impressions={:?} history={:?}",
        config.oracle.clicks_csv,
        config.oracle.impressions_csv,
        config.oracle.history_csv
    );

    if !config.server.public_dir.is_dir() {
        tracing::warn!(
            "Public directory {:?} does not exist, static requests will 404",
            config.server.public_dir
        );
    }

    serve(AppState::new(config)).await?;

    tracing::info!("Painel server stopped");
    Ok(())
}
