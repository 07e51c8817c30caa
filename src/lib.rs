//! # Painel
//!
//! Host side of the Painel Search Console dashboard: a static file server
//! for the page and its WebAssembly bundle, plus the oracle summary
//! endpoint that derives impressions, clicks and CTR from local CSV exports.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration with `PAINEL_*` environment overrides
//! - [`oracle`]: CSV-derived summary and its history file
//! - [`api`]: HTTP server with Axum
//!
//! Document parsing, formatting and rendering rules live in `painel-core`,
//! shared with the browser build.

pub mod api;
pub mod config;
pub mod oracle;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LogFormat, LoggingConfig, OracleConfig, ServerConfig};

pub use oracle::{CsvTable, History, Oracle, OracleError, OracleResponse, OracleSummary};

/// Install the global tracing subscriber described by `logging`
pub fn init_tracing(logging: &LoggingConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.filter()));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.output_format() {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
    }
}
