//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP host configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served as the site root
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Metrics document file name, relative to `public_dir`
    #[serde(default = "default_document")]
    pub document: String,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8084
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("./public")
}

fn default_document() -> String {
    painel_core::DEFAULT_DOCUMENT.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
            document: default_document(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full path of the served metrics document
    pub fn document_path(&self) -> PathBuf {
        self.public_dir.join(&self.document)
    }
}

/// Inputs and output of the oracle summary
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// CSV whose rows (or `cliques`/`clicks` column) count clicks
    #[serde(default = "default_clicks_csv")]
    pub clicks_csv: PathBuf,

    /// CSV whose rows (or `impressoes`/`impressions` column) count impressions
    #[serde(default = "default_impressions_csv")]
    pub impressions_csv: PathBuf,

    /// Append-only summary history
    #[serde(default = "default_history_csv")]
    pub history_csv: PathBuf,
}

fn desktop_dir() -> PathBuf {
    dirs::desktop_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_clicks_csv() -> PathBuf {
    desktop_dir().join("diagnosticos_sinteticos_100.csv")
}

fn default_impressions_csv() -> PathBuf {
    desktop_dir().join("respostas.csv")
}

fn default_history_csv() -> PathBuf {
    default_public_dir().join("historico_oracular.csv")
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            clicks_csv: default_clicks_csv(),
            impressions_csv: default_impressions_csv(),
            history_csv: default_history_csv(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive for `tracing_subscriber::EnvFilter`
    pub fn filter(&self) -> String {
        format!("painel={},tower_http={}", self.level, self.level)
    }

    pub fn is_json(&self) -> bool {
        self.output_format() == LogFormat::Json
    }

    /// Subscriber output style named by `format`; unknown names are compact
    pub fn output_format(&self) -> LogFormat {
        match self.format.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human oriented
    Pretty,
    /// Single line per event
    Compact,
    /// One JSON object per event
    Json,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        config.expand_home_paths();
        Ok(config)
    }

    /// Resolve a leading `~/` in file paths against the home directory
    fn expand_home_paths(&mut self) {
        for path in [
            &mut self.server.public_dir,
            &mut self.oracle.clicks_csv,
            &mut self.oracle.impressions_csv,
            &mut self.oracle.history_csv,
        ] {
            *path = expand_home(path);
        }
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// First existing config file among the standard locations
    pub fn find_default_path() -> Option<PathBuf> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("painel").join("config.toml")),
            Some(PathBuf::from("/etc/painel/config.toml")),
            Some(PathBuf::from("./painel.toml")),
        ];

        config_paths.into_iter().flatten().find(|path| path.exists())
    }

    /// Load from default locations or environment
    ///
    /// A config file that exists but cannot be read or parsed is an error,
    /// not a silent fallback to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::find_default_path() {
            Some(path) => Self::load_with_env(&path),
            None => Ok(Self::from_env()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = var("PAINEL_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PAINEL_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid PAINEL_PORT={:?}", port),
            }
        }
        if let Some(dir) = var("PAINEL_PUBLIC_DIR") {
            self.server.public_dir = PathBuf::from(dir);
        }
        if let Some(document) = var("PAINEL_DOCUMENT") {
            self.server.document = document;
        }

        // Oracle overrides
        if let Some(path) = var("PAINEL_CLICKS_CSV") {
            self.oracle.clicks_csv = PathBuf::from(path);
        }
        if let Some(path) = var("PAINEL_IMPRESSIONS_CSV") {
            self.oracle.impressions_csv = PathBuf::from(path);
        }
        if let Some(path) = var("PAINEL_HISTORY_CSV") {
            self.oracle.history_csv = PathBuf::from(path);
        }

        // Logging overrides
        if let Some(level) = var("PAINEL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("PAINEL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
///
/// Oracle paths are written out resolved for the current user.
pub fn generate_default_config() -> String {
    format!(
        r#"# Painel Configuration
#
# Environment variables override these settings:
# - PAINEL_HOST, PAINEL_PORT
# - PAINEL_PUBLIC_DIR, PAINEL_DOCUMENT
# - PAINEL_CLICKS_CSV, PAINEL_IMPRESSIONS_CSV, PAINEL_HISTORY_CSV
# - PAINEL_LOG_LEVEL, PAINEL_LOG_FORMAT
#
# Paths may start with "~/" for the home directory.

[server]
# Host to bind to
host = "0.0.0.0"

# Port to listen on
port = 8084

# Directory served as the site root (page, wasm bundle, metrics document)
public_dir = "./public"

# Metrics document, relative to public_dir
document = "dados_oraculares.json"

# Allowed CORS origins (empty = any origin)
cors_origins = []

[oracle]
# CSV counting clicks (column "cliques"/"clicks", else one click per row)
clicks_csv = {clicks}

# CSV counting impressions (column "impressoes"/"impressions", else one per row)
impressions_csv = {impressions}

# Summary history, one row appended per request
history_csv = "./public/historico_oracular.csv"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or compact (for development), json (for production)
format = "pretty"
"#,
        clicks = toml_path(&default_clicks_csv()),
        impressions = toml_path(&default_impressions_csv()),
    )
}

/// Quoted TOML string for a path
fn toml_path(path: &Path) -> String {
    toml::Value::String(path.display().to_string()).to_string()
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
