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
    pub api: ApiConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_ws_connections")]
    pub max_ws_connections: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_ws_connections() -> usize {
    1000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:8091".to_string(),
                "http://127.0.0.1:8091".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
            max_ws_connections: default_max_ws_connections(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Dashboard engine timing and behavior
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Panel activated on startup
    #[serde(default = "default_panel")]
    pub default_panel: String,

    #[serde(default = "default_metrics_interval")]
    pub metrics_interval_ms: u64,

    #[serde(default = "default_notification_ttl")]
    pub notification_ttl_ms: u64,

    #[serde(default = "default_upload_tick")]
    pub upload_tick_ms: u64,

    /// Upper bound of the random progress step per tick (percent)
    #[serde(default = "default_upload_max_step")]
    pub upload_max_step: f64,

    /// Pause between reaching 100% and the row appearing
    #[serde(default = "default_upload_finish_delay")]
    pub upload_finish_delay_ms: u64,

    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint_px: u32,

    #[serde(default = "default_viewport_width")]
    pub initial_viewport_width: u32,

    /// Fixed seed for the value generator; random when unset
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Capacity of the change-event broadcast channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_panel() -> String {
    "dashboard".to_string()
}

fn default_metrics_interval() -> u64 {
    3000
}

fn default_notification_ttl() -> u64 {
    5000
}

fn default_upload_tick() -> u64 {
    200
}

pub(crate) fn default_upload_max_step() -> f64 {
    30.0
}

fn default_upload_finish_delay() -> u64 {
    500
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["csv".to_string(), "mat".to_string()]
}

fn default_mobile_breakpoint() -> u32 {
    768
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_event_capacity() -> usize {
    1024
}

impl DashboardConfig {
    /// Check values that would stall the simulator
    pub fn validate(&self) -> Result<(), String> {
        if !self.upload_max_step.is_finite() || self.upload_max_step <= 0.0 {
            return Err(format!(
                "upload_max_step must be a positive number, got {}",
                self.upload_max_step
            ));
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_panel: default_panel(),
            metrics_interval_ms: default_metrics_interval(),
            notification_ttl_ms: default_notification_ttl(),
            upload_tick_ms: default_upload_tick(),
            upload_max_step: default_upload_max_step(),
            upload_finish_delay_ms: default_upload_finish_delay(),
            allowed_extensions: default_allowed_extensions(),
            mobile_breakpoint_px: default_mobile_breakpoint(),
            initial_viewport_width: default_viewport_width(),
            rng_seed: None,
            event_capacity: default_event_capacity(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json"
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
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    /// Filter directive used when RUST_LOG is not set
    pub fn directive(&self) -> String {
        format!("gridscope={},tower_http={}", self.level, self.level)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.dashboard.validate().map_err(|error| ConfigError::Invalid {
            path: path.to_path_buf(),
            error,
        })?;

        Ok(config)
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("gridscope").join("config.toml")),
            Some(PathBuf::from("/etc/gridscope/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = lookup("GRIDSCOPE_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("GRIDSCOPE_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        // Dashboard overrides
        if let Some(panel) = lookup("GRIDSCOPE_DEFAULT_PANEL") {
            self.dashboard.default_panel = panel;
        }
        if let Some(ms) = lookup("GRIDSCOPE_METRICS_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            self.dashboard.metrics_interval_ms = ms;
        }
        if let Some(seed) = lookup("GRIDSCOPE_RNG_SEED").and_then(|v| v.parse().ok()) {
            self.dashboard.rng_seed = Some(seed);
        }

        // Logging overrides
        if let Some(level) = lookup("GRIDSCOPE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("GRIDSCOPE_LOG_FORMAT") {
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

    #[error("Invalid value in config file {path:?}: {error}")]
    Invalid { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# GridScope Configuration
#
# Environment variables override these settings:
# - GRIDSCOPE_API_HOST
# - GRIDSCOPE_API_PORT
# - GRIDSCOPE_DEFAULT_PANEL
# - GRIDSCOPE_METRICS_INTERVAL_MS
# - GRIDSCOPE_RNG_SEED
# - GRIDSCOPE_LOG_LEVEL
# - GRIDSCOPE_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (empty list allows any origin)
cors_origins = ["http://localhost:8091", "http://127.0.0.1:8091"]

# Request timeout in seconds
request_timeout_secs = 30

# Maximum concurrent WebSocket clients
max_ws_connections = 1000

[dashboard]
# Panel shown on startup: dashboard, upload, logs or insights
default_panel = "dashboard"

# How often live readings are regenerated (ms)
metrics_interval_ms = 3000

# How long a toast stays up (ms)
notification_ttl_ms = 5000

# Simulated upload: tick interval (ms), max progress per tick (%), and
# delay between 100% and the table row appearing (ms)
upload_tick_ms = 200
upload_max_step = 30.0
upload_finish_delay_ms = 500

# Accepted upload extensions
allowed_extensions = ["csv", "mat"]

# Widths at or below this are treated as mobile (px)
mobile_breakpoint_px = 768

# Viewport width assumed until a client reports one (px)
initial_viewport_width = 1280

# Fixed seed for reproducible values
# rng_seed = 42

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.dashboard.metrics_interval_ms, 3000);
        assert_eq!(config.dashboard.notification_ttl_ms, 5000);
        assert_eq!(config.dashboard.allowed_extensions, vec!["csv", "mat"]);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.api.port, defaults.api.port);
        assert_eq!(config.dashboard.upload_tick_ms, defaults.dashboard.upload_tick_ms);
        assert_eq!(config.dashboard.default_panel, defaults.dashboard.default_panel);
        assert_eq!(config.dashboard.rng_seed, None);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nmetrics_interval_ms = 1000\nrng_seed = 7\n\n[logging]\nformat = \"json\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.dashboard.metrics_interval_ms, 1000);
        assert_eq!(config.dashboard.rng_seed, Some(7));
        assert_eq!(config.dashboard.notification_ttl_ms, 5000);
        assert!(config.logging.is_json());
        assert_eq!(config.api.port, 8090);
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/gridscope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = \"not a number\"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_rejects_stalling_upload_step() {
        for step in ["0.0", "-5.0", "nan"] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "[dashboard]\nupload_max_step = {}", step).unwrap();
            assert!(
                matches!(Config::load(file.path()), Err(ConfigError::Invalid { .. })),
                "step {} accepted",
                step
            );
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nupload_max_step = 12.5").unwrap();
        assert_eq!(Config::load(file.path()).unwrap().dashboard.upload_max_step, 12.5);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("GRIDSCOPE_API_PORT", "9999"),
            ("GRIDSCOPE_DEFAULT_PANEL", "logs"),
            ("GRIDSCOPE_RNG_SEED", "not-a-seed"),
            ("GRIDSCOPE_LOG_LEVEL", "debug"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.port, 9999);
        assert_eq!(config.dashboard.default_panel, "logs");
        assert_eq!(config.dashboard.rng_seed, None);
        assert_eq!(config.logging.directive(), "gridscope=debug,tower_http=debug");
    }
}
