//! Configuration for the prioritizer HTTP service.

use std::env;
use std::path::PathBuf;

/// Log output format for the service binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// HTTP service configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    /// Optional scoring configuration file.
    pub scoring_config: Option<PathBuf>,
    /// Log output format.
    pub log_format: LogFormat,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
    /// Whether to answer CORS preflight requests from any origin.
    pub cors_enabled: bool,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env::var("PRIORITIZER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PRIORITIZER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            scoring_config: env::var("PRIORITIZER_CONFIG")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            log_format: env::var("PRIORITIZER_LOG_FORMAT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            max_body_bytes: env::var("PRIORITIZER_MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),
            cors_enabled: env::var("PRIORITIZER_CORS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            request_timeout_secs: env::var("PRIORITIZER_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl ServerConfig {
    /// Socket address string, e.g. `0.0.0.0:8000`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
