//! Configuration module for newsdesk.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

use crate::news::scheduler::DEFAULT_CRAWL_INTERVAL_SECS;
use crate::news::types::{DEFAULT_SOURCE_DELAY_MS, MAX_ENTRIES, MAX_FEED_SIZE};
use crate::{NewsError, Result};

/// Crawler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Interval between scheduled crawl cycles in seconds.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Delay between two consecutive sources in milliseconds.
    #[serde(default = "default_source_delay")]
    pub source_delay_ms: u64,
    /// Retention window: maximum number of entries kept after ranking.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// User agent sent with every feed request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_interval() -> u64 {
    DEFAULT_CRAWL_INTERVAL_SECS
}

fn default_source_delay() -> u64 {
    DEFAULT_SOURCE_DELAY_MS
}

fn default_max_entries() -> usize {
    MAX_ENTRIES
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_feed_size() -> u64 {
    MAX_FEED_SIZE
}

fn default_user_agent() -> String {
    concat!("newsdesk/", env!("CARGO_PKG_VERSION"), " (feed crawler)").to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            source_delay_ms: default_source_delay(),
            max_entries: default_max_entries(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
            max_feed_size_bytes: default_max_feed_size(),
            user_agent: default_user_agent(),
        }
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the JSON snapshot file.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    "ai_news.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/newsdesk.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web read API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Whether the web server is started.
    #[serde(default = "default_web_enabled")]
    pub enabled: bool,
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// Whether to serve static files for paths outside the API.
    #[serde(default = "default_serve_static")]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_web_enabled() -> bool {
    true
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    80
}

fn default_serve_static() -> bool {
    true
}

fn default_static_path() -> String {
    ".".to_string()
}

impl WebConfig {
    /// Socket address the web server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| NewsError::Config(format!("invalid web address: {e}")))
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: default_web_enabled(),
            host: default_web_host(),
            port: default_web_port(),
            serve_static: default_serve_static(),
            static_path: default_static_path(),
            cors_origins: vec![],
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Crawler configuration.
    #[serde(default)]
    pub crawler: CrawlerConfig,
    /// Snapshot storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web read API configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(NewsError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| NewsError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: Override the web server port
    pub fn apply_env_overrides(&mut self) {
        self.apply_port_override(std::env::var("PORT").ok().as_deref());
    }

    fn apply_port_override(&mut self, value: Option<&str>) {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        match value.parse::<u16>() {
            Ok(port) => self.web.port = port,
            Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", value),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.interval_secs == 0 {
            return Err(NewsError::Validation(
                "crawler.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.crawler.max_entries == 0 {
            return Err(NewsError::Validation(
                "crawler.max_entries must be greater than zero".to_string(),
            ));
        }
        if self.crawler.connect_timeout_secs == 0
            || self.crawler.read_timeout_secs == 0
            || self.crawler.total_timeout_secs == 0
        {
            return Err(NewsError::Validation(
                "crawler timeouts must be greater than zero".to_string(),
            ));
        }
        if self.storage.path.trim().is_empty() {
            return Err(NewsError::Validation(
                "storage.path must not be empty".to_string(),
            ));
        }
        if self.web.enabled {
            self.web.bind_addr()?;
        }
        Ok(())
    }
}
