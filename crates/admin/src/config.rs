//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (default: 3001)
//! - `BACKEND_API_URL` - REST backend base URL (default: <http://localhost:8080>)
//! - `BACKEND_TIMEOUT_SECS` - Per-request timeout (default: none)
//! - `BC_SDK_URL` - Embedding SDK script (default: the BigCommerce CDN)
//! - `FETCH_CACHE_CAPACITY` - Max cached pages (default: 1000)
//! - `FETCH_CACHE_TTL_SECS` - Cache time-to-live (default: none, valid until invalidated)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BACKEND_API_URL: &str = "http://localhost:8080";
const DEFAULT_SDK_URL: &str = "https://cdn.bigcommerce.com/jssdk/bc-sdk.js";
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// REST backend configuration
    pub backend: BackendConfig,
    /// Embedding SDK script URL
    pub sdk_url: String,
    /// Response cache configuration
    pub cache: CacheConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// REST backend configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL; API paths (`/api/...`) are joined onto it
    pub api_url: Url,
    /// Per-request timeout, `None` for network defaults
    pub timeout: Option<Duration>,
}

/// Response cache configuration.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Max entries per resource
    pub max_capacity: u64,
    /// Entries expire after this long, `None` keeps them until invalidated
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_CACHE_CAPACITY,
            ttl: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("DASHBOARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("DASHBOARD_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_PORT".to_string(), e.to_string()))?;

        let backend = BackendConfig::from_env()?;
        let sdk_url = get_env_or_default("BC_SDK_URL", DEFAULT_SDK_URL);
        let cache = CacheConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            backend,
            sdk_url,
            cache,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_url = parse_api_url(&get_env_or_default(
            "BACKEND_API_URL",
            DEFAULT_BACKEND_API_URL,
        ))?;
        let timeout = get_optional_secs("BACKEND_TIMEOUT_SECS")?;
        Ok(Self { api_url, timeout })
    }
}

impl CacheConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let max_capacity = get_optional_env("FETCH_CACHE_CAPACITY")
            .map(|v| {
                v.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("FETCH_CACHE_CAPACITY".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_CACHE_CAPACITY);
        let ttl = get_optional_secs("FETCH_CACHE_TTL_SECS")?;
        Ok(Self { max_capacity, ttl })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the backend base URL. Only http(s) is accepted.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BACKEND_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get an optional whole number of seconds as a `Duration`.
fn get_optional_secs(key: &str) -> Result<Option<Duration>, ConfigError> {
    get_optional_env(key)
        .map(|v| {
            v.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}
