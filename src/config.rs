//! Service configuration from CLI arguments and environment variables.

use std::time::Duration;

use clap::Parser;
use secrecy::{ExposeSecret, SecretString};

/// Minimum required JWT secret length (256 bits).
const MIN_JWT_SECRET_LEN: usize = 32;

/// Freight marketplace admin panel configuration.
///
/// All values can be set via environment variables or CLI arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "freight-admin", about = "Freight marketplace back-office admin panel")]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "HTTP_ADDRESS", default_value = "0.0.0.0:8080")]
    pub http_address: String,

    /// Mount point of the admin pages
    #[arg(long, env = "ADMIN_PREFIX", default_value = "/admin")]
    pub admin_prefix: String,

    /// CORS allowed origins (comma-separated, or "*" for any)
    #[arg(long, env = "CORS_ALLOW_ORIGINS")]
    pub cors_allow_origins: Option<String>,

    /// JWT secret key for validating bearer tokens (min 32 chars)
    #[arg(long, env = "JWT_SECRET_KEY")]
    pub jwt_secret_key: SecretString,

    /// Database connection URL; records are kept in memory when unset
    #[arg(long, env = "DB_URL")]
    pub db_url: Option<String>,

    /// Database password (URL-encoded and inserted into DB_URL)
    #[arg(long, env = "DB_PASSWORD")]
    pub db_password: Option<String>,

    #[arg(long, env = "DB_POOL_MIN", default_value = "1")]
    pub db_pool_min: u32,

    #[arg(long, env = "DB_POOL_MAX", default_value = "10")]
    pub db_pool_max: u32,

    /// Database connection timeout in seconds
    #[arg(long, env = "DB_CONNECT_TIMEOUT", default_value = "30")]
    pub db_connect_timeout_secs: u64,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Use JSON log format
    #[arg(long, env = "JSON_LOGS", default_value = "true")]
    pub json_logs: bool,

    /// OpenTelemetry OTLP endpoint
    #[arg(long, env = "OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Environment name (e.g., "production", "staging")
    #[arg(long, env = "ENVIRONMENT")]
    pub environment: Option<String>,

    /// Max concurrent requests
    #[arg(long, env = "CONCURRENCY_LIMIT", default_value = "100")]
    pub concurrency_limit: usize,

    /// Request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    /// Maximum number of rows written by an export
    #[arg(long, env = "EXPORT_MAX_ROWS", default_value = "10000")]
    pub export_max_rows: usize,
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT secret must be at least {MIN_JWT_SECRET_LEN} characters")]
    JwtSecretTooShort,
    #[error("Admin prefix must start with '/' and not be the root path: {0}")]
    InvalidAdminPrefix(String),
    #[error("Database pool max ({max}) must be >= min ({min})")]
    InvalidPoolSize { min: u32, max: u32 },
    #[error("Concurrency limit must be > 0")]
    InvalidConcurrencyLimit,
    #[error("Request timeout must be > 0")]
    InvalidRequestTimeout,
    #[error("Export row limit must be > 0")]
    InvalidExportLimit,
}

impl Config {
    /// Parse and validate configuration.
    pub fn init() -> anyhow::Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret_key.expose_secret().len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::JwtSecretTooShort);
        }
        let prefix = self.admin_prefix.trim_end_matches('/');
        if !self.admin_prefix.starts_with('/') || prefix.is_empty() {
            return Err(ConfigError::InvalidAdminPrefix(self.admin_prefix.clone()));
        }
        if self.db_pool_max < self.db_pool_min {
            return Err(ConfigError::InvalidPoolSize {
                min: self.db_pool_min,
                max: self.db_pool_max,
            });
        }
        if self.concurrency_limit == 0 {
            return Err(ConfigError::InvalidConcurrencyLimit);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidRequestTimeout);
        }
        if self.export_max_rows == 0 {
            return Err(ConfigError::InvalidExportLimit);
        }
        Ok(())
    }

    #[inline]
    pub const fn db_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connect_timeout_secs)
    }

    #[inline]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Database URL with the password substituted, if a database is configured.
    pub fn database_url(&self) -> Option<String> {
        let url = self.db_url.as_ref()?;
        Some(match &self.db_password {
            Some(password) => {
                let encoded = urlencoding::encode(password);
                url.replacen(":@", &format!(":{encoded}@"), 1)
            }
            None => url.clone(),
        })
    }
}
