//! Database configuration, pool creation and schema migrations.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::AppError;

/// Database configuration.
#[derive(Debug, Clone)]
#[must_use]
pub struct DbConfig {
    pub url: String,
    pub pool_min: u32,
    pub pool_max: u32,
    pub connect_timeout: Duration,
    /// Apply embedded migrations after connecting.
    pub migrate: bool,
}

impl DbConfig {
    pub const DEFAULT_POOL_MIN: u32 = 1;
    pub const DEFAULT_POOL_MAX: u32 = 10;
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a configuration from a URL with default pool settings.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            pool_min: Self::DEFAULT_POOL_MIN,
            pool_max: Self::DEFAULT_POOL_MAX,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            migrate: true,
        }
    }
}

/// Connect to PostgreSQL and, when configured, bring the `admin` schema up to date.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min)
        .max_connections(config.pool_max)
        .acquire_timeout(config.connect_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| AppError::Unavailable(format!("Database connection failed: {e}")))?;

    if config.migrate {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Unavailable(format!("Database migration failed: {e}")))?;
        info!("Database migrations applied");
    }

    Ok(pool)
}
