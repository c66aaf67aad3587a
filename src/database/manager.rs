use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the relational store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Unexpected row shape: {0}")]
    UnexpectedRow(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owned Postgres pool. Opened once at process start, handed to the router
/// through application state and closed on shutdown.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    query_logging: bool,
    slow_query_threshold: Duration,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.url.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }
        let display_url = Self::redacted_url(&config.url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connect(&config.url)
            .await?;

        info!("Connected database pool: {}", display_url);
        Ok(Self::from_pool(pool, config))
    }

    pub fn from_pool(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            query_logging: config.enable_query_logging,
            slow_query_threshold: Duration::from_millis(config.slow_query_threshold_ms),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub(crate) fn query_logging(&self) -> bool {
        self.query_logging
    }

    pub(crate) fn slow_query_threshold(&self) -> Duration {
        self.slow_query_threshold
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    /// Connection string with the password masked, safe for logs.
    pub fn redacted_url(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("****")).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
