//! PostgreSQL connection pool management.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use agentmart_core::config::DatabaseConfig;
use agentmart_core::error::{AppError, ErrorKind};

use crate::repositories::AuditLogRepository;
use crate::store::PgListingStore;

/// Wrapper around the sqlx PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Create a new database pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by `#[sqlx::test]` fixtures).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Transactional listing store backed by this pool.
    pub fn listing_store(&self) -> PgListingStore {
        PgListingStore::new(self.pool.clone())
    }

    /// Audit log repository backed by this pool.
    pub fn audit_repository(&self) -> AuditLogRepository {
        AuditLogRepository::new(self.pool.clone())
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// Mask the password portion of a database URL for safe logging.
fn mask_password(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    match url[scheme_end..at_pos].find(':') {
        Some(colon) => {
            let colon_pos = scheme_end + colon;
            format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..])
        }
        None => url.to_string(),
    }
}
