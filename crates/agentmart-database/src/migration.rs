//! Database migration runner.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use agentmart_core::error::{AppError, ErrorKind};

/// Embedded migrations from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Drop every table in the `public` schema and re-run all migrations.
pub async fn reset_database(pool: &PgPool) -> Result<(), AppError> {
    info!("Dropping public schema");

    for statement in ["DROP SCHEMA public CASCADE", "CREATE SCHEMA public"] {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to reset database: {e}"),
                e,
            )
        })?;
    }

    run_migrations(pool).await
}

/// A migration known to the binary and whether it has been applied.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MigrationStatus {
    /// Migration version (timestamp prefix).
    pub version: i64,
    /// Human-readable description.
    pub description: String,
    /// Whether the migration is recorded in `_sqlx_migrations`.
    pub applied: bool,
}

/// List embedded migrations alongside their applied state.
pub async fn migration_status(pool: &PgPool) -> Result<Vec<MigrationStatus>, AppError> {
    let applied: Vec<i64> = sqlx::query_scalar(
        "SELECT version FROM _sqlx_migrations WHERE success = TRUE ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .unwrap_or_default();

    Ok(MIGRATOR
        .iter()
        .map(|m| MigrationStatus {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.contains(&m.version),
        })
        .collect())
}
