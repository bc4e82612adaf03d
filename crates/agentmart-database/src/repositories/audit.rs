//! Audit log repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use agentmart_core::error::{AppError, ErrorKind};
use agentmart_core::result::AppResult;
use agentmart_core::types::pagination::{PageRequest, PageResponse};
use agentmart_entity::audit::model::{AuditLogEntry, CreateAuditLogEntry};

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an audit log entry.
    pub async fn create(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_log (actor_id, action, target_type, target_id, details) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.actor_id)
        .bind(&data.action)
        .bind(&data.target_type)
        .bind(data.target_id)
        .bind(&data.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create audit entry", e))
    }

    /// History of one target, newest first.
    pub async fn find_by_target(
        &self,
        target_type: &str,
        target_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM audit_log WHERE target_type = $1 AND target_id = $2",
        )
        .bind(target_type)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count audit entries", e)
        })?;

        let entries = sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_log WHERE target_type = $1 AND target_id = $2 \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(target_type)
        .bind(target_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load audit history", e)
        })?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
