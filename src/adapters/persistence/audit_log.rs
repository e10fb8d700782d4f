use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::adapters::persistence::PostgresPersistence;
use crate::app_error::{AppError, AppResult};
use crate::use_cases::audit::{AuditEntry, AuditLogRecord, AuditLogRepo};

fn row_to_record(row: sqlx::postgres::PgRow) -> AuditLogRecord {
    AuditLogRecord {
        id: row.get("id"),
        actor: row.get("actor"),
        action: row.get("action"),
        target: row.get("target"),
        status: row.get("status"),
        description: row.get("description"),
        metadata: row.get("metadata"),
        ip_address: row.get("ip_address"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl AuditLogRepo for PostgresPersistence {
    async fn insert(&self, entry: &AuditEntry) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO internal_admin.audit_logs (
                    id, actor, action, target, status, description, metadata, ip_address
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.actor)
        .bind(entry.action.as_str())
        .bind(&entry.target)
        .bind(entry.status.as_str())
        .bind(&entry.description)
        .bind(&entry.metadata)
        .bind(&entry.ip_address)
        .execute(self.primary())
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<AuditLogRecord>> {
        let rows = sqlx::query(
            "SELECT id, actor, action, target, status, description, metadata, ip_address, created_at \
             FROM internal_admin.audit_logs \
             ORDER BY created_at DESC \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.primary())
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }
}
