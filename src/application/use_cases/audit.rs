//! Best-effort audit trail for administrative actions.
//!
//! The write path is fire-and-forget by contract: [`AuditLogger::record`]
//! returns `()`, and a failed insert is logged and swallowed. The primary
//! operation a record describes must never fail because its audit entry
//! could not be written.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::audit::{AuditAction, AuditStatus};

/// Who performed a request, and from where. Assembled by the HTTP layer.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub actor: String,
    pub ip_address: Option<String>,
}

impl RequestContext {
    pub fn new(actor: impl Into<String>, ip_address: Option<String>) -> Self {
        Self {
            actor: actor.into(),
            ip_address,
        }
    }
}

/// One append-only audit record.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub actor: String,
    pub action: AuditAction,
    pub target: String,
    pub status: AuditStatus,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub ip_address: Option<String>,
}

impl AuditEntry {
    pub fn new(
        ctx: &RequestContext,
        action: AuditAction,
        target: impl Into<String>,
        status: AuditStatus,
    ) -> Self {
        Self {
            actor: ctx.actor.clone(),
            action,
            target: target.into(),
            status,
            description: None,
            metadata: None,
            ip_address: ctx.ip_address.clone(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A persisted audit row, as returned by the activities listing.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogRecord {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub target: String,
    pub status: String,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    #[serde(rename = "ipAddress")]
    pub ip_address: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait AuditLogRepo: Send + Sync {
    async fn insert(&self, entry: &AuditEntry) -> AppResult<()>;
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<AuditLogRecord>>;
}

#[derive(Clone)]
pub struct AuditLogger {
    repo: Arc<dyn AuditLogRepo>,
}

impl AuditLogger {
    pub fn new(repo: Arc<dyn AuditLogRepo>) -> Self {
        Self { repo }
    }

    /// Records an entry. Cannot fail observably: insert errors are logged at
    /// error level and dropped.
    pub async fn record(&self, entry: AuditEntry) {
        if let Err(err) = self.repo.insert(&entry).await {
            tracing::error!(
                error = ?err,
                action = %entry.action,
                target = %entry.target,
                "failed to write audit log entry"
            );
        }
    }

    /// Recent audit entries, newest first.
    pub async fn recent(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Vec<AuditLogRecord>> {
        let limit = limit.unwrap_or(20);
        let offset = offset.unwrap_or(0);
        if !(1..=100).contains(&limit) {
            return Err(AppError::InvalidInput(
                "limit must be between 1 and 100".into(),
            ));
        }
        if offset < 0 {
            return Err(AppError::InvalidInput("offset must not be negative".into()));
        }
        self.repo.list(limit, offset).await
    }
}
