use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::use_cases::audit::{AuditEntry, AuditLogRecord, AuditLogRepo};

/// In-memory audit store.
#[derive(Default)]
pub struct InMemoryAuditLogRepo {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditLogRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLogRepo for InMemoryAuditLogRepo {
    async fn insert(&self, entry: &AuditEntry) -> AppResult<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<AuditLogRecord>> {
        let entries = self.entries.lock().unwrap();
        // newest first
        let records: Vec<AuditLogRecord> = entries
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|entry| AuditLogRecord {
                id: Uuid::new_v4(),
                actor: entry.actor.clone(),
                action: entry.action.as_str().to_string(),
                target: entry.target.clone(),
                status: entry.status.as_str().to_string(),
                description: entry.description.clone(),
                metadata: entry.metadata.clone(),
                ip_address: entry.ip_address.clone(),
                created_at: Utc::now(),
            })
            .collect();
        Ok(records)
    }
}

/// Audit store whose every insert fails, for best-effort contract tests.
pub struct FailingAuditLogRepo;

#[async_trait]
impl AuditLogRepo for FailingAuditLogRepo {
    async fn insert(&self, _entry: &AuditEntry) -> AppResult<()> {
        Err(AppError::Database("audit store is down".into()))
    }

    async fn list(&self, _limit: i64, _offset: i64) -> AppResult<Vec<AuditLogRecord>> {
        Err(AppError::Database("audit store is down".into()))
    }
}
