//! Operational counters for the admin landing page.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use crate::app_error::AppResult;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DashboardStats {
    pub new_inquiries: i64,
    pub open_tickets: i64,
    pub total_tickets: i64,
    pub tickets_resolved_today: i64,
}

#[async_trait]
pub trait DashboardRepo: Send + Sync {
    async fn stats(&self) -> AppResult<DashboardStats>;
}

#[derive(Clone)]
pub struct DashboardUseCases {
    repo: Arc<dyn DashboardRepo>,
}

impl DashboardUseCases {
    pub fn new(repo: Arc<dyn DashboardRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        self.repo.stats().await
    }
}
