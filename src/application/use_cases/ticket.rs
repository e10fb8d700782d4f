//! Support-ticket read model. No write path: tickets are filed elsewhere and
//! only listed/inspected here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::query::{ListMeta, Page, Pagination, Sort, SortSpec};

pub const TICKET_DEFAULT_LIMIT: i64 = 10;

pub const TICKET_SORT: SortSpec = SortSpec::new(
    &[
        ("id", "id"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
        ("status", "status"),
        ("priority", "priority"),
        ("subject", "subject"),
    ],
    "created_at",
);

#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    pub id: i64,
    pub subject: String,
    pub description: Option<String>,
    pub status: i32,
    pub priority: i32,
    pub metadata: Option<serde_json::Value>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketReply {
    pub id: i64,
    pub ticket_id: i64,
    pub message: String,
    pub author_type: String,
    pub author_name: Option<String>,
    pub author_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketWithReplies {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub replies: Vec<TicketReply>,
}

/// Recognized ticket filters. Unknown or out-of-range inputs are dropped by
/// the caller before this is built.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TicketListRequest {
    pub filter: TicketFilter,
    pub pagination: Pagination,
    pub sort: Sort,
}

#[async_trait]
pub trait TicketRepo: Send + Sync {
    async fn list(&self, request: &TicketListRequest) -> AppResult<(Vec<Ticket>, i64)>;
    async fn get_with_replies(&self, ticket_id: i64) -> AppResult<Option<TicketWithReplies>>;
}

#[derive(Clone)]
pub struct TicketUseCases {
    repo: Arc<dyn TicketRepo>,
}

impl TicketUseCases {
    pub fn new(repo: Arc<dyn TicketRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        mut filter: TicketFilter,
        page: Option<i64>,
        limit: Option<i64>,
        sort_by: Option<String>,
        order: Option<String>,
    ) -> AppResult<(Page<Ticket>, TicketFilter)> {
        let pagination = Pagination::new(page, limit, TICKET_DEFAULT_LIMIT)?;
        let sort = TICKET_SORT.resolve(sort_by.as_deref(), order.as_deref());

        // priority outside 1..=5 is ignored rather than rejected
        if filter.priority.is_some_and(|p| !(1..=5).contains(&p)) {
            filter.priority = None;
        }
        filter.q = filter.q.take().and_then(|q| {
            let q = q.trim().to_string();
            if q.is_empty() { None } else { Some(q) }
        });

        let request = TicketListRequest {
            filter: filter.clone(),
            pagination,
            sort,
        };
        let (data, total) = self.repo.list(&request).await?;

        Ok((
            Page {
                data,
                meta: ListMeta::new(pagination, total, sort),
            },
            filter,
        ))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, ticket_id: i64) -> AppResult<TicketWithReplies> {
        self.repo
            .get_with_replies(ticket_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}
