//! Inbound-inquiry read model (contact submissions).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::app_error::AppResult;
use crate::application::query::{ListMeta, Page, Pagination, Sort, SortSpec};

pub const INQUIRY_DEFAULT_LIMIT: i64 = 10;

/// `display_name` sorts on the two underlying name columns.
pub const INQUIRY_SORT: SortSpec = SortSpec::new(
    &[
        ("submitted_at", "submitted_at"),
        ("id", "id"),
        ("display_name", "first_name, last_name"),
        ("email", "email"),
        ("company_name", "company_name"),
    ],
    "submitted_at",
);

/// Columns the free-text search fans out across.
pub const INQUIRY_SEARCH_COLUMNS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "company_name",
    "question",
];

#[derive(Debug, Clone, Serialize)]
pub struct Inquiry {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: String,
    pub question: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InquiryFilter {
    pub email: Option<String>,
    pub company: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InquiryListRequest {
    pub filter: InquiryFilter,
    pub pagination: Pagination,
    pub sort: Sort,
}

#[async_trait]
pub trait InquiryRepo: Send + Sync {
    async fn list(&self, request: &InquiryListRequest) -> AppResult<(Vec<Inquiry>, i64)>;
}

#[derive(Clone)]
pub struct InquiryUseCases {
    repo: Arc<dyn InquiryRepo>,
}

impl InquiryUseCases {
    pub fn new(repo: Arc<dyn InquiryRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        mut filter: InquiryFilter,
        page: Option<i64>,
        limit: Option<i64>,
        sort_by: Option<String>,
        order: Option<String>,
    ) -> AppResult<(Page<Inquiry>, InquiryFilter)> {
        let pagination = Pagination::new(page, limit, INQUIRY_DEFAULT_LIMIT)?;
        let sort = INQUIRY_SORT.resolve(sort_by.as_deref(), order.as_deref());

        for field in [&mut filter.email, &mut filter.company, &mut filter.q] {
            *field = field.take().and_then(|v| {
                let v = v.trim().to_string();
                if v.is_empty() { None } else { Some(v) }
            });
        }

        let request = InquiryListRequest {
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
}
