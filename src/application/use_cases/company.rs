//! Tenant lifecycle: listing, provisioning, update, and irreversible delete.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::query::{ListMeta, Page, Pagination, Sort, SortSpec};
use crate::application::use_cases::audit::{AuditEntry, AuditLogger, RequestContext};
use crate::domain::entities::audit::{AuditAction, AuditStatus};
use crate::domain::entities::schema_name::SchemaName;

pub const COMPANY_DEFAULT_LIMIT: i64 = 20;

/// Sortable columns for the company listing.
pub const COMPANY_SORT: SortSpec = SortSpec::new(
    &[
        ("company_name", "company_name"),
        ("company_code", "company_code"),
        ("created_at", "created_at"),
        ("subscription_expires_at", "subscription_expires_at"),
    ],
    "created_at",
);

#[derive(Debug, Clone, Serialize)]
pub struct Company {
    pub company_id: Uuid,
    pub company_name: String,
    pub company_code: Option<String>,
    pub database_name: String,
    pub subscription_expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub code: String,
    pub database: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    pub database: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl CompanyUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.code.is_none()
            && self.database.is_none()
            && self.expires_at.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct CompanyListRequest {
    pub search: Option<String>,
    pub pagination: Pagination,
    pub sort: Sort,
}

#[async_trait]
pub trait CompanyRepo: Send + Sync {
    async fn list(&self, request: &CompanyListRequest) -> AppResult<(Vec<Company>, i64)>;
    async fn get(&self, company_id: Uuid) -> AppResult<Option<Company>>;
    /// Step A of tenant creation: create the schema, its tenant-scoped
    /// tables, and the registry row — one transaction.
    async fn provision(
        &self,
        input: &NewCompany,
        schema: &SchemaName,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Company>;
    /// Step B of tenant creation: seed baseline data. Committed separately
    /// from `provision`, by design.
    async fn populate(&self, schema: &SchemaName) -> AppResult<()>;
    async fn update(&self, company_id: Uuid, update: &CompanyUpdate) -> AppResult<()>;
    /// Drops the tenant schema (CASCADE) and removes the registry row.
    /// Returns the dropped schema name for auditing.
    async fn delete(&self, company_id: Uuid) -> AppResult<String>;
}

#[derive(Clone)]
pub struct CompanyUseCases {
    repo: Arc<dyn CompanyRepo>,
    audit: AuditLogger,
}

impl CompanyUseCases {
    pub fn new(repo: Arc<dyn CompanyRepo>, audit: AuditLogger) -> Self {
        Self { repo, audit }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<String>,
        page: Option<i64>,
        limit: Option<i64>,
        sort_by: Option<String>,
        order: Option<String>,
    ) -> AppResult<Page<Company>> {
        let pagination = Pagination::new(page, limit, COMPANY_DEFAULT_LIMIT)?;
        let sort = COMPANY_SORT.resolve(sort_by.as_deref(), order.as_deref());
        let search = search.and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() { None } else { Some(s) }
        });

        let request = CompanyListRequest {
            search,
            pagination,
            sort,
        };
        let (data, total) = self.repo.list(&request).await?;

        Ok(Page {
            data,
            meta: ListMeta::new(pagination, total, sort),
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, company_id: Uuid) -> AppResult<Company> {
        self.repo
            .get(company_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Creates a tenant in two independently-committed steps: provision
    /// (schema + tables + registry row) and populate (baseline seed data).
    /// A populate failure leaves the tenant in place and surfaces as
    /// [`AppError::ProvisioningIncomplete`]; it is not rolled back.
    #[instrument(skip(self, ctx))]
    pub async fn create(&self, input: NewCompany, ctx: &RequestContext) -> AppResult<Company> {
        if input.name.trim().is_empty() {
            return Err(AppError::InvalidInput("name must not be empty".into()));
        }
        if input.code.trim().is_empty() {
            return Err(AppError::InvalidInput("code must not be empty".into()));
        }
        let schema = SchemaName::new(&input.database)?;

        let expires_at = match input.expires_at {
            Some(at) => at,
            None => Utc::now()
                .checked_add_days(Days::new(365))
                .ok_or_else(|| AppError::Internal("expiry date overflow".into()))?,
        };

        let company = match self.repo.provision(&input, &schema, expires_at).await {
            Ok(company) => company,
            Err(err) => {
                self.audit
                    .record(
                        AuditEntry::new(ctx, AuditAction::CompanyCreate, "COMPANY", AuditStatus::Failure)
                            .describe(format!("failed to provision tenant '{}'", input.name)),
                    )
                    .await;
                return Err(err);
            }
        };

        self.audit
            .record(
                AuditEntry::new(ctx, AuditAction::CompanyCreate, "COMPANY", AuditStatus::Success)
                    .describe(format!("provisioned tenant '{}'", company.company_name))
                    .with_metadata(serde_json::json!({
                        "company_id": company.company_id,
                        "database": company.database_name,
                    })),
            )
            .await;

        if let Err(err) = self.repo.populate(&schema).await {
            tracing::error!(
                error = ?err,
                schema = %schema,
                "tenant provisioned but baseline population failed"
            );
            self.audit
                .record(
                    AuditEntry::new(ctx, AuditAction::CompanyPopulate, "COMPANY", AuditStatus::Failure)
                        .describe(format!("baseline population failed for '{schema}'")),
                )
                .await;
            return Err(AppError::ProvisioningIncomplete(format!(
                "tenant '{}' was created but baseline data population failed",
                company.company_name
            )));
        }

        self.audit
            .record(
                AuditEntry::new(ctx, AuditAction::CompanyPopulate, "COMPANY", AuditStatus::Success)
                    .describe(format!("seeded baseline data for '{schema}'")),
            )
            .await;

        Ok(company)
    }

    #[instrument(skip(self, ctx))]
    pub async fn update(
        &self,
        company_id: Uuid,
        update: CompanyUpdate,
        ctx: &RequestContext,
    ) -> AppResult<()> {
        if update.is_empty() {
            return Err(AppError::InvalidInput(
                "request must contain at least one field to update".into(),
            ));
        }
        for (field, value) in [
            ("name", &update.name),
            ("code", &update.code),
            ("database", &update.database),
        ] {
            if let Some(v) = value
                && v.trim().is_empty()
            {
                return Err(AppError::InvalidInput(format!(
                    "{field} must not be empty if provided"
                )));
            }
        }
        // database_name stays identifier-safe even on rename
        if let Some(database) = &update.database {
            SchemaName::new(database)?;
        }

        self.repo.update(company_id, &update).await?;

        self.audit
            .record(
                AuditEntry::new(ctx, AuditAction::CompanyUpdate, "COMPANY", AuditStatus::Success)
                    .describe(format!("updated tenant {company_id}")),
            )
            .await;

        Ok(())
    }

    /// Irreversible: drops the tenant schema and the registry row. The
    /// caller must supply a non-empty justification, which is recorded in
    /// the audit trail and not enforced beyond non-emptiness.
    #[instrument(skip(self, ctx))]
    pub async fn delete(
        &self,
        company_id: Uuid,
        reason: &str,
        ctx: &RequestContext,
    ) -> AppResult<()> {
        if reason.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "reason is required and must not be empty".into(),
            ));
        }

        let schema = self.repo.delete(company_id).await?;

        self.audit
            .record(
                AuditEntry::new(ctx, AuditAction::CompanyDelete, "COMPANY", AuditStatus::Success)
                    .describe(format!("dropped tenant schema '{schema}'"))
                    .with_metadata(serde_json::json!({
                        "company_id": company_id,
                        "database": schema,
                        "reason": reason,
                    })),
            )
            .await;

        Ok(())
    }
}
