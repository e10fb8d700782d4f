//! Tenant user provisioning: one identity spanning the global `users` table
//! and the tenant-scoped `company_users` table.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::audit::{AuditEntry, AuditLogger, RequestContext};
use crate::application::validators::{is_valid_email, is_valid_password, MIN_PASSWORD_LEN};
use crate::domain::entities::audit::{AuditAction, AuditStatus};

#[derive(Debug, Clone)]
pub struct NewCompanyUser {
    pub display_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role_id: i32,
}

/// Identities minted by a successful user creation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreatedCompanyUser {
    pub user_uuid: Uuid,
    pub user_id: i64,
}

/// The joined global + tenant view returned by the user listing.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyUserView {
    pub user_uuid: Uuid,
    pub user_id: i64,
    pub user_external_id: Option<String>,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub company_id: Uuid,
    pub company_name: String,
    pub database_name: String,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait CompanyUserRepo: Send + Sync {
    async fn list_for_company(&self, company_id: Uuid) -> AppResult<Vec<CompanyUserView>>;
    /// Creates the global user row, the tenant-scoped user row, and the role
    /// assignment in a single transaction on one borrowed connection. Any
    /// step failing rolls the whole transaction back: both rows exist
    /// afterwards, or neither does.
    async fn create(
        &self,
        company_id: Uuid,
        user: &NewCompanyUser,
    ) -> AppResult<CreatedCompanyUser>;
}

#[derive(Clone)]
pub struct CompanyUserUseCases {
    repo: Arc<dyn CompanyUserRepo>,
    audit: AuditLogger,
}

impl CompanyUserUseCases {
    pub fn new(repo: Arc<dyn CompanyUserRepo>, audit: AuditLogger) -> Self {
        Self { repo, audit }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, company_id: Uuid) -> AppResult<Vec<CompanyUserView>> {
        self.repo.list_for_company(company_id).await
    }

    #[instrument(skip(self, user, ctx))]
    pub async fn create(
        &self,
        company_id: Uuid,
        user: NewCompanyUser,
        ctx: &RequestContext,
    ) -> AppResult<CreatedCompanyUser> {
        if user.display_name.trim().is_empty() {
            return Err(AppError::InvalidInput("display name is required".into()));
        }
        if user.username.trim().is_empty() {
            return Err(AppError::InvalidInput("username is required".into()));
        }
        if !is_valid_email(&user.email) {
            return Err(AppError::InvalidInput("invalid email format".into()));
        }
        if !is_valid_password(&user.password) {
            return Err(AppError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        if user.role_id < 1 {
            return Err(AppError::InvalidInput("role is required".into()));
        }

        let created = match self.repo.create(company_id, &user).await {
            Ok(created) => created,
            Err(err) => {
                self.audit
                    .record(
                        AuditEntry::new(ctx, AuditAction::UserCreate, "USER", AuditStatus::Failure)
                            .describe(format!(
                                "failed to create user '{}' for company {company_id}",
                                user.username
                            )),
                    )
                    .await;
                return Err(err);
            }
        };

        self.audit
            .record(
                AuditEntry::new(ctx, AuditAction::UserCreate, "USER", AuditStatus::Success)
                    .describe(format!("created user '{}'", user.username))
                    .with_metadata(serde_json::json!({
                        "company_id": company_id,
                        "user_uuid": created.user_uuid,
                        "role_id": user.role_id,
                    })),
            )
            .await;

        Ok(created)
    }
}
