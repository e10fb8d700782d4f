use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::adapters::persistence::PostgresPersistence;
use crate::app_error::{AppError, AppResult};
use crate::domain::entities::schema_name::SchemaName;
use crate::use_cases::company_user::{
    CompanyUserRepo, CompanyUserView, CreatedCompanyUser, NewCompanyUser,
};

fn row_to_view(row: sqlx::postgres::PgRow) -> CompanyUserView {
    CompanyUserView {
        user_uuid: row.get("user_uuid"),
        user_id: row.get("user_id"),
        user_external_id: row.get("user_external_id"),
        fullname: row.get("fullname"),
        username: row.get("username"),
        email: row.get("email"),
        avatar: row.get("avatar"),
        company_id: row.get("company_id"),
        company_name: row.get("company_name"),
        database_name: row.get("database_name"),
        is_active: row.get("is_active"),
        is_email_verified: row.get("is_email_verified"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl CompanyUserRepo for PostgresPersistence {
    async fn list_for_company(&self, company_id: Uuid) -> AppResult<Vec<CompanyUserView>> {
        let database_name: Option<String> =
            sqlx::query_scalar("SELECT database_name FROM public.companies WHERE company_id = $1")
                .bind(company_id)
                .fetch_optional(self.primary())
                .await
                .map_err(AppError::from)?;

        let Some(database_name) = database_name else {
            return Err(AppError::NotFound);
        };
        let schema = SchemaName::new(&database_name)?;

        let sql = format!(
            r#"
            SELECT
                public.users.user_uuid,
                "{schema}".company_users.user_id,
                "{schema}".company_users.user_external_id,
                public.users.fullname,
                public.users.username,
                public.users.email,
                "{schema}".company_users.avatar,
                public.companies.company_id,
                public.companies.company_name,
                public.companies.database_name,
                public.users.is_active,
                public.users.is_email_verified,
                public.users.created_at
            FROM public.companies
            INNER JOIN public.users
                ON public.companies.company_id = public.users.company_id
            INNER JOIN "{schema}".company_users
                ON "{schema}".company_users.user_uuid = public.users.user_uuid
            WHERE public.companies.company_id = $1
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(company_id)
            .fetch_all(self.primary())
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_view).collect())
    }

    async fn create(
        &self,
        company_id: Uuid,
        user: &NewCompanyUser,
    ) -> AppResult<CreatedCompanyUser> {
        let mut tx = self.primary().begin().await.map_err(AppError::from)?;

        // TODO: hash the password once the stored format is agreed with the
        // tenant-facing login service; today both sides expect the raw value.
        let password_hash = user.password.clone();

        let user_uuid: Uuid = sqlx::query_scalar(
            r#"
                INSERT INTO public.users (
                    user_uuid, company_id, username, email, password_hash,
                    fullname, is_active, is_email_verified
                ) VALUES ($1, $2, $3, $4, $5, $6, TRUE, FALSE)
                RETURNING user_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&password_hash)
        .bind(&user.display_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;

        let database_name: Option<String> =
            sqlx::query_scalar("SELECT database_name FROM public.companies WHERE company_id = $1")
                .bind(company_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::from)?;

        // dropping the transaction here rolls the global-user insert back
        let Some(database_name) = database_name else {
            return Err(AppError::NotFound);
        };
        let schema = SchemaName::new(&database_name)?;

        let user_id: i64 = sqlx::query_scalar(&format!(
            r#"
                INSERT INTO "{schema}".company_users (user_uuid, fullname, username, email)
                VALUES ($1, $2, $3, $4)
                RETURNING user_id
            "#
        ))
        .bind(user_uuid)
        .bind(&user.display_name)
        .bind(&user.username)
        .bind(&user.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;

        sqlx::query(&format!(
            r#"INSERT INTO "{schema}".user_roles (user_id, role_id) VALUES ($1, $2)"#
        ))
        .bind(user_id)
        .bind(user.role_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;

        Ok(CreatedCompanyUser { user_uuid, user_id })
    }
}
