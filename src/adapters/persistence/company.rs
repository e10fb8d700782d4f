use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::adapters::persistence::{bind_scalar_values, bind_values, PostgresPersistence};
use crate::app_error::{AppError, AppResult};
use crate::application::query::FilterBuilder;
use crate::domain::entities::schema_name::SchemaName;
use crate::use_cases::company::{
    Company, CompanyListRequest, CompanyRepo, CompanyUpdate, NewCompany,
};

const COMPANY_COLUMNS: &str = "company_id, company_name, company_code, database_name, \
     created_at, subscription_expires_at, is_active";

fn row_to_company(row: sqlx::postgres::PgRow) -> Company {
    Company {
        company_id: row.get("company_id"),
        company_name: row.get("company_name"),
        company_code: row.get("company_code"),
        database_name: row.get("database_name"),
        subscription_expires_at: row.get("subscription_expires_at"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

/// DDL for the tenant-scoped tables, created inside the tenant's schema
/// during provisioning. The schema identifier has already been validated;
/// it is the only interpolated piece.
fn tenant_table_ddl(schema: &SchemaName) -> Vec<String> {
    vec![
        format!(
            r#"CREATE TABLE "{schema}".roles (
                role_id    SERIAL PRIMARY KEY,
                role_name  VARCHAR(64) UNIQUE NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#
        ),
        format!(
            r#"CREATE TABLE "{schema}".company_users (
                user_id          BIGSERIAL PRIMARY KEY,
                user_uuid        UUID UNIQUE NOT NULL,
                user_external_id VARCHAR(64),
                fullname         VARCHAR(255) NOT NULL,
                username         VARCHAR(128) NOT NULL,
                email            VARCHAR(255) NOT NULL,
                avatar           TEXT,
                created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#
        ),
        format!(
            r#"CREATE TABLE "{schema}".user_roles (
                user_id BIGINT NOT NULL REFERENCES "{schema}".company_users(user_id) ON DELETE CASCADE,
                role_id INT NOT NULL REFERENCES "{schema}".roles(role_id),
                PRIMARY KEY (user_id, role_id)
            )"#
        ),
    ]
}

#[async_trait]
impl CompanyRepo for PostgresPersistence {
    async fn list(&self, request: &CompanyListRequest) -> AppResult<(Vec<Company>, i64)> {
        let mut filter = FilterBuilder::new();
        if let Some(search) = &request.search {
            filter.search(&["company_name", "company_code"], search);
        }

        let where_clause = filter.where_clause();
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM public.companies {where_clause} {} LIMIT ${} OFFSET ${}",
            request.sort.order_by(),
            filter.next_placeholder(),
            filter.next_placeholder() + 1,
        );

        let rows = bind_values(sqlx::query(&sql), filter.values())
            .bind(request.pagination.limit())
            .bind(request.pagination.offset())
            .fetch_all(self.primary())
            .await
            .map_err(AppError::from)?;

        let count_sql = format!("SELECT COUNT(*) FROM public.companies {where_clause}");
        let total: i64 = bind_scalar_values(sqlx::query_scalar(&count_sql), filter.values())
            .fetch_one(self.primary())
            .await
            .map_err(AppError::from)?;

        Ok((rows.into_iter().map(row_to_company).collect(), total))
    }

    async fn get(&self, company_id: Uuid) -> AppResult<Option<Company>> {
        let row = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM public.companies WHERE company_id = $1"
        ))
        .bind(company_id)
        .fetch_optional(self.primary())
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_company))
    }

    async fn provision(
        &self,
        input: &NewCompany,
        schema: &SchemaName,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Company> {
        let mut tx = self.primary().begin().await.map_err(AppError::from)?;

        sqlx::query(&format!(r#"CREATE SCHEMA "{schema}""#))
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        for ddl in tenant_table_ddl(schema) {
            sqlx::query(&ddl)
                .execute(&mut *tx)
                .await
                .map_err(AppError::from)?;
        }

        let row = sqlx::query(&format!(
            r#"
                INSERT INTO public.companies (
                    company_id, company_name, company_code, database_name,
                    subscription_expires_at, is_active
                ) VALUES ($1, $2, $3, $4, $5, TRUE)
                RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.code)
        .bind(schema.as_str())
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;

        tracing::info!(schema = %schema, "provisioned tenant schema");
        Ok(row_to_company(row))
    }

    async fn populate(&self, schema: &SchemaName) -> AppResult<()> {
        sqlx::raw_sql(&format!(
            r#"INSERT INTO "{schema}".roles (role_name)
               VALUES ('admin'), ('agent'), ('viewer')
               ON CONFLICT (role_name) DO NOTHING"#
        ))
        .execute(self.primary())
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn update(&self, company_id: Uuid, update: &CompanyUpdate) -> AppResult<()> {
        let mut assignments = Vec::new();
        let mut idx = 1;

        if update.name.is_some() {
            assignments.push(format!("company_name = ${idx}"));
            idx += 1;
        }
        if update.code.is_some() {
            assignments.push(format!("company_code = ${idx}"));
            idx += 1;
        }
        if update.database.is_some() {
            assignments.push(format!("database_name = ${idx}"));
            idx += 1;
        }
        if update.expires_at.is_some() {
            assignments.push(format!("subscription_expires_at = ${idx}"));
            idx += 1;
        }
        if update.is_active.is_some() {
            assignments.push(format!("is_active = ${idx}"));
            idx += 1;
        }

        let sql = format!(
            "UPDATE public.companies SET {} WHERE company_id = ${idx}",
            assignments.join(", ")
        );

        let mut query = sqlx::query(&sql);
        if let Some(name) = &update.name {
            query = query.bind(name);
        }
        if let Some(code) = &update.code {
            query = query.bind(code);
        }
        if let Some(database) = &update.database {
            query = query.bind(database);
        }
        if let Some(expires_at) = &update.expires_at {
            query = query.bind(expires_at);
        }
        if let Some(is_active) = update.is_active {
            query = query.bind(is_active);
        }

        let result = query
            .bind(company_id)
            .execute(self.primary())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, company_id: Uuid) -> AppResult<String> {
        let mut tx = self.primary().begin().await.map_err(AppError::from)?;

        let database_name: Option<String> = sqlx::query_scalar(
            "SELECT database_name FROM public.companies WHERE company_id = $1 FOR UPDATE",
        )
        .bind(company_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::from)?;

        let Some(database_name) = database_name else {
            return Err(AppError::NotFound);
        };
        // the stored value is validated before it is interpolated into DDL
        let schema = SchemaName::new(&database_name)?;

        sqlx::query(&format!(r#"DROP SCHEMA IF EXISTS "{schema}" CASCADE"#))
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        sqlx::query("DELETE FROM public.companies WHERE company_id = $1")
            .bind(company_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;

        tracing::info!(schema = %schema, "dropped tenant schema");
        Ok(schema.as_str().to_string())
    }
}
