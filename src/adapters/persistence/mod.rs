use sqlx::PgPool;
use sqlx::postgres::PgArguments;

use crate::app_error::AppError;
use crate::application::query::SqlValue;
use crate::infra::db::ConnectionManager;

pub mod audit_log;
pub mod company;
pub mod company_user;
pub mod dashboard;
pub mod inquiry;
pub mod ticket;

/// Postgres-backed implementation of every repository trait.
///
/// Writes and tenant registry reads go through the primary pool; the
/// ticket/inquiry/dashboard read models go through the reporting pool, which
/// the connection manager may point at a replica.
#[derive(Clone)]
pub struct PostgresPersistence {
    primary: PgPool,
    reporting: PgPool,
}

impl PostgresPersistence {
    pub fn new(db: &ConnectionManager) -> Self {
        Self {
            primary: db.primary().clone(),
            reporting: db.reporting().clone(),
        }
    }

    pub fn primary(&self) -> &PgPool {
        &self.primary
    }

    pub fn reporting(&self) -> &PgPool {
        &self.reporting
    }
}

/// Binds filter values onto a query in placeholder order.
pub(crate) fn bind_values<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    values: &[SqlValue],
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    values.iter().fold(query, |q, value| match value {
        SqlValue::Text(s) => q.bind(s.clone()),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Bool(b) => q.bind(*b),
    })
}

pub(crate) fn bind_scalar_values<'q, O>(
    query: sqlx::query::QueryScalar<'q, sqlx::Postgres, O, PgArguments>,
    values: &[SqlValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, O, PgArguments> {
    values.iter().fold(query, |q, value| match value {
        SqlValue::Text(s) => q.bind(s.clone()),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Bool(b) => q.bind(*b),
    })
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                tracing::error!(error = ?err, "connection pool exhausted");
                AppError::Unavailable
            }
            sqlx::Error::Io(_) => {
                tracing::error!(error = ?err, "database unreachable");
                AppError::Unavailable
            }
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // unique violation: surfaced distinctly so callers can react
                Some("23505") => {
                    AppError::Conflict("a record with this value already exists".into())
                }
                // duplicate schema on tenant provisioning
                Some("42P06") => {
                    AppError::Conflict("a tenant schema with this name already exists".into())
                }
                Some("23503") => AppError::InvalidInput("referenced record not found".into()),
                Some("23502") => AppError::InvalidInput("required field is missing".into()),
                _ => {
                    tracing::error!(error = ?err, "database error");
                    AppError::Database("database operation failed".into())
                }
            },
            _ => {
                tracing::error!(error = ?err, "database error");
                AppError::Database("database operation failed".into())
            }
        }
    }
}
