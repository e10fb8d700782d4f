use std::fmt;

use crate::app_error::{AppError, AppResult};

/// A validated Postgres schema identifier for a tenant.
///
/// `database_name` is the sole routing key for tenant-scoped tables and is
/// interpolated (double-quoted) into DDL and cross-schema queries, so it is
/// only ever constructed through [`SchemaName::new`]. Values are restricted
/// to `[a-z][a-z0-9_]*`, at most 63 bytes, and must not collide with the
/// schemas the service itself owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaName(String);

const MAX_IDENTIFIER_LEN: usize = 63;

const RESERVED: &[&str] = &["public", "internal_admin", "information_schema"];

impl SchemaName {
    pub fn new(raw: &str) -> AppResult<Self> {
        let name = raw.trim();

        if name.is_empty() || name.len() > MAX_IDENTIFIER_LEN {
            return Err(AppError::InvalidInput(
                "database name must be between 1 and 63 characters".into(),
            ));
        }

        let mut chars = name.chars();
        // first char intentionally excludes digits and underscore
        if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
            return Err(AppError::InvalidInput(
                "database name must start with a lowercase letter".into(),
            ));
        }
        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(AppError::InvalidInput(
                "database name may only contain lowercase letters, digits and underscores".into(),
            ));
        }

        if RESERVED.contains(&name) || name.starts_with("pg_") {
            return Err(AppError::InvalidInput(format!(
                "database name '{name}' is reserved"
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
