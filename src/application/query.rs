//! Shared filter/sort/pagination plumbing for the list endpoints.
//!
//! Everything here is pure string/value assembly: the output is a SQL
//! fragment with positionally-numbered placeholders plus the ordered bind
//! list that matches them. User-supplied values never end up in the SQL
//! text; only allow-listed column expressions and structural keywords are
//! interpolated.

use serde::Serialize;

use crate::app_error::{AppError, AppResult};

pub const MAX_LIMIT: i64 = 100;

/// Validated page/limit pair. Construction fails on out-of-range input
/// before any SQL is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(default_limit);

        if page < 1 {
            return Err(AppError::InvalidInput(
                "page must be a positive integer".into(),
            ));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::InvalidInput(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }

        Ok(Self { page, limit })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything other than a case-insensitive `asc`/`desc` falls back to
    /// descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(s) if s.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Per-endpoint allow-list of sortable columns.
///
/// Keys are what clients send; expressions are trusted SQL fragments and may
/// span several columns (`display_name` sorts on `first_name, last_name`).
/// A requested key that is not in the list silently resolves to the default,
/// by design: list endpoints never fail on an unknown sort column.
#[derive(Debug)]
pub struct SortSpec {
    columns: &'static [(&'static str, &'static str)],
    default_key: &'static str,
}

impl SortSpec {
    pub const fn new(
        columns: &'static [(&'static str, &'static str)],
        default_key: &'static str,
    ) -> Self {
        Self {
            columns,
            default_key,
        }
    }

    pub fn resolve(&self, requested: Option<&str>, order: Option<&str>) -> Sort {
        let (key, expr) = requested
            .and_then(|r| self.lookup(r))
            .unwrap_or_else(|| {
                self.lookup(self.default_key)
                    .unwrap_or((self.default_key, self.default_key))
            });

        Sort {
            key,
            expr,
            direction: SortDirection::parse(order),
        }
    }

    fn lookup(&self, key: &str) -> Option<(&'static str, &'static str)> {
        self.columns.iter().copied().find(|(k, _)| *k == key)
    }
}

/// A resolved sort: the allow-listed key, its SQL expression, and a
/// direction. Only `expr` and the direction keyword reach the SQL text.
#[derive(Debug, Clone, Copy)]
pub struct Sort {
    pub key: &'static str,
    pub expr: &'static str,
    pub direction: SortDirection,
}

impl Sort {
    pub fn order_by(&self) -> String {
        format!("ORDER BY {} {}", self.expr, self.direction.as_sql())
    }
}

/// A value destined for a bind parameter, never for the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

/// Accumulates AND-composed conditions and their bind values.
///
/// Column arguments must be code literals (the caller's allow-list); values
/// go through [`SqlValue`] and are referenced by 1-based position. Building
/// is deterministic: identical calls yield identical SQL and bind lists.
#[derive(Debug, Default)]
pub struct FilterBuilder {
    conditions: Vec<String>,
    values: Vec<SqlValue>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq_int(&mut self, column: &str, value: i64) -> &mut Self {
        let idx = self.push(SqlValue::Int(value));
        self.conditions.push(format!("{column} = ${idx}"));
        self
    }

    pub fn eq_bool(&mut self, column: &str, value: bool) -> &mut Self {
        let idx = self.push(SqlValue::Bool(value));
        self.conditions.push(format!("{column} = ${idx}"));
        self
    }

    /// Case-insensitive substring match on a single column.
    pub fn contains(&mut self, column: &str, term: &str) -> &mut Self {
        let idx = self.push(SqlValue::Text(format!("%{term}%")));
        self.conditions.push(format!("{column} ILIKE ${idx}"));
        self
    }

    /// Free-text search: one OR-group of `ILIKE` conditions across the given
    /// columns. Each column gets its own placeholder and its own copy of the
    /// bound value, preserving a strict 1:1 index-to-value correspondence.
    pub fn search(&mut self, columns: &[&str], term: &str) -> &mut Self {
        if columns.is_empty() {
            return self;
        }
        let pattern = format!("%{term}%");
        let group: Vec<String> = columns
            .iter()
            .map(|column| {
                let idx = self.push(SqlValue::Text(pattern.clone()));
                format!("{column} ILIKE ${idx}")
            })
            .collect();
        self.conditions.push(format!("({})", group.join(" OR ")));
        self
    }

    fn push(&mut self, value: SqlValue) -> usize {
        self.values.push(value);
        self.values.len()
    }

    /// `WHERE …` when any condition was added, otherwise an empty string.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn bind_count(&self) -> usize {
        self.values.len()
    }

    /// The placeholder index to use for the next bound value after the
    /// filter's own (e.g. LIMIT/OFFSET).
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Pagination/sort echo returned with every list response.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    #[serde(rename = "sortBy")]
    pub sort_by: &'static str,
    pub order: SortDirection,
}

impl ListMeta {
    pub fn new(pagination: Pagination, total: i64, sort: Sort) -> Self {
        Self {
            page: pagination.page(),
            limit: pagination.limit(),
            total,
            total_pages: pagination.total_pages(total),
            sort_by: sort.key,
            order: sort.direction,
        }
    }
}

/// One page of results plus its meta block.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}
