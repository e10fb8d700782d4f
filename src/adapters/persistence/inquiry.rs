use async_trait::async_trait;
use sqlx::Row;

use crate::adapters::persistence::{bind_scalar_values, bind_values, PostgresPersistence};
use crate::app_error::{AppError, AppResult};
use crate::application::query::FilterBuilder;
use crate::use_cases::inquiry::{
    Inquiry, InquiryListRequest, InquiryRepo, INQUIRY_SEARCH_COLUMNS,
};

const INQUIRY_COLUMNS: &str =
    "id, first_name, last_name, company_name, phone_number, email, question, submitted_at";

fn row_to_inquiry(row: sqlx::postgres::PgRow) -> Inquiry {
    Inquiry {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        company_name: row.get("company_name"),
        phone_number: row.get("phone_number"),
        email: row.get("email"),
        question: row.get("question"),
        submitted_at: row.get("submitted_at"),
    }
}

#[async_trait]
impl InquiryRepo for PostgresPersistence {
    async fn list(&self, request: &InquiryListRequest) -> AppResult<(Vec<Inquiry>, i64)> {
        let mut filter = FilterBuilder::new();
        if let Some(email) = &request.filter.email {
            filter.contains("email", email);
        }
        if let Some(company) = &request.filter.company {
            filter.contains("company_name", company);
        }
        if let Some(q) = &request.filter.q {
            filter.search(INQUIRY_SEARCH_COLUMNS, q);
        }

        let where_clause = filter.where_clause();
        let sql = format!(
            "SELECT {INQUIRY_COLUMNS} FROM public.contact_submissions {where_clause} {} \
             LIMIT ${} OFFSET ${}",
            request.sort.order_by(),
            filter.next_placeholder(),
            filter.next_placeholder() + 1,
        );

        let rows = bind_values(sqlx::query(&sql), filter.values())
            .bind(request.pagination.limit())
            .bind(request.pagination.offset())
            .fetch_all(self.reporting())
            .await
            .map_err(AppError::from)?;

        let count_sql = format!("SELECT COUNT(*) FROM public.contact_submissions {where_clause}");
        let total: i64 = bind_scalar_values(sqlx::query_scalar(&count_sql), filter.values())
            .fetch_one(self.reporting())
            .await
            .map_err(AppError::from)?;

        Ok((rows.into_iter().map(row_to_inquiry).collect(), total))
    }
}
