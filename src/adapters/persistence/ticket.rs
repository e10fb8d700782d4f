use async_trait::async_trait;
use sqlx::Row;

use crate::adapters::persistence::{bind_scalar_values, bind_values, PostgresPersistence};
use crate::app_error::{AppError, AppResult};
use crate::application::query::FilterBuilder;
use crate::use_cases::ticket::{
    Ticket, TicketListRequest, TicketRepo, TicketReply, TicketWithReplies,
};

const TICKET_COLUMNS: &str =
    "id, subject, description, status, priority, metadata, is_deleted, created_at, updated_at";

fn row_to_ticket(row: sqlx::postgres::PgRow) -> Ticket {
    Ticket {
        id: row.get("id"),
        subject: row.get("subject"),
        description: row.get("description"),
        status: row.get("status"),
        priority: row.get("priority"),
        metadata: row.get("metadata"),
        is_deleted: row.get("is_deleted"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_reply(row: sqlx::postgres::PgRow) -> TicketReply {
    TicketReply {
        id: row.get("id"),
        ticket_id: row.get("ticket_id"),
        message: row.get("message"),
        author_type: row.get("author_type"),
        author_name: row.get("author_name"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn build_filter(request: &TicketListRequest) -> FilterBuilder {
    let mut filter = FilterBuilder::new();
    if let Some(status) = request.filter.status {
        filter.eq_int("status", i64::from(status));
    }
    if let Some(priority) = request.filter.priority {
        filter.eq_int("priority", i64::from(priority));
    }
    if let Some(is_deleted) = request.filter.is_deleted {
        filter.eq_bool("is_deleted", is_deleted);
    }
    if let Some(q) = &request.filter.q {
        filter.contains("subject", q);
    }
    filter
}

#[async_trait]
impl TicketRepo for PostgresPersistence {
    async fn list(&self, request: &TicketListRequest) -> AppResult<(Vec<Ticket>, i64)> {
        let filter = build_filter(request);
        let where_clause = filter.where_clause();

        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM public.tickets {where_clause} {} LIMIT ${} OFFSET ${}",
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

        let count_sql = format!("SELECT COUNT(*) FROM public.tickets {where_clause}");
        let total: i64 = bind_scalar_values(sqlx::query_scalar(&count_sql), filter.values())
            .fetch_one(self.reporting())
            .await
            .map_err(AppError::from)?;

        Ok((rows.into_iter().map(row_to_ticket).collect(), total))
    }

    async fn get_with_replies(&self, ticket_id: i64) -> AppResult<Option<TicketWithReplies>> {
        let row = sqlx::query(&format!(
            "SELECT {TICKET_COLUMNS} FROM public.tickets \
             WHERE id = $1 AND is_deleted = FALSE LIMIT 1"
        ))
        .bind(ticket_id)
        .fetch_optional(self.reporting())
        .await
        .map_err(AppError::from)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let ticket = row_to_ticket(row);

        let replies = sqlx::query(
            "SELECT id, ticket_id, message, author_type, author_name, author_id, \
                    created_at, updated_at \
             FROM public.ticket_replies \
             WHERE ticket_id = $1 AND is_deleted = FALSE \
             ORDER BY created_at ASC",
        )
        .bind(ticket_id)
        .fetch_all(self.reporting())
        .await
        .map_err(AppError::from)?;

        Ok(Some(TicketWithReplies {
            ticket,
            replies: replies.into_iter().map(row_to_reply).collect(),
        }))
    }
}
