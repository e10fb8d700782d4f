use async_trait::async_trait;
use chrono::{Duration, NaiveTime, Utc};

use crate::adapters::persistence::PostgresPersistence;
use crate::app_error::{AppError, AppResult};
use crate::domain::entities::ticket::TicketStatus;
use crate::use_cases::dashboard::{DashboardRepo, DashboardStats};

#[async_trait]
impl DashboardRepo for PostgresPersistence {
    async fn stats(&self) -> AppResult<DashboardStats> {
        let today_start = Utc::now()
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();
        let today_end = today_start + Duration::days(1);

        let new_inquiries: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM public.contact_submissions \
             WHERE submitted_at >= $1 AND submitted_at < $2",
        )
        .bind(today_start)
        .bind(today_end)
        .fetch_one(self.reporting())
        .await
        .map_err(AppError::from)?;

        let open_tickets: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM public.tickets \
             WHERE status = $1 AND is_deleted IS DISTINCT FROM TRUE",
        )
        .bind(TicketStatus::Open.as_i32())
        .fetch_one(self.reporting())
        .await
        .map_err(AppError::from)?;

        let total_tickets: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM public.tickets WHERE is_deleted IS DISTINCT FROM TRUE",
        )
        .fetch_one(self.reporting())
        .await
        .map_err(AppError::from)?;

        let tickets_resolved_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM public.tickets \
             WHERE updated_at >= $1 AND updated_at < $2 \
               AND status IN ($3, $4) \
               AND is_deleted IS DISTINCT FROM TRUE",
        )
        .bind(today_start)
        .bind(today_end)
        .bind(TicketStatus::Resolved.as_i32())
        .bind(TicketStatus::Closed.as_i32())
        .fetch_one(self.reporting())
        .await
        .map_err(AppError::from)?;

        Ok(DashboardStats {
            new_inquiries,
            open_tickets,
            total_tickets,
            tickets_resolved_today,
        })
    }
}
