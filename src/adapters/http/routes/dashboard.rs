use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

#[derive(Serialize)]
struct StatEntry {
    name: &'static str,
    value: i64,
}

#[derive(Serialize)]
struct StatsResponse {
    stats: Vec<StatEntry>,
}

async fn get_stats(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = app_state.dashboard.stats().await?;

    Ok(Json(StatsResponse {
        stats: vec![
            StatEntry {
                name: "new_inquiries",
                value: stats.new_inquiries,
            },
            StatEntry {
                name: "open_tickets",
                value: stats.open_tickets,
            },
            StatEntry {
                name: "total_tickets",
                value: stats.total_tickets,
            },
            StatEntry {
                name: "tickets_resolved_today",
                value: stats.tickets_resolved_today,
            },
        ],
    }))
}
