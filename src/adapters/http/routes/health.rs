use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

async fn health(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    app_state.db.ping().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        message: "Database connection is available.",
    }))
}
