use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    application::query::{ListMeta, Page},
    use_cases::ticket::{Ticket, TicketFilter, TicketWithReplies},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tickets))
        .route("/{ticket_id}", get(get_ticket))
}

#[derive(Deserialize)]
struct TicketListQuery {
    page: Option<i64>,
    limit: Option<i64>,
    status: Option<i32>,
    priority: Option<i32>,
    is_deleted: Option<bool>,
    q: Option<String>,
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,
    order: Option<String>,
}

#[derive(Serialize)]
struct TicketMeta {
    #[serde(flatten)]
    list: ListMeta,
    filters: TicketFilter,
}

#[derive(Serialize)]
struct TicketListResponse {
    success: bool,
    data: Vec<Ticket>,
    meta: TicketMeta,
}

async fn list_tickets(
    State(app_state): State<AppState>,
    Query(query): Query<TicketListQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = TicketFilter {
        status: query.status,
        priority: query.priority,
        is_deleted: query.is_deleted,
        q: query.q,
    };

    let (Page { data, meta }, filters) = app_state
        .tickets
        .list(filter, query.page, query.limit, query.sort_by, query.order)
        .await?;

    Ok(Json(TicketListResponse {
        success: true,
        data,
        meta: TicketMeta {
            list: meta,
            filters,
        },
    }))
}

async fn get_ticket(
    State(app_state): State<AppState>,
    Path(ticket_id): Path<i64>,
) -> AppResult<Json<TicketWithReplies>> {
    let ticket = app_state.tickets.get(ticket_id).await?;
    Ok(Json(ticket))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;

    use crate::test_utils::{create_test_ticket, TestAppStateBuilder};

    fn server_with_tickets() -> TestServer {
        let state = TestAppStateBuilder::new()
            .with_tickets(vec![
                create_test_ticket(|t| {
                    t.id = 1;
                    t.subject = "Printer on fire".into();
                    t.status = 0;
                    t.priority = 5;
                }),
                create_test_ticket(|t| {
                    t.id = 2;
                    t.subject = "VPN flaky".into();
                    t.status = 3;
                    t.priority = 2;
                }),
            ])
            .build();
        TestServer::new(crate::infra::app::create_app(state)).unwrap()
    }

    #[tokio::test]
    async fn filters_and_meta_are_echoed() {
        let server = server_with_tickets();

        let response = server
            .get("/api/tickets")
            .add_query_param("status", "0")
            .add_query_param("q", "printer")
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["meta"]["filters"]["status"], 0);
        assert_eq!(body["meta"]["filters"]["q"], "printer");
        assert_eq!(body["data"][0]["id"], 1);
    }

    #[tokio::test]
    async fn unknown_sort_column_falls_back_to_created_at() {
        let server = server_with_tickets();

        let response = server
            .get("/api/tickets")
            .add_query_param("sortBy", "password_hash")
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["meta"]["sortBy"], "created_at");
        assert_eq!(body["meta"]["order"], "DESC");
    }

    #[tokio::test]
    async fn bad_pagination_is_rejected() {
        let server = server_with_tickets();

        server
            .get("/api/tickets")
            .add_query_param("page", "0")
            .await
            .assert_status(axum::http::StatusCode::BAD_REQUEST);

        server
            .get("/api/tickets")
            .add_query_param("limit", "200")
            .await
            .assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_ticket_is_not_found() {
        let server = server_with_tickets();
        server
            .get("/api/tickets/99")
            .await
            .assert_status(axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ticket_detail_includes_replies() {
        let server = server_with_tickets();

        let response = server.get("/api/tickets/1").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["subject"], "Printer on fire");
        assert!(body["replies"].is_array());
    }
}
