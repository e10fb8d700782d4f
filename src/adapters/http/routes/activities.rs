use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_activities))
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

async fn list_activities(
    State(app_state): State<AppState>,
    Query(query): Query<ActivitiesQuery>,
) -> AppResult<impl IntoResponse> {
    let logs = app_state.audit.recent(query.limit, query.offset).await?;
    Ok(Json(logs))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::json;

    use crate::test_utils::TestAppStateBuilder;

    fn server() -> TestServer {
        let state = TestAppStateBuilder::new().build();
        TestServer::new(crate::infra::app::create_app(state)).unwrap()
    }

    #[tokio::test]
    async fn mutations_leave_an_audit_trail() {
        let server = server();

        server
            .post("/api/companies")
            .json(&json!({ "name": "Acme", "code": "ACM", "database": "acme" }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server.get("/api/activities").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        let actions: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["action"].as_str().unwrap())
            .collect();
        assert!(actions.contains(&"COMPANY.CREATE"));
        assert!(actions.contains(&"COMPANY.POPULATE"));
    }

    #[tokio::test]
    async fn limit_is_bounded() {
        let server = server();

        server
            .get("/api/activities")
            .add_query_param("limit", "101")
            .await
            .assert_status(axum::http::StatusCode::BAD_REQUEST);

        server
            .get("/api/activities")
            .add_query_param("offset", "-1")
            .await
            .assert_status(axum::http::StatusCode::BAD_REQUEST);
    }
}
