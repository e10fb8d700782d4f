use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    application::query::{ListMeta, Page},
    use_cases::inquiry::{Inquiry, InquiryFilter},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_inquiries))
}

#[derive(Deserialize)]
struct InquiryListQuery {
    page: Option<i64>,
    limit: Option<i64>,
    email: Option<String>,
    company: Option<String>,
    q: Option<String>,
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,
    order: Option<String>,
}

#[derive(Serialize)]
struct InquiryMeta {
    #[serde(flatten)]
    list: ListMeta,
    filters: InquiryFilter,
}

#[derive(Serialize)]
struct InquiryListResponse {
    success: bool,
    data: Vec<Inquiry>,
    meta: InquiryMeta,
}

async fn list_inquiries(
    State(app_state): State<AppState>,
    Query(query): Query<InquiryListQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = InquiryFilter {
        email: query.email,
        company: query.company,
        q: query.q,
    };

    let (Page { data, meta }, filters) = app_state
        .inquiries
        .list(filter, query.page, query.limit, query.sort_by, query.order)
        .await?;

    Ok(Json(InquiryListResponse {
        success: true,
        data,
        meta: InquiryMeta {
            list: meta,
            filters,
        },
    }))
}
