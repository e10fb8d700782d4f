use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{actor::request_context, app_state::AppState, middleware::ClientIp},
    app_error::AppResult,
    application::query::{ListMeta, Page},
    use_cases::company::{Company, CompanyUpdate, NewCompany},
    use_cases::company_user::{CompanyUserView, CreatedCompanyUser, NewCompanyUser},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies))
        .route("/", post(create_company))
        .route("/{company_id}", get(get_company))
        .route("/{company_id}", patch(update_company))
        .route("/{company_id}", delete(delete_company))
        .route("/{company_id}/users", get(list_company_users))
        .route("/{company_id}/users", post(create_company_user))
}

#[derive(Deserialize)]
struct CompanyListQuery {
    search: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,
    order: Option<String>,
}

#[derive(Serialize)]
struct CompanyListResponse {
    data: Vec<Company>,
    meta: ListMeta,
}

async fn list_companies(
    State(app_state): State<AppState>,
    Query(query): Query<CompanyListQuery>,
) -> AppResult<impl IntoResponse> {
    let Page { data, meta } = app_state
        .companies
        .list(query.search, query.page, query.limit, query.sort_by, query.order)
        .await?;

    Ok(Json(CompanyListResponse { data, meta }))
}

#[derive(Deserialize)]
struct CreateCompanyBody {
    name: String,
    code: String,
    database: String,
    #[serde(rename = "expiresAt")]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct CreateCompanyResponse {
    message: &'static str,
    data: Company,
}

async fn create_company(
    State(app_state): State<AppState>,
    jar: CookieJar,
    client_ip: Option<Extension<ClientIp>>,
    Json(body): Json<CreateCompanyBody>,
) -> AppResult<impl IntoResponse> {
    let ctx = request_context(&jar, client_ip.as_deref(), &app_state);

    let company = app_state
        .companies
        .create(
            NewCompany {
                name: body.name,
                code: body.code,
                database: body.database,
                expires_at: body.expires_at,
            },
            &ctx,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCompanyResponse {
            message: "Company created successfully.",
            data: company,
        }),
    ))
}

#[derive(Serialize)]
struct CompanyResponse {
    data: Company,
}

async fn get_company(
    State(app_state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let company = app_state.companies.get(company_id).await?;
    Ok(Json(CompanyResponse { data: company }))
}

#[derive(Deserialize)]
struct UpdateCompanyBody {
    name: Option<String>,
    code: Option<String>,
    database: Option<String>,
    #[serde(rename = "expiresAt")]
    expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "isActive")]
    is_active: Option<bool>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn update_company(
    State(app_state): State<AppState>,
    Path(company_id): Path<Uuid>,
    jar: CookieJar,
    client_ip: Option<Extension<ClientIp>>,
    Json(body): Json<UpdateCompanyBody>,
) -> AppResult<impl IntoResponse> {
    let ctx = request_context(&jar, client_ip.as_deref(), &app_state);

    app_state
        .companies
        .update(
            company_id,
            CompanyUpdate {
                name: body.name,
                code: body.code,
                database: body.database,
                expires_at: body.expires_at,
                is_active: body.is_active,
            },
            &ctx,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Company updated successfully.",
    }))
}

#[derive(Deserialize)]
struct DeleteCompanyBody {
    reason: Option<String>,
}

async fn delete_company(
    State(app_state): State<AppState>,
    Path(company_id): Path<Uuid>,
    jar: CookieJar,
    client_ip: Option<Extension<ClientIp>>,
    Json(body): Json<DeleteCompanyBody>,
) -> AppResult<impl IntoResponse> {
    let ctx = request_context(&jar, client_ip.as_deref(), &app_state);

    app_state
        .companies
        .delete(company_id, body.reason.as_deref().unwrap_or(""), &ctx)
        .await?;

    Ok(Json(MessageResponse {
        message: "Company deleted.",
    }))
}

#[derive(Serialize)]
struct CompanyUsersResponse {
    data: Vec<CompanyUserView>,
}

async fn list_company_users(
    State(app_state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let users = app_state.company_users.list(company_id).await?;
    Ok(Json(CompanyUsersResponse { data: users }))
}

#[derive(Deserialize)]
struct CreateUserBody {
    #[serde(rename = "displayName")]
    display_name: String,
    username: String,
    email: String,
    password: String,
    role: i32,
}

#[derive(Serialize)]
struct CreateUserResponse {
    message: &'static str,
    user: CreatedCompanyUser,
}

async fn create_company_user(
    State(app_state): State<AppState>,
    Path(company_id): Path<Uuid>,
    jar: CookieJar,
    client_ip: Option<Extension<ClientIp>>,
    Json(body): Json<CreateUserBody>,
) -> AppResult<impl IntoResponse> {
    let ctx = request_context(&jar, client_ip.as_deref(), &app_state);

    let created = app_state
        .company_users
        .create(
            company_id,
            NewCompanyUser {
                display_name: body.display_name,
                username: body.username,
                email: body.email,
                password: body.password,
                role_id: body.role,
            },
            &ctx,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully.",
            user: created,
        }),
    ))
}
