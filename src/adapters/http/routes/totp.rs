use axum::{
    Extension, Json, Router,
    extract::State,
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{actor::request_context, app_state::AppState, middleware::ClientIp},
    app_error::{AppError, AppResult},
    application::jwt,
    domain::entities::audit::{AuditAction, AuditStatus},
    use_cases::audit::AuditEntry,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token", post(issue_token))
        .route("/verify", post(verify_token))
}

#[derive(Serialize)]
struct TokenResponse {
    keyuri: String,
    /// Seconds until the current code rotates; advisory, for the enrollment UI.
    #[serde(rename = "periodRemaining")]
    period_remaining: u64,
}

/// Describes the shared secret as an otpauth:// enrollment URI. The secret
/// itself never leaves the process in raw form.
async fn issue_token(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(TokenResponse {
        keyuri: app_state.totp.provisioning_uri(),
        period_remaining: app_state.totp.remaining_in_period()?,
    }))
}

#[derive(Deserialize)]
struct VerifyBody {
    token: String,
}

#[derive(Serialize)]
struct VerifyResponse {
    result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    credential: Option<String>,
}

async fn verify_token(
    State(app_state): State<AppState>,
    jar: CookieJar,
    client_ip: Option<Extension<ClientIp>>,
    Json(body): Json<VerifyBody>,
) -> AppResult<impl IntoResponse> {
    if body.token.trim().is_empty() {
        return Err(AppError::InvalidInput("token must not be empty".into()));
    }

    let ctx = request_context(&jar, client_ip.as_deref(), &app_state);
    let result = app_state.totp.verify(body.token.trim());

    let status = if result {
        AuditStatus::Success
    } else {
        AuditStatus::Failure
    };
    app_state
        .audit
        .record(
            AuditEntry::new(&ctx, AuditAction::AuthVerify, "TOTP", status)
                .describe("step-up code verification"),
        )
        .await;

    let credential = if result {
        Some(jwt::issue(
            &ctx.actor,
            &app_state.config.jwt_secret,
            app_state.config.step_up_ttl,
        )?)
    } else {
        None
    };

    Ok(Json(VerifyResponse { result, credential }))
}
