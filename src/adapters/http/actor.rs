use axum_extra::extract::cookie::CookieJar;

use crate::adapters::http::app_state::AppState;
use crate::adapters::http::middleware::ClientIp;
use crate::application::jwt;
use crate::use_cases::audit::RequestContext;

/// Cookie carrying the step-up credential issued by `/api/verify`.
pub const STEP_UP_COOKIE: &str = "step_up_token";

const DEFAULT_ACTOR: &str = "administrator";

/// Resolves who is acting on this request for audit attribution.
///
/// A valid step-up credential names the actor; anything else falls back to
/// the shared administrator identity. This is attribution, not
/// authorization — session enforcement happens in front of this service.
pub fn request_context(
    jar: &CookieJar,
    client_ip: Option<&ClientIp>,
    state: &AppState,
) -> RequestContext {
    let actor = jar
        .get(STEP_UP_COOKIE)
        .and_then(|cookie| jwt::verify(cookie.value(), &state.config.jwt_secret).ok())
        .map(|claims| claims.sub)
        .unwrap_or_else(|| DEFAULT_ACTOR.to_string());

    RequestContext::new(actor, client_ip.and_then(|ip| ip.0.clone()))
}
