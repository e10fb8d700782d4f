use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::adapters::http::app_state::AppState;

/// Client address resolved for audit attribution. `None` when the transport
/// provides no peer address (e.g. in-process tests).
#[derive(Debug, Clone)]
pub struct ClientIp(pub Option<String>);

pub async fn client_ip_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Only trust forwarded headers if explicitly configured (when behind a reverse proxy)
    let peer_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let ip = if app_state.config.trust_proxy {
        forwarded_ip(&request).or(peer_ip)
    } else {
        peer_ip
    };

    request.extensions_mut().insert(ClientIp(ip));

    next.run(request).await
}

fn forwarded_ip(req: &Request) -> Option<String> {
    // Extract IP from X-Forwarded-For or X-Real-IP headers
    if let Some(forwarded) = req.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let trimmed = first.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    if let Some(real) = req.headers().get("x-real-ip")
        && let Ok(val) = real.to_str()
        && !val.trim().is_empty()
    {
        return Some(val.trim().to_string());
    }
    None
}
