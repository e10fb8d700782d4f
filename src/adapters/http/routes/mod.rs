pub mod activities;
pub mod companies;
pub mod dashboard;
pub mod health;
pub mod inquiries;
pub mod tickets;
pub mod totp;
pub mod ws;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/companies", companies::router())
        .nest("/tickets", tickets::router())
        .nest("/inquiries", inquiries::router())
        .nest("/activities", activities::router())
        .nest("/dashboard", dashboard::router())
        .nest("/ws", ws::router())
        .merge(totp::router())
        .merge(health::router())
}
