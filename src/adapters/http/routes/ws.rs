use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
    routing::get,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::adapters::http::app_state::AppState;
use crate::infra::notifier::ChangeNotifier;

pub fn router() -> Router<AppState> {
    Router::new().route("/inquiries", get(inquiries_ws))
}

/// Realtime change feed: every connected peer receives each raw
/// notification payload, with no per-peer filtering.
async fn inquiries_ws(State(app_state): State<AppState>, upgrade: WebSocketUpgrade) -> Response {
    let notifier = app_state.notifier.clone();
    upgrade.on_upgrade(move |socket| handle_peer(socket, notifier))
}

async fn handle_peer(mut socket: WebSocket, notifier: Arc<ChangeNotifier>) {
    // registers the peer; the receiver is dropped (deregistered) on return
    let mut rx = notifier.subscribe();
    tracing::debug!("realtime peer connected");

    loop {
        tokio::select! {
            payload = rx.recv() => match payload {
                Ok(payload) => {
                    if let Err(err) = socket.send(Message::Text(payload.into())).await {
                        // one peer failing must not affect the others
                        tracing::warn!(error = ?err, "realtime send failed, dropping peer");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "realtime peer lagged behind");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {} // inbound messages are ignored
                Some(Err(err)) => {
                    tracing::debug!(error = ?err, "realtime peer error");
                    break;
                }
            },
        }
    }

    tracing::debug!("realtime peer disconnected");
}
