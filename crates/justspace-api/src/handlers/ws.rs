//! WebSocket upgrade handler — accept-time authentication plus the
//! per-connection read and write tasks.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use axum_extra::TypedHeader;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info};

use justspace_core::error::AppError;
use justspace_realtime::connection::authenticator::AuthenticatedClient;
use justspace_realtime::connection::handle::ConnectionHandle;

use crate::error::ApiError;
use crate::state::AppState;

/// Optional query parameters for WebSocket authentication.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Bearer token. Primary source for browser clients, which cannot set
    /// headers on WebSocket upgrades.
    pub token: Option<String>,
}

/// GET /api/ws — authenticated WebSocket upgrade
///
/// The bearer token is taken from the `token` query parameter, the session
/// cookie, or the `Authorization` header, in that order. Any failure
/// rejects the request with 401 before the upgrade; no connection state
/// exists yet at that point.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    jar: CookieJar,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let cookie_name = state.config.auth.cookie_name.as_str();
    let token = query
        .token
        .or_else(|| jar.get(cookie_name).map(|c| c.value().to_string()))
        .or_else(|| bearer.map(|TypedHeader(auth)| auth.token().to_string()))
        .ok_or_else(|| AppError::authentication("Missing bearer token"))?;

    let client = state.authenticator.authenticate(&token)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, client, socket)))
}

/// Bridges one established socket to the hub.
async fn handle_socket(state: AppState, client: AuthenticatedClient, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = ConnectionHandle::new(
        client.user_id.clone(),
        state.config.realtime.outbound_queue_capacity,
    );
    let conn_id = handle.id;
    state.hub.register(Arc::clone(&handle)).await;

    info!(
        conn_id = %conn_id,
        user_id = %client.user_id,
        "WebSocket connection established"
    );

    // Write task: sole consumer of the outbound queue. Exits once the hub
    // closes the queue (unregister or eviction) or the peer stops taking
    // writes; closing the sink afterwards tears the stream down promptly.
    let write_task = tokio::spawn(async move {
        while let Some(payload) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    // Read loop: liveness detection only. This channel is push-only from
    // server to client; inbound application frames are ignored.
    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "WebSocket read error");
                break;
            }
        }
    }

    state.hub.unregister(conn_id).await;
    let _ = write_task.await;

    info!(
        conn_id = %conn_id,
        user_id = %client.user_id,
        "WebSocket connection closed"
    );
}
