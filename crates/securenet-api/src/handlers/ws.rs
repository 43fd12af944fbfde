//! WebSocket upgrade handler for the hub.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::connect_info::ConnectInfo;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::Extensions;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use securenet_realtime::connection::heartbeat::{HeartbeatConfig, run_heartbeat};
use securenet_realtime::message::serializer::serialize_outbound;

use crate::state::AppState;

/// How long the writer may keep flushing queued frames after the session ends.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// GET /hub: WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    extensions: Extensions,
    ws: WebSocketUpgrade,
) -> Response {
    let remote_addr = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());
    // Frames just over the hub limit still reach the validator and get an
    // error reply; anything far larger tears the socket down.
    let socket_limit = state.engine.config().max_message_bytes.saturating_mul(4);

    ws.max_message_size(socket_limit)
        .on_upgrade(move |socket| handle_socket(state, remote_addr, socket))
}

/// Drives one session from open to close.
async fn handle_socket(state: AppState, remote_addr: Option<String>, socket: WebSocket) {
    let engine = state.engine.clone();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (handle, mut outbound_rx) = engine.connections.open(remote_addr);
    let session = handle.id;

    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let text = match serialize_outbound(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(session_id = %session, error = %e, "Failed to serialize frame");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let mut heartbeat = tokio::spawn(run_heartbeat(
        handle.clone(),
        HeartbeatConfig::from(engine.config()),
    ));
    let mut shutdown = engine.shutdown_receiver();

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    handle.touch().await;
                    engine.hub.handle_text(session, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => handle.touch().await,
                Some(Err(e)) => {
                    debug!(session_id = %session, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = &mut heartbeat => {
                info!(session_id = %session, "Session timed out");
                break;
            }
            _ = shutdown.recv() => break,
        }
    }

    heartbeat.abort();
    engine.disconnect(session).await;
    drop(handle);

    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer).await.is_err() {
        debug!(session_id = %session, "Writer did not drain in time");
    }
}
