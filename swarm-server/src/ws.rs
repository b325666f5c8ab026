use crate::AppState;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use bytes::Bytes;
use log::{debug, error, info};
use swarm_core::ConnectionId;
use tokio::sync::mpsc;

/// Outbound frames buffered per connection before the transport reports
/// the connection as gone.
const SEND_BUFFER_SIZE: usize = 64;

/// WebSocket upgrade handler
pub async fn handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    let partition = state.next_partition_id();
    let (sender, receiver) = mpsc::channel(SEND_BUFFER_SIZE);

    let connection_id = state.registry.register(partition, sender).await.map_err(|e| {
        error!("Failed to register connection: {e}");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    debug!("WebSocket upgrade for connection {connection_id} (partition {partition})");

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, connection_id, receiver, state)))
}

/// Handle one connection after upgrade: pump broadcast payloads from the
/// registry channel onto the socket until either side goes away.
async fn handle_socket(
    mut socket: WebSocket,
    connection_id: ConnectionId,
    mut receiver: mpsc::Receiver<Bytes>,
    state: AppState,
) {
    loop {
        tokio::select! {
            outbound = receiver.recv() => match outbound {
                Some(payload) => {
                    if socket.send(Message::Binary(payload)).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {
                    // Broadcast-only socket; inbound frames are ignored.
                }
                Some(Err(e)) => {
                    debug!("Connection {connection_id} socket error: {e}");
                    break;
                }
            },
        }
    }

    state.registry.unregister(&connection_id).await;
    info!("Connection {connection_id} closed");
}
