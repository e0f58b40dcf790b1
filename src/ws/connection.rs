//! Per-connection read/write loop.
//!
//! Feeds inbound text frames to the socket's [`SocketHandler`] and writes
//! any [`OutboundMessage`] queued on its [`ChannelSocket`] back to the
//! client.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::OutboundMessage;
use super::router::EventRouter;
use super::socket::{ChannelSocket, EventSocket};

/// Runs the read/write loop for a single WebSocket connection until the
/// client closes it or the stream ends.
pub async fn run_connection(socket: WebSocket, router: EventRouter) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (channel, mut out_rx) = ChannelSocket::new();
    let socket_id = channel.id();
    let handler = router.attach(Arc::new(channel));

    tracing::info!(socket = %socket_id, "ws connection opened");

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handler.handle_text(text.as_str());
                    }
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => {
                            handler.handle_text(text);
                        }
                        Err(_) => {
                            tracing::warn!(socket = %socket_id, "dropping non-utf8 binary frame");
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::warn!(socket = %socket_id, error = %err, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Response queued by the router
            out = out_rx.recv() => {
                let Some(out) = out else { break };
                let Some(json) = encode(&out) else { continue };
                if let Err(err) = ws_tx.send(Message::text(json)).await {
                    tracing::warn!(
                        socket = %socket_id,
                        event = %out.event,
                        error = %err,
                        "ws write failed"
                    );
                    break;
                }
            }
        }
    }

    tracing::info!(socket = %socket_id, "ws connection closed");
}

fn encode(message: &OutboundMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(json) => Some(json),
        Err(err) => {
            tracing::error!(event = %message.event, error = %err, "failed to encode outbound message");
            None
        }
    }
}
