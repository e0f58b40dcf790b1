//! Event router: turns client frames into bus events.
//!
//! [`EventRouter::attach`] produces a per-socket [`SocketHandler`]. For each
//! frame the handler decides, based on the configured [`DispatchMode`],
//! whether the message is a data request, a passthrough, or nothing.
//!
//! A data request (`x:get:y`) registers a one-shot listener on the matching
//! set event (`x:set:y`) and emits the get event with no payload. The first
//! emit of the set event after that is forwarded to the socket as
//! `{ "event": "x:set:y", "data": "<json>" }`. If nothing ever emits the set
//! event, the socket receives nothing.
//!
//! A passthrough emits the event itself with the full message and the
//! socket attached. Replying is left to subscribers.

use std::sync::Arc;

use super::messages::{InboundMessage, OutboundMessage};
use super::socket::SocketRef;
use crate::domain::{BusPayload, DispatchMode, EventBus, Passthrough, is_data_event, set_event_for};

/// What the router did with a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Frame was valid but no branch applied.
    Ignored,
    /// Frame was a data request; a one-shot listener waits on `set_event`.
    DataRequested {
        /// Event whose first emit will be forwarded to the socket.
        set_event: String,
    },
    /// Frame was republished as a passthrough event.
    Passthrough,
    /// Frame could not be parsed and was discarded.
    Dropped,
}

/// Router configuration shared by every attached socket.
#[derive(Debug, Clone)]
pub struct EventRouter {
    bus: EventBus,
    mode: DispatchMode,
}

impl EventRouter {
    /// Creates a router publishing on `bus` with the given mode.
    #[must_use]
    pub fn new(bus: EventBus, mode: DispatchMode) -> Self {
        Self { bus, mode }
    }

    /// Returns the configured dispatch mode.
    #[must_use]
    pub const fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Returns the bus this router publishes on.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Binds the router to a socket.
    #[must_use]
    pub fn attach(&self, socket: SocketRef) -> SocketHandler {
        tracing::debug!(socket = %socket.id(), mode = %self.mode, "router attached");
        SocketHandler {
            router: self.clone(),
            socket,
        }
    }
}

/// Inbound-message handler for one socket.
#[derive(Debug, Clone)]
pub struct SocketHandler {
    router: EventRouter,
    socket: SocketRef,
}

impl SocketHandler {
    /// Returns the socket this handler is bound to.
    #[must_use]
    pub fn socket(&self) -> &SocketRef {
        &self.socket
    }

    /// Handles a raw text frame.
    ///
    /// Malformed frames are logged and dropped; the sender is not told.
    pub fn handle_text(&self, text: &str) -> RouteOutcome {
        match InboundMessage::from_json(text) {
            Ok(message) => self.handle_message(message),
            Err(err) => {
                tracing::warn!(
                    socket = %self.socket.id(),
                    error = %err,
                    "dropping malformed message"
                );
                RouteOutcome::Dropped
            }
        }
    }

    /// Routes an already-parsed message.
    pub fn handle_message(&self, message: InboundMessage) -> RouteOutcome {
        let mode = self.router.mode;
        if !mode.is_active() {
            return RouteOutcome::Ignored;
        }
        let Some(event) = message.event.clone() else {
            return RouteOutcome::Ignored;
        };

        let set_event = set_event_for(&event);
        if mode.handles_data() && is_data_event(&event, &set_event) {
            let set_event = set_event.into_owned();
            self.request_data(&event, set_event.clone());
            RouteOutcome::DataRequested { set_event }
        } else if mode.handles_passthrough() {
            tracing::debug!(socket = %self.socket.id(), event = %event, "passthrough");
            self.router.bus.emit(
                &event,
                Some(BusPayload::Passthrough(Passthrough {
                    message,
                    socket: Arc::clone(&self.socket),
                })),
            );
            RouteOutcome::Passthrough
        } else {
            RouteOutcome::Ignored
        }
    }

    fn request_data(&self, event: &str, set_event: String) {
        tracing::debug!(
            socket = %self.socket.id(),
            event = %event,
            set_event = %set_event,
            "data request"
        );

        let socket = Arc::clone(&self.socket);
        let reply_event = set_event.clone();
        self.router.bus.once(set_event, move |payload| {
            let reply = OutboundMessage {
                event: reply_event.clone(),
                data: encode_data(payload),
            };
            if let Err(err) = socket.send(reply) {
                tracing::warn!(
                    socket = %socket.id(),
                    event = %reply_event,
                    kind = err.kind(),
                    error = %err,
                    "failed to send data response"
                );
            }
        });

        self.router.bus.emit(event, None);
    }
}

/// JSON-encodes a set event's payload for the outbound `data` field.
fn encode_data(payload: Option<&BusPayload>) -> String {
    let encoded = match payload {
        Some(BusPayload::Data(value)) => serde_json::to_string(value),
        Some(BusPayload::Passthrough(p)) => serde_json::to_string(&p.message),
        None => return "null".to_string(),
    };
    encoded.unwrap_or_else(|_| "null".to_string())
}
