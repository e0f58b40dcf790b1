//! Socket abstraction the router writes responses to.
//!
//! The router never owns a socket's lifecycle. It only needs an identity
//! for logging and a way to queue an [`OutboundMessage`].

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::messages::OutboundMessage;
use crate::error::RouterError;

/// Outbound half of a client connection.
pub trait EventSocket: fmt::Debug + Send + Sync {
    /// Stable identifier for this connection.
    fn id(&self) -> Uuid;

    /// Queues a message for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::SocketClosed`] if the connection can no
    /// longer accept messages.
    fn send(&self, message: OutboundMessage) -> Result<(), RouterError>;
}

/// Shared handle to a socket. Passthrough subscribers receive one of these
/// so they can reply on the originating connection.
pub type SocketRef = Arc<dyn EventSocket>;

/// [`EventSocket`] backed by an unbounded channel drained by the
/// connection's writer task.
#[derive(Debug, Clone)]
pub struct ChannelSocket {
    id: Uuid,
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl ChannelSocket {
    /// Creates a socket with a fresh v4 id, returning the receiver the
    /// writer should drain.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                id: Uuid::new_v4(),
                tx,
            },
            rx,
        )
    }
}

impl EventSocket for ChannelSocket {
    fn id(&self) -> Uuid {
        self.id
    }

    fn send(&self, message: OutboundMessage) -> Result<(), RouterError> {
        self.tx
            .send(message)
            .map_err(|_| RouterError::SocketClosed(self.id))
    }
}
