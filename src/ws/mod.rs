//! WebSocket layer: wire types, sockets, the event router, and the
//! connection loop.
//!
//! The endpoint (default `/ws`) accepts `{ "event", "payload" }` frames and
//! routes them onto the [`crate::domain::EventBus`].

pub mod connection;
pub mod handler;
pub mod messages;
pub mod router;
pub mod socket;

pub use messages::{InboundMessage, OutboundMessage};
pub use router::{EventRouter, RouteOutcome, SocketHandler};
pub use socket::{ChannelSocket, EventSocket, SocketRef};
