//! # socket-event-router
//!
//! WebSocket event router over an injectable publish/subscribe bus.
//!
//! Clients send `{ "event": "...", "payload": ... }` frames. Depending on the
//! configured [`domain::DispatchMode`], each frame is either treated as a
//! data request (`x:get:y`, answered by the first `x:set:y` emitted on the
//! bus) or republished as a passthrough event carrying the message and a
//! handle to the originating socket.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── WS Handler + connection loop (ws/)
//!     │
//!     ├── EventRouter / SocketHandler (ws/router)
//!     │
//!     └── EventBus (domain/)  ◄── producers answering get events
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod setup;
pub mod ws;
