//! Domain layer: dispatch mode, event naming, and the event bus.
//!
//! These types carry no transport concerns. The WebSocket layer in
//! [`crate::ws`] feeds parsed messages into them.

pub mod dispatch_mode;
pub mod event_bus;
pub mod event_name;

pub use dispatch_mode::DispatchMode;
pub use event_bus::{BusPayload, EventBus, ListenerId, Passthrough, RequiredEvents};
pub use event_name::{is_data_event, set_event_for};
