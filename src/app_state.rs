//! Shared application state injected into all Axum handlers.

use crate::domain::EventBus;
use crate::ws::EventRouter;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Router every WebSocket connection is attached to.
    pub router: EventRouter,
}

impl AppState {
    /// Creates the state around an already-configured router.
    #[must_use]
    pub fn new(router: EventRouter) -> Self {
        Self { router }
    }

    /// Returns the event bus shared with the router.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        self.router.bus()
    }
}
