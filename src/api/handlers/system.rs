//! System endpoints: health check and bus inspection.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::http::send_json;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    pub status: String,
    /// RFC 3339 timestamp of the response.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
    /// Configured dispatch mode, in its configuration-string form.
    pub dispatch_mode: String,
}

/// `GET /health` — Service health status.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    send_json(
        StatusCode::OK,
        &HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            dispatch_mode: state.router.mode().to_string(),
        },
    )
}

/// Listener count for one event name.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListenersResponse {
    /// Event name queried.
    pub event: String,
    /// Number of listeners currently registered.
    pub listeners: usize,
}

/// `GET /events/{event}/listeners` — Inspect the bus registry.
pub async fn listeners_handler(
    State(state): State<AppState>,
    Path(event): Path<String>,
) -> Response {
    let listeners = state.event_bus().listeners(&event);
    send_json(StatusCode::OK, &ListenersResponse { event, listeners })
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/events/{event}/listeners", get(listeners_handler))
}
