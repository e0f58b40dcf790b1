//! HTTP API layer: system endpoints and router composition.

pub mod handlers;

use axum::Router;

use crate::app_state::AppState;
use crate::http::compression_layer;

/// Builds the router with all plain HTTP endpoints, compressed per
/// `Accept-Encoding`.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::system::routes())
        .layer(compression_layer())
}
