//! socket-event-router server entry point.
//!
//! Runs setup tasks, then starts the Axum HTTP server with the WebSocket
//! endpoint, health checks, and optional static file serving.

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use socket_event_router::api;
use socket_event_router::app_state::AppState;
use socket_event_router::config::RouterConfig;
use socket_event_router::domain::EventBus;
use socket_event_router::http::{compression_layer, redirect};
use socket_event_router::setup::{self, SETUP_COMPLETE, StaticDirTask};
use socket_event_router::ws::EventRouter;
use socket_event_router::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = RouterConfig::from_env().context("loading configuration")?;
    tracing::info!(
        addr = %config.listen_addr,
        mode = %config.dispatch_mode,
        "starting socket-event-router"
    );

    // Build domain layer
    let bus = EventBus::new();
    bus.once(SETUP_COMPLETE, |_| tracing::info!("setup complete"));
    setup::run_setup(&bus, &config, &[&StaticDirTask]).context("running setup tasks")?;

    let router = EventRouter::new(bus, config.dispatch_mode);
    let app_state = AppState::new(router);

    // Build router
    let mut app = Router::new()
        .merge(api::build_router())
        .route(&config.ws_path, get(ws_handler));
    match &config.static_dir {
        Some(dir) => {
            let files = Router::new()
                .fallback_service(ServeDir::new(dir))
                .layer(compression_layer());
            app = app.merge(files);
        }
        None => app = app.route("/", get(redirect::root_handler)),
    }
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, ws_path = %config.ws_path, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initializes tracing. `RUST_LOG` controls filtering (default `info`);
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
