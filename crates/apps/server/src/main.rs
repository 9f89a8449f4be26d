use std::path::PathBuf;

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod registry;
mod ws;

use config::ServerConfig;
use registry::LandRegistry;
use ws::{ws_handler, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::parse();
    let session = config.session_config();
    if !session.is_valid() {
        error!("invalid land size {}", config.land_size);
        std::process::exit(2);
    }

    let registry = match LandRegistry::grid(config.grid_width, config.grid_height) {
        Ok(registry) => registry,
        Err(err) => {
            error!("{err}");
            std::process::exit(2);
        }
    };
    info!(
        lands = registry.len(),
        width = config.grid_width,
        height = config.grid_height,
        "land grid ready"
    );

    let state = AppState::new(session, registry);
    let app = router(state, config.static_dir.clone());

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(l) => l,
        Err(err) => {
            error!("failed to bind {}: {err}", config.addr);
            std::process::exit(1);
        }
    };

    info!("land server listening on http://{}", config.addr);
    if let Err(err) = axum::serve(listener, app).await {
        error!("server error: {err}");
        std::process::exit(1);
    }
}

pub(crate) fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    let mut app = Router::new()
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler));
    if let Some(dir) = static_dir {
        info!("serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}
