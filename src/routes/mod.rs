//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the HTTP + websocket endpoints the dashboard client
//! talks to. When a dashboard build directory is configured it is served
//! as the fallback, so the client and the API share one origin.

pub mod desks;
pub mod simulation;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes shared by the dashboard client and websocket observers.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/locations", get(desks::locations))
        .route("/api/dashboard", get(desks::dashboard))
        .route("/api/floors/{floor_id}/desks", get(desks::floor_desks))
        .route("/api/live", get(desks::live_desk))
        .route("/api/simulation", get(simulation::status).put(simulation::set_active))
        .route("/api/simulation/toggle", post(simulation::toggle))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Full application router. `dashboard_dir` adds static assets as the
/// fallback service.
pub fn app(state: AppState, dashboard_dir: Option<&str>) -> Router {
    let router = api_routes(state);
    match dashboard_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
