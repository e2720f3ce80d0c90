//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server exposes exactly two endpoints: the websocket upgrade that
//! carries the whole drawing protocol, and a health check. Rendering, UI,
//! and static assets are external consumers of the websocket contract.

pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
