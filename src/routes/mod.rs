//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the realtime websocket endpoint and the room history endpoints under
//! a single Axum router. CORS is open because the canvas client is served
//! from a different origin.

pub mod history;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/shapes/{room_id}", get(history::list_shapes).delete(history::clear_shapes))
        .route("/chats/{room_id}", get(history::list_chats))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
