//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the chat API under `/api` plus two liveness endpoints at
//! the root, and wraps everything in request tracing and CORS layers.

pub mod chats;
pub mod error;

use axum::Router;
use axum::response::Json;
use axum::routing::get;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", chats::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Chat API is running" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
