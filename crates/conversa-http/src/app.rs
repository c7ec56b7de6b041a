//! Router assembly, mirroring `skynet-gateway::app::build_router`'s shape:
//! a handful of routes over one `Arc<AppState>`, wrapped in tracing and CORS
//! layers.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::dispatcher::chat_handler;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_handler() -> axum::Json<serde_json::Value> {
    axum::Json(json!({ "status": "ok", "service": "conversa-gateway" }))
}
