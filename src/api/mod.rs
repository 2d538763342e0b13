use axum::{Router, routing::get};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::gateway::UpstreamClient;

pub mod handlers;
pub mod models;

pub struct AppState {
    pub upstream: UpstreamClient,
}

pub fn create_router(upstream: UpstreamClient, static_dir: impl AsRef<Path>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route("/api/cards", get(handlers::cards_handler))
        .with_state(Arc::new(AppState { upstream }))
        // Static file serving for the UI
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(cors)
}
