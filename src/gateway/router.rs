//! Gateway router assembly.

use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use tower_http::cors::CorsLayer;

use super::handlers::generate;
use crate::backend::router::ModelRouter;
use crate::logstore::PromptLog;

/// Shared per-process state: the dispatch table and the prompt log.
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<ModelRouter>,
    pub log: Arc<PromptLog>,
}

/// Build the gateway application router.
pub fn create_gateway_router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
