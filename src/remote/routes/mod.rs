pub mod health;
pub mod stream;

use crate::host::EditorHost;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;

/// Shared state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub host: Arc<dyn EditorHost>,
    pub start_time: Instant,
}

/// Build the complete axum router.
pub fn build_router(host: Arc<dyn EditorHost>, start_time: Instant) -> Router {
    let state = AppState { host, start_time };

    Router::new()
        .route("/health", axum::routing::get(health::get_health))
        .route("/ws", axum::routing::get(stream::ws_handler))
        .with_state(state)
}
