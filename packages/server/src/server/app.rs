//! Application setup and server configuration.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{health_handler, webhook_router, WebhookState};

/// Shared application state for infrastructure routes.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
}

/// Build the Axum application router.
///
/// The webhook router carries only the dependency container so it can be
/// built against mocks in tests; the health route keeps its own pool
/// handle for connectivity checks.
pub fn build_app(db_pool: PgPool, deps: Arc<ServerDeps>) -> Router {
    let health = Router::new()
        .route("/health", get(health_handler))
        .with_state(AppState { db_pool });

    Router::new()
        .merge(health)
        .merge(webhook_router(WebhookState { deps }))
        .layer(TraceLayer::new_for_http())
}
