use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

/// Router wrapped so trailing slashes are trimmed before route matching
pub fn build_app(state: AppState) -> NormalizePath<Router> {
    NormalizePath::trim_trailing_slash(build_router(state))
}

/// Build and configure the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Product data routes
        .route("/extensions/products/{item_id}", get(handlers::get_product))
        .route("/extensions/query", get(handlers::query_products))
        // Settings routes
        .route("/settings/{tab}", get(handlers::list_sections))
        .route("/settings/{tab}/{section}", get(handlers::get_card))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
