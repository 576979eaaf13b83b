use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::metrics_middleware;
use super::{handlers, pages};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Service introspection
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/info", get(handlers::info));

    // Page data, one route per mirror capability
    let page_routes = Router::new()
        .route("/watch", get(pages::watch))
        .route("/search", get(pages::search))
        .route("/channel/{id}", get(pages::channel))
        .route("/playlist", get(pages::playlist))
        .route("/comments", get(pages::comments));

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(page_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
