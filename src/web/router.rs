//! Router configuration for the read API.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::cors::create_cors_layer;
use super::handlers::{health_check, list_news, AppState};
use crate::config::WebConfig;

/// Create the main router.
///
/// `/api/news` and `/health` are always routed. With `serve_static`,
/// every other path is served from `static_path`.
pub fn create_router(app_state: Arc<AppState>, config: &WebConfig) -> Router {
    let api_routes = Router::new().route("/news", get(list_news));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .with_state(app_state);

    if config.serve_static {
        router = router.fallback_service(ServeDir::new(&config.static_path));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&config.cors_origins)),
    )
}
