//! API router assembly.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;

use crate::api::routes;
use crate::api::types::ApiContext;

/// Static index page served at `/` (mindmap UI).
const INDEX_PAGE: &str = "static/index.html";

/// Build the API router.
///
/// CORS is permissive — the service fronts a single-page UI and carries
/// no credentials or sessions.
pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/analyze", post(routes::analyze))
        .route("/health", get(routes::health))
        .route("/default", get(routes::banner))
        .route_service("/", ServeFile::new(INDEX_PAGE))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
