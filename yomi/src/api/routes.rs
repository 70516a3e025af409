use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload = state.config.storage.max_upload_bytes;

    Router::new()
        .route("/api/image-to-text", post(handlers::image_to_text))
        .route("/api/batch-process", post(handlers::batch_process))
        .route(
            "/api/supported-languages",
            get(handlers::supported_languages),
        )
        .route("/api/health", get(handlers::health_check))
        .route("/api/openapi.json", get(openapi::openapi_json))
        // axum's built-in 2 MiB cap would reject uploads before the
        // configurable limit applies.
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(RequestBodyLimitLayer::new(max_upload))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
