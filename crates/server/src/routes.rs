use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod slots;

/// The editor ships large documents; the original service accepted 50 MB.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: the two slot endpoints, health, and
/// a static fallback serving the working directory (editor UI assets).
pub fn build_router(cors: CorsLayer, state: AppState) -> Router {
    let static_dir = ServeDir::new(".");

    Router::new()
        .route("/load", get(slots::load))
        .route("/save", post(slots::save))
        .route("/health", get(health))
        .with_state(state)
        .fallback_service(static_dir)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
