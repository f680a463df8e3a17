//! HTTP surface: router, shared state and the JSON envelope.

pub mod error;
pub mod extract;
pub mod handlers;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{StatusCode, header};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use pdfshelf::Shelf;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// The shelf all operations go through.
    pub shelf: Arc<Shelf>,
}

/// Build the router. Also used by the HTTP tests.
pub fn app(shelf: Arc<Shelf>) -> Router {
    let limit = shelf.config().max_upload_bytes;
    let state = AppState { shelf };

    Router::new()
        .route("/", get(handlers::index))
        .route("/files/{name}", get(handlers::download))
        .route("/api/health", get(handlers::health))
        .route("/api/files", get(handlers::list_files))
        .route("/api/upload", post(handlers::upload))
        .route("/api/update", post(handlers::update))
        .route("/api/rename", post(handlers::rename))
        .route("/api/delete", post(handlers::delete))
        .route("/api/merge", post(handlers::merge))
        .route("/api/organize", post(handlers::organize))
        .layer(DefaultBodyLimit::max(limit))
        .layer(RequestBodyLimitLayer::new(limit))
        .layer(middleware::map_response(envelope_payload_too_large))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Rewrite the body limit layer's bare 413 into the JSON envelope.
async fn envelope_payload_too_large(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "File too large").into_response();
    }
    response
}
