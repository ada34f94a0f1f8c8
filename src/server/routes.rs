//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::{AppState, MAX_UPLOAD_BYTES};

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root and /ocr are the OCR panel
        .route("/", get(handlers::ocr_panel))
        .route(
            "/ocr",
            get(handlers::ocr_panel)
                .post(handlers::upload_images)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Edit form shared by the OCR and outputs panels
        .route("/texts", post(handlers::submit_text))
        .route("/outputs", get(handlers::browse_outputs))
        .route("/docs", get(handlers::show_docs))
        .route("/source", get(handlers::show_source))
        .route("/source/download", get(handlers::download_source))
        .route("/logs", get(handlers::show_logs))
        .route("/logs/download", get(handlers::download_log))
        .route("/samples/:name", get(handlers::serve_sample))
        // Static assets
        .route("/static/style.css", get(handlers::serve_css))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
