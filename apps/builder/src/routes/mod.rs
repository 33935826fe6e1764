pub mod export;
pub mod health;
pub mod preview;
pub mod resume;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Photo uploads and imports are bounded at 10 MiB.
const BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document
        .route(
            "/api/v1/resume",
            get(resume::handle_get_resume).put(resume::handle_put_resume),
        )
        .route("/api/v1/resume/edits", post(resume::handle_edit))
        .route("/api/v1/resume/clean", post(resume::handle_clean))
        .route("/api/v1/resume/reset", post(resume::handle_reset))
        .route("/api/v1/resume/import", post(resume::handle_import))
        .route(
            "/api/v1/resume/photo",
            post(resume::handle_upload_photo).delete(resume::handle_clear_photo),
        )
        // Preview
        .route("/api/v1/preview", get(preview::handle_preview_tree))
        .route("/api/v1/preview/layout", get(preview::handle_preview_layout))
        .route("/preview", get(preview::handle_preview_html))
        // Export
        .route("/api/v1/export/json", get(export::handle_export_json))
        .route("/api/v1/export/pdf", get(export::handle_export_pdf))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}
