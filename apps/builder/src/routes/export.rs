use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Local;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::export::{export_json, export_pdf, json_filename, pdf_filename};
use crate::state::AppState;

/// GET /api/v1/export/json
pub async fn handle_export_json(State(state): State<AppState>) -> Result<Response, AppError> {
    let doc = state.session.snapshot().await;
    let bytes = export_json(&doc).map_err(|e| AppError::Internal(e.into()))?;
    let filename = json_filename(&doc);
    info!("Exported JSON as {filename}");
    Ok(attachment("application/json", &filename, bytes))
}

/// GET /api/v1/export/pdf
/// 409 while another export runs. A failed composition is skipped with 204.
pub async fn handle_export_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    let _guard = state
        .session
        .begin_export()
        .ok_or(AppError::ExportInProgress)?;

    let doc = state.session.snapshot().await;
    let filename = pdf_filename(&doc, Local::now().date_naive());
    let page = state.page;

    let outcome = tokio::task::spawn_blocking(move || export_pdf(&doc, &page)).await;
    match outcome {
        Ok(Ok(export)) => {
            info!(
                "Exported PDF as {filename} ({} page(s), {} bytes)",
                export.page_count,
                export.bytes.len()
            );
            Ok(attachment("application/pdf", &filename, export.bytes))
        }
        Ok(Err(e)) => {
            warn!("PDF export skipped: {e}");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        Err(e) => {
            warn!("PDF export skipped, render task failed: {e}");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

fn attachment(content_type: &'static str, filename: &str, bytes: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}
