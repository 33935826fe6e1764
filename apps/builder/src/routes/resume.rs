use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::info;

use crate::edits::Edit;
use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::photo::{crop_square_center, PHOTO_SIZE};
use crate::state::AppState;

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.session.snapshot().await)
}

/// PUT /api/v1/resume
/// Accepts any JSON value; it is shape-typed but not cleaned.
pub async fn handle_put_resume(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Json<ResumeDocument> {
    Json(state.session.put_raw(&raw).await)
}

/// POST /api/v1/resume/edits
pub async fn handle_edit(
    State(state): State<AppState>,
    Json(edit): Json<Edit>,
) -> Result<Json<ResumeDocument>, AppError> {
    Ok(Json(state.session.apply_edit(&edit).await?))
}

/// POST /api/v1/resume/clean
pub async fn handle_clean(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.session.clean().await)
}

/// POST /api/v1/resume/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.session.reset().await)
}

/// POST /api/v1/resume/import
/// The body is the raw file. Anything but a JSON object leaves the document as is.
pub async fn handle_import(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    match state.session.import_json(&body).await {
        Some(document) => Json(json!({ "imported": true, "document": document })),
        None => Json(json!({ "imported": false, "document": state.session.snapshot().await })),
    }
}

/// POST /api/v1/resume/photo
/// Multipart upload with a `photo` field. The image is centre-cropped and
/// stored as a PNG data URL. An undecodable image is rejected with 422.
pub async fn handle_upload_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeDocument>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("photo") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read photo: {e}")))?;
            upload = Some(bytes);
            break;
        }
    }
    let bytes = upload.ok_or_else(|| AppError::Validation("Missing 'photo' field".to_string()))?;

    let data_url = tokio::task::spawn_blocking(move || crop_square_center(&bytes, PHOTO_SIZE))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    info!("Photo updated ({} bytes encoded)", data_url.len());
    Ok(Json(state.session.set_photo(data_url).await))
}

/// DELETE /api/v1/resume/photo
pub async fn handle_clear_photo(
    State(state): State<AppState>,
) -> Result<Json<ResumeDocument>, AppError> {
    Ok(Json(state.session.apply_edit(&Edit::ClearPhoto).await?))
}
