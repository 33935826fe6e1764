use axum::{extract::State, response::Html, Json};

use crate::layout::{compose_preview, Canvas};
use crate::render::{render, render_html, VisualTree};
use crate::state::AppState;

/// GET /api/v1/preview
/// The visual tree for the current theme, carrying the zoom transform.
pub async fn handle_preview_tree(State(state): State<AppState>) -> Json<VisualTree> {
    let doc = state.session.snapshot().await;
    Json(render(&doc))
}

/// GET /api/v1/preview/layout
/// Positioned page elements with the zoom transform applied.
pub async fn handle_preview_layout(State(state): State<AppState>) -> Json<Canvas> {
    let doc = state.session.snapshot().await;
    Json(compose_preview(&render(&doc), &state.page))
}

/// GET /preview
pub async fn handle_preview_html(State(state): State<AppState>) -> Html<String> {
    let doc = state.session.snapshot().await;
    Html(render_html(&render(&doc)))
}
