use std::sync::Arc;

use crate::layout::PageGeometry;
use crate::session::ResumeSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ResumeSession>,
    /// Page size and margins used for composition and PDF export.
    pub page: PageGeometry,
}
