// Export adapter: JSON and PDF downloads plus their filenames.
// PDF export is CPU-bound; callers run `export_pdf` inside spawn_blocking.

pub mod filename;
pub mod json;
pub mod pdf;

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::layout::{analyze_page_fill, compose, paginate, PageFillAnalysis, PageGeometry};
use crate::models::resume::ResumeDocument;
use crate::render::render_for_export;
use pdf::PdfError;

pub use filename::{json_filename, pdf_filename};
pub use json::{export_json, import_json};

/// A finished PDF export.
#[derive(Debug)]
pub struct PdfExport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub fill: PageFillAnalysis,
}

/// Renders the document at scale 1, paginates it and writes the PDF.
/// The preview zoom never reaches this path.
pub fn export_pdf(doc: &ResumeDocument, geometry: &PageGeometry) -> Result<PdfExport, PdfError> {
    let tree = render_for_export(doc);
    let canvas = compose(&tree, geometry);
    let fill = analyze_page_fill(&canvas, geometry);
    let pages = paginate(&canvas, geometry);

    info!(
        "PDF composed: {} page(s), {:.0}pt of content, last page {:.0}% full ({:?})",
        fill.page_count,
        fill.content_height,
        fill.last_page_fill * 100.0,
        fill.verdict
    );

    let bytes = pdf::write_pdf(&pages, geometry, &doc.basics.full_name)?;
    Ok(PdfExport {
        bytes,
        page_count: pages.len(),
        fill,
    })
}

/// Single in-flight export flag. A second export is refused, not queued.
#[derive(Debug, Default)]
pub struct ExportFlag(AtomicBool);

impl ExportFlag {
    /// Claims the flag, or `None` when an export is already running.
    pub fn try_begin(&self) -> Option<ExportGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard(&self.0))
    }
}

/// Releases the flag when dropped, whether the export succeeded or not.
#[derive(Debug)]
pub struct ExportGuard<'a>(&'a AtomicBool);

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
