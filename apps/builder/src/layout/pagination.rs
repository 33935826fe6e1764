//! Pagination and page fill analysis.
//!
//! The composed canvas is one tall page. It is sliced into A4 bands; a band
//! boundary is moved up to the top of any text line or image that would
//! otherwise straddle it. Background boxes are clipped and continue on the
//! next page.

use serde::Serialize;

use crate::layout::compose::{Canvas, Element};
use crate::layout::font_metrics::PageGeometry;

/// Below this fraction a trailing page is reported as an orphaned tail.
const ORPHAN_THRESHOLD: f32 = 0.10;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFillVerdict {
    /// Everything fits on the first page.
    FitsOnePage,
    /// Content continues onto further pages.
    SpillsOver,
    /// The last page carries only a sliver of content.
    OrphanedTail,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageFillAnalysis {
    pub page_count: usize,
    /// Height of the content on the tall canvas, margins excluded.
    pub content_height: f32,
    pub available_per_page: f32,
    /// Fraction of the last page's content band in use.
    pub last_page_fill: f32,
    pub verdict: PageFillVerdict,
}

/// The elements of one page, already translated into page coordinates.
#[derive(Debug, Clone)]
pub struct Page {
    pub index: usize,
    pub elements: Vec<Element>,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Canvas offsets at which each page's content band starts.
pub fn page_breaks(canvas: &Canvas, geometry: &PageGeometry) -> Vec<f32> {
    let band = geometry.content_height();
    let content_bottom = content_bottom(canvas, geometry);

    let mut breaks = vec![geometry.margin_pt];
    let mut start = geometry.margin_pt;
    while start + band < content_bottom - 0.01 {
        let target = start + band;
        let mut cut = target;
        // Moving the cut up can expose another straddler in a neighbouring column.
        while let Some(top) = straddler_top(canvas, start, cut) {
            cut = top;
        }
        // An element taller than a whole band has to be cut somewhere.
        if cut <= start + 1.0 {
            cut = target;
        }
        breaks.push(cut);
        start = cut;
    }
    breaks
}

/// Splits the canvas into pages.
pub fn paginate(canvas: &Canvas, geometry: &PageGeometry) -> Vec<Page> {
    let breaks = page_breaks(canvas, geometry);
    breaks
        .iter()
        .enumerate()
        .map(|(index, &lo)| {
            let hi = breaks.get(index + 1).copied().unwrap_or(f32::INFINITY);
            let dy = geometry.margin_pt - lo;
            let elements = canvas
                .elements
                .iter()
                .filter_map(|e| slice_element(e, lo, hi))
                .map(|e| e.translated(dy))
                .collect();
            Page { index, elements }
        })
        .collect()
}

pub fn analyze_page_fill(canvas: &Canvas, geometry: &PageGeometry) -> PageFillAnalysis {
    let breaks = page_breaks(canvas, geometry);
    let band = geometry.content_height();
    let bottom = content_bottom(canvas, geometry);
    let last_start = breaks.last().copied().unwrap_or(geometry.margin_pt);
    let last_page_fill = ((bottom - last_start) / band).clamp(0.0, 1.0);

    let verdict = if breaks.len() == 1 {
        PageFillVerdict::FitsOnePage
    } else if last_page_fill < ORPHAN_THRESHOLD {
        PageFillVerdict::OrphanedTail
    } else {
        PageFillVerdict::SpillsOver
    };

    PageFillAnalysis {
        page_count: breaks.len(),
        content_height: bottom - geometry.margin_pt,
        available_per_page: band,
        last_page_fill,
        verdict,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn content_bottom(canvas: &Canvas, geometry: &PageGeometry) -> f32 {
    canvas
        .elements
        .iter()
        .map(Element::bottom)
        .fold(geometry.margin_pt, f32::max)
}

/// Top of the highest unbreakable element crossing `cut` that starts below `start`.
fn straddler_top(canvas: &Canvas, start: f32, cut: f32) -> Option<f32> {
    canvas
        .elements
        .iter()
        .filter(|e| !e.is_breakable())
        .filter(|e| e.top() > start + 1.0 && e.top() < cut && e.bottom() > cut + 0.01)
        .map(Element::top)
        .min_by(|a, b| a.total_cmp(b))
}

/// The part of `e` that belongs to the band `[lo, hi)`, in canvas coordinates.
fn slice_element(e: &Element, lo: f32, hi: f32) -> Option<Element> {
    match e {
        Element::Rect {
            x,
            top,
            width,
            height,
            fill,
            stroke,
        } => {
            let from = top.max(lo);
            let to = (top + height).min(hi);
            (to - from > 0.01).then(|| Element::Rect {
                x: *x,
                top: from,
                width: *width,
                height: to - from,
                fill: *fill,
                stroke: *stroke,
            })
        }
        _ => (e.top() >= lo && e.top() < hi).then(|| e.clone()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
