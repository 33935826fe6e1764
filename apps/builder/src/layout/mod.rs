// Page layout: text measurement, composition onto a canvas, pagination.
// Composition is CPU-bound; export runs it inside tokio::task::spawn_blocking.

pub mod compose;
pub mod font_metrics;
pub mod pagination;
pub mod wrap;

pub use compose::{compose, compose_preview, Canvas};
pub use font_metrics::{a4_page, PageGeometry};
pub use pagination::{analyze_page_fill, paginate, PageFillAnalysis};
