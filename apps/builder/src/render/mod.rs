// Rendering: document -> theme-specific visual tree -> HTML preview.
// Every theme builds its blocks from `items`, so themes only differ in arrangement.

pub mod html;
pub mod items;
pub mod layouts;
pub mod tree;

pub use html::render_html;
pub use layouts::{render, render_for_export};
pub use tree::VisualTree;
