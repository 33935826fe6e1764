//! Font metrics for the two bundled faces the renderer uses.
//!
//! Text is measured and drawn with DejaVu Sans Condensed (regular and bold),
//! compiled into the binary. Widths come straight from the fonts' `hmtx`
//! advances, in em units (relative to font size), so any character the faces
//! cover is measured the same way it is later drawn in the PDF. Characters the
//! faces lack are measured (and drawn) as the `.notdef` glyph.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::error;
use ttf_parser::{Face, GlyphId};

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// The fonts text runs are measured and drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    Sans,
    SansBold,
}

impl FontFamily {
    /// PostScript name written into the PDF font dictionaries.
    pub fn base_font(&self) -> &'static [u8] {
        match self {
            FontFamily::Sans => b"DejaVuSansCondensed",
            FontFamily::SansBold => b"DejaVuSansCondensed-Bold",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(&self) -> &'static [u8] {
        match self {
            FontFamily::Sans => b"F1",
            FontFamily::SansBold => b"F2",
        }
    }

    /// The TrueType program embedded in exported PDFs.
    pub fn program(&self) -> &'static [u8] {
        match self {
            FontFamily::Sans => include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/fonts/DejaVuSansCondensed.ttf"
            )),
            FontFamily::SansBold => include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/fonts/DejaVuSansCondensed-Bold.ttf"
            )),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// Physical page used for composition and export. All values in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    /// Height of the printable band on one page.
    pub fn content_height(&self) -> f32 {
        self.height_pt - 2.0 * self.margin_pt
    }
}

/// A4 portrait (210 × 297 mm) with half-inch margins.
pub fn a4_page() -> PageGeometry {
    PageGeometry {
        width_pt: 595.28,
        height_pt: 841.89,
        margin_pt: 36.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metrics
// ────────────────────────────────────────────────────────────────────────────

/// Advance used when a face failed to parse: glyph tables are empty and every
/// character measures this wide.
const FALLBACK_ADVANCE: u16 = 556;

/// Metrics parsed from one bundled face. Advances are in 1/1000 em, the unit
/// PDF font dictionaries use.
pub struct FontMetrics {
    pub font: FontFamily,
    glyphs: HashMap<char, u16>,
    advances: Vec<u16>,
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    /// Font bounding box (llx, lly, urx, ury) in 1/1000 em.
    pub bbox: [f32; 4],
    pub italic_angle: f32,
    pub space_width: f32,
}

impl FontMetrics {
    fn load(font: FontFamily) -> Self {
        match Face::parse(font.program(), 0) {
            Ok(face) => Self::from_face(font, &face),
            Err(e) => {
                error!("Bundled font {:?} failed to parse: {e}", font);
                Self {
                    font,
                    glyphs: HashMap::new(),
                    advances: Vec::new(),
                    ascent: 800.0,
                    descent: -200.0,
                    cap_height: 700.0,
                    bbox: [0.0, -200.0, 1000.0, 900.0],
                    italic_angle: 0.0,
                    space_width: 0.278,
                }
            }
        }
    }

    fn from_face(font: FontFamily, face: &Face<'_>) -> Self {
        let upem = f32::from(face.units_per_em().max(1));
        let scale = |v: i16| f32::from(v) * 1000.0 / upem;

        // Basic Multilingual Plane only; astral characters draw as .notdef.
        let glyphs: HashMap<char, u16> = (0..=0xFFFF_u32)
            .filter_map(char::from_u32)
            .filter_map(|c| face.glyph_index(c).map(|g| (c, g.0)))
            .collect();

        let advances: Vec<u16> = (0..face.number_of_glyphs())
            .map(|gid| {
                let advance = face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0);
                (u32::from(advance) * 1000 / u32::from(face.units_per_em().max(1))) as u16
            })
            .collect();

        let bbox = face.global_bounding_box();
        let mut metrics = Self {
            font,
            glyphs,
            advances,
            ascent: scale(face.ascender()),
            descent: scale(face.descender()),
            cap_height: scale(face.capital_height().unwrap_or(face.ascender())),
            bbox: [
                scale(bbox.x_min),
                scale(bbox.y_min),
                scale(bbox.x_max),
                scale(bbox.y_max),
            ],
            italic_angle: face.italic_angle().unwrap_or(0.0),
            space_width: 0.0,
        };
        metrics.space_width = metrics.char_width(' ');
        metrics
    }

    /// Glyph id for `c`, or `None` when the face has no glyph for it.
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.glyphs.get(&c).copied()
    }

    /// Advance of a glyph in 1/1000 em.
    pub fn glyph_advance(&self, gid: u16) -> u16 {
        self.advances
            .get(usize::from(gid))
            .copied()
            .unwrap_or(FALLBACK_ADVANCE)
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Width of `s` in points at `size_pt`.
    pub fn width_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt
    }

    pub fn char_width(&self, c: char) -> f32 {
        let gid = self.glyph_id(c).unwrap_or(0);
        f32::from(self.glyph_advance(gid)) / 1000.0
    }
}

static SANS: OnceLock<FontMetrics> = OnceLock::new();
static SANS_BOLD: OnceLock<FontMetrics> = OnceLock::new();

/// Returns the metrics for a font family, parsing the face on first use.
pub fn get_metrics(font: FontFamily) -> &'static FontMetrics {
    let cell = match font {
        FontFamily::Sans => &SANS,
        FontFamily::SansBold => &SANS_BOLD,
    };
    cell.get_or_init(|| FontMetrics::load(font))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(get_metrics(FontFamily::Sans).measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFamily::Sans);
        // "Rust" in DejaVu Sans Condensed is about 2.017 em
        let width = metrics.measure_str("Rust");
        assert!((width - 2.017).abs() < 1e-2, "got {width}");
    }

    #[test]
    fn test_latin1_uses_real_advances() {
        let metrics = get_metrics(FontFamily::Sans);
        assert!(metrics.glyph_id('é').is_some());
        assert!((metrics.char_width('é') - metrics.char_width('e')).abs() < 1e-4);
        assert!((metrics.char_width('ñ') - metrics.char_width('n')).abs() < 1e-4);
        assert!((metrics.char_width('é') - 0.554).abs() < 1e-2);
    }

    #[test]
    fn test_central_european_glyphs_are_covered() {
        let metrics = get_metrics(FontFamily::SansBold);
        for c in "Łukasz Dvořák".chars() {
            assert!(metrics.glyph_id(c).is_some(), "missing glyph for {c}");
        }
    }

    #[test]
    fn test_missing_glyph_measures_as_notdef() {
        let metrics = get_metrics(FontFamily::Sans);
        assert!(metrics.glyph_id('\u{4e2d}').is_none());
        let notdef = f32::from(metrics.glyph_advance(0)) / 1000.0;
        assert!((metrics.char_width('\u{4e2d}') - notdef).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Quezon City University";
        let regular = get_metrics(FontFamily::Sans).measure_str(text);
        let bold = get_metrics(FontFamily::SansBold).measure_str(text);
        assert!(bold > regular);
    }

    #[test]
    fn test_width_pt_scales_with_size() {
        let metrics = get_metrics(FontFamily::Sans);
        let w10 = metrics.width_pt("abc", 10.0);
        let w20 = metrics.width_pt("abc", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-4);
    }

    #[test]
    fn test_face_metrics_are_sane() {
        let metrics = get_metrics(FontFamily::Sans);
        assert!(metrics.ascent > 0.0 && metrics.descent < 0.0);
        assert!(metrics.space_width > 0.2 && metrics.space_width < 0.4);
    }

    #[test]
    fn test_a4_page_sanity() {
        let page = a4_page();
        assert!((page.width_pt - 595.28).abs() < 1e-3);
        assert!(page.content_width() > 500.0);
        assert!(page.content_height() > 750.0);
    }
}
