//! PDF writing for paginated canvases.
//!
//! Text is drawn with the bundled DejaVu faces, embedded as Type0 fonts
//! (CIDFontType2, Identity-H) so any character the faces cover survives
//! export. Each font carries widths and a ToUnicode map for exactly the
//! glyphs its text uses. Output is a pure function of the pages.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use flate2::{write::ZlibEncoder, Compression};
use image::GenericImageView;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};
use thiserror::Error;
use tracing::warn;

use crate::layout::compose::{Element, Rgb};
use crate::layout::font_metrics::{get_metrics, FontFamily, FontMetrics, PageGeometry};
use crate::layout::pagination::Page;
use crate::photo::decode_data_url;

const PHOTO_NAME: &[u8] = b"Im1";

const SYSTEM_INFO: SystemInfo = SystemInfo {
    registry: Str(b"Adobe"),
    ordering: Str(b"Identity"),
    supplement: 0,
};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("compression failed: {0}")]
    Compress(#[from] std::io::Error),

    #[error("no pages to write")]
    NoPages,
}

/// Decoded photo ready to be written as an image XObject.
struct PhotoXObject {
    width: u32,
    height: u32,
    deflated_rgb: Vec<u8>,
}

/// Glyphs one face draws across the whole document, keyed by glyph id.
#[derive(Default)]
struct GlyphUsage {
    glyphs: BTreeMap<u16, char>,
}

/// Writes `pages` to a PDF document. `title` goes into the document info.
pub fn write_pdf(pages: &[Page], geometry: &PageGeometry, title: &str) -> Result<Vec<u8>, PdfError> {
    if pages.is_empty() {
        return Err(PdfError::NoPages);
    }

    let mut next = Ref::new(1);
    let mut alloc = || {
        let id = next;
        next = Ref::new(id.get() + 1);
        id
    };

    let catalog_id = alloc();
    let page_tree_id = alloc();
    let info_id = alloc();

    let usage = collect_glyphs(pages);
    let font_ids: Vec<(FontFamily, Ref)> = usage.keys().map(|font| (*font, alloc())).collect();

    let photo = first_photo(pages).and_then(load_photo).transpose()?;
    let photo_id = photo.as_ref().map(|_| alloc());

    let page_ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc(), alloc())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);
    pdf.document_info(info_id)
        .title(TextStr(title))
        .creator(TextStr(concat!("builder ", env!("CARGO_PKG_VERSION"))));

    for (font, type0_id) in &font_ids {
        let glyphs = usage.get(font).map(|u| &u.glyphs);
        write_font(&mut pdf, &mut alloc, *type0_id, get_metrics(*font), glyphs)?;
    }

    if let (Some(photo), Some(id)) = (&photo, photo_id) {
        let mut image = pdf.image_xobject(id, &photo.deflated_rgb);
        image.filter(Filter::FlateDecode);
        image.width(photo.width as i32);
        image.height(photo.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
    }

    for (page, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        {
            let mut writer = pdf.page(*page_id);
            writer
                .media_box(Rect::new(0.0, 0.0, geometry.width_pt, geometry.height_pt))
                .parent(page_tree_id)
                .contents(*content_id);
            let mut resources = writer.resources();
            {
                let mut fonts = resources.fonts();
                for (font, id) in &font_ids {
                    fonts.pair(Name(font.resource_name()), *id);
                }
            }
            if let Some(id) = photo_id {
                resources.x_objects().pair(Name(PHOTO_NAME), id);
            }
        }
        let content = page_content(page, geometry.height_pt, photo_id.is_some());
        pdf.stream(*content_id, &content);
    }

    Ok(pdf.finish())
}

/// Records which glyphs each face draws. Characters a face has no glyph for
/// are drawn as `.notdef`; they are reported once per export.
fn collect_glyphs(pages: &[Page]) -> BTreeMap<FontFamily, GlyphUsage> {
    let mut usage: BTreeMap<FontFamily, GlyphUsage> = BTreeMap::new();
    let mut missing: BTreeSet<char> = BTreeSet::new();

    for element in pages.iter().flat_map(|p| &p.elements) {
        let Element::Text { font, text, .. } = element else {
            continue;
        };
        let metrics = get_metrics(*font);
        let entry = usage.entry(*font).or_default();
        for c in text.chars() {
            match metrics.glyph_id(c) {
                Some(gid) => {
                    entry.glyphs.entry(gid).or_insert(c);
                }
                None => {
                    missing.insert(c);
                }
            }
        }
    }

    if !missing.is_empty() {
        let chars: String = missing.iter().collect();
        warn!(
            "{} character(s) have no glyph in the bundled fonts and print as .notdef: {chars:?}",
            missing.len()
        );
    }
    usage
}

/// Writes one Type0 font with its CID font, descriptor, embedded program and
/// ToUnicode map.
fn write_font(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    type0_id: Ref,
    metrics: &FontMetrics,
    glyphs: Option<&BTreeMap<u16, char>>,
) -> Result<(), PdfError> {
    let cid_id = alloc();
    let descriptor_id = alloc();
    let program_id = alloc();
    let cmap_id = alloc();
    let base_font = Name(metrics.font.base_font());
    let empty = BTreeMap::new();
    let glyphs = glyphs.unwrap_or(&empty);

    pdf.type0_font(type0_id)
        .base_font(base_font)
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_id)
        .to_unicode(cmap_id);

    {
        let mut cid = pdf.cid_font(cid_id);
        cid.subtype(CidFontType::Type2);
        cid.base_font(base_font);
        cid.system_info(SYSTEM_INFO);
        cid.font_descriptor(descriptor_id);
        cid.default_width(f32::from(metrics.glyph_advance(0)));
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        {
            let mut widths = cid.widths();
            for (start, run) in width_runs(glyphs.keys().copied(), metrics) {
                widths.consecutive(start, run);
            }
        }
    }

    let [llx, lly, urx, ury] = metrics.bbox;
    pdf.font_descriptor(descriptor_id)
        .name(base_font)
        .flags(FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(llx, lly, urx, ury))
        .italic_angle(metrics.italic_angle)
        .ascent(metrics.ascent)
        .descent(metrics.descent)
        .cap_height(metrics.cap_height)
        .stem_v(80.0)
        .font_file2(program_id);

    let program = metrics.font.program();
    pdf.stream(program_id, &deflate(program)?)
        .filter(Filter::FlateDecode)
        .pair(Name(b"Length1"), program.len() as i32);

    let mut cmap = UnicodeCmap::new(Name(b"Custom"), SYSTEM_INFO);
    for (gid, c) in glyphs {
        cmap.pair(*gid, *c);
    }
    pdf.cmap(cmap_id, &cmap.finish());
    Ok(())
}

/// Groups sorted glyph ids into runs of consecutive ids with their widths,
/// the shape the CID font `W` array wants.
fn width_runs(gids: impl Iterator<Item = u16>, metrics: &FontMetrics) -> Vec<(u16, Vec<f32>)> {
    let mut runs: Vec<(u16, Vec<f32>)> = Vec::new();
    for gid in gids {
        let width = f32::from(metrics.glyph_advance(gid));
        match runs.last_mut() {
            Some((start, widths)) if usize::from(*start) + widths.len() == usize::from(gid) => {
                widths.push(width);
            }
            _ => runs.push((gid, vec![width])),
        }
    }
    runs
}

/// Encodes text as big-endian glyph ids for an Identity-H font.
pub fn encode_text(metrics: &FontMetrics, text: &str) -> Vec<u8> {
    text.chars()
        .flat_map(|c| metrics.glyph_id(c).unwrap_or(0).to_be_bytes())
        .collect()
}

fn page_content(page: &Page, page_height: f32, has_photo: bool) -> Vec<u8> {
    let mut content = Content::new();
    for element in &page.elements {
        match element {
            Element::Rect {
                x,
                top,
                width,
                height,
                fill,
                stroke,
            } => {
                set_fill(&mut content, *fill);
                content.rect(*x, page_height - top - height, *width, *height);
                match stroke {
                    Some(color) => {
                        content.set_stroke_rgb(color.0, color.1, color.2);
                        content.set_line_width(0.75);
                        content.fill_nonzero_and_stroke();
                    }
                    None => {
                        content.fill_nonzero();
                    }
                }
            }
            Element::Rule {
                x,
                top,
                width,
                color,
            } => {
                let y = page_height - top;
                content.set_stroke_rgb(color.0, color.1, color.2);
                content.set_line_width(0.75);
                content.move_to(*x, y);
                content.line_to(x + width, y);
                content.stroke();
            }
            Element::Text {
                x,
                top,
                size,
                font,
                color,
                text,
            } => {
                // Half-leading plus ascent: the baseline sits one em below the line top.
                let baseline = page_height - top - size;
                set_fill(&mut content, *color);
                content.begin_text();
                content.set_font(Name(font.resource_name()), *size);
                content.next_line(*x, baseline);
                content.show(Str(&encode_text(get_metrics(*font), text)));
                content.end_text();
            }
            Element::Image { x, top, size, .. } if has_photo => {
                content.save_state();
                content.transform([*size, 0.0, 0.0, *size, *x, page_height - top - size]);
                content.x_object(Name(PHOTO_NAME));
                content.restore_state();
            }
            Element::Image { .. } => {}
        }
    }
    content.finish()
}

fn set_fill(content: &mut Content, color: Rgb) {
    content.set_fill_rgb(color.0, color.1, color.2);
}

fn first_photo(pages: &[Page]) -> Option<&str> {
    pages.iter().flat_map(|p| &p.elements).find_map(|e| match e {
        Element::Image { data_url, .. } => Some(data_url.as_str()),
        _ => None,
    })
}

/// A photo that cannot be decoded is left out of the PDF rather than failing the export.
fn load_photo(data_url: &str) -> Option<Result<PhotoXObject, PdfError>> {
    let decoded = decode_data_url(data_url)
        .and_then(|bytes| {
            image::load_from_memory(&bytes)
                .map_err(|e| crate::photo::PhotoError::Decode(e.to_string()))
        });
    let img = match decoded {
        Ok(img) => img,
        Err(e) => {
            warn!("Skipping undecodable photo in PDF export: {e}");
            return None;
        }
    };

    let (width, height) = img.dimensions();
    let rgb = img.to_rgb8().into_raw();
    Some(deflate(&rgb).map(|deflated_rgb| PhotoXObject {
        width,
        height,
        deflated_rgb,
    }))
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, PdfError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compose::INK;
    use crate::layout::font_metrics::a4_page;

    fn page_with(elements: Vec<Element>) -> Page {
        Page { index: 0, elements }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    /// The bytes a content stream holds for `text` shown in `font`.
    fn shown(font: FontFamily, text: &str) -> Vec<u8> {
        let mut content = Content::new();
        content.show(Str(&encode_text(get_metrics(font), text)));
        let mut bytes = content.finish();
        while bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        bytes
    }

    fn text_page(font: FontFamily, text: &str) -> Page {
        page_with(vec![Element::Text {
            x: 36.0,
            top: 36.0,
            size: 12.0,
            font,
            color: INK,
            text: text.to_string(),
        }])
    }

    #[test]
    fn test_write_pdf_has_header_and_text() {
        let bytes = write_pdf(&[text_page(FontFamily::SansBold, "Hello Resume")], &a4_page(), "Test").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, &shown(FontFamily::SansBold, "Hello Resume")));
        assert!(contains(&bytes, b"/DejaVuSansCondensed-Bold"));
        assert!(contains(&bytes, b"/Count 1"));
    }

    #[test]
    fn test_non_latin1_name_keeps_its_glyphs() {
        let name = "Łukasz Dvořák";
        let encoded = encode_text(get_metrics(FontFamily::SansBold), name);
        assert_eq!(encoded.len(), name.chars().count() * 2);
        assert!(encoded.chunks(2).all(|gid| gid != [0, 0]), "a character fell back to .notdef");

        let bytes = write_pdf(&[text_page(FontFamily::SansBold, name)], &a4_page(), name).unwrap();
        assert!(contains(&bytes, &shown(FontFamily::SansBold, name)));
        assert!(contains(&bytes, b"/Identity-H"));
        assert!(contains(&bytes, b"/CIDFontType2"));
        assert!(contains(&bytes, b"/FontFile2"));
        assert!(contains(&bytes, b"/ToUnicode"));
    }

    #[test]
    fn test_uncovered_character_still_exports() {
        let encoded = encode_text(get_metrics(FontFamily::Sans), "A\u{4e2d}");
        assert_eq!(&encoded[2..], &[0, 0]);
        let bytes = write_pdf(&[text_page(FontFamily::Sans, "A\u{4e2d}")], &a4_page(), "x").unwrap();
        assert!(contains(&bytes, &shown(FontFamily::Sans, "A\u{4e2d}")));
    }

    #[test]
    fn test_width_runs_group_consecutive_glyphs() {
        let metrics = get_metrics(FontFamily::Sans);
        let runs = width_runs([3u16, 4, 5, 9].into_iter(), metrics);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].0, 3);
        assert_eq!(runs[0].1.len(), 3);
        assert_eq!(runs[1], (9, vec![f32::from(metrics.glyph_advance(9))]));
    }

    #[test]
    fn test_write_pdf_rejects_empty() {
        assert!(matches!(write_pdf(&[], &a4_page(), "x"), Err(PdfError::NoPages)));
    }

    #[test]
    fn test_bad_photo_is_skipped() {
        let page = page_with(vec![Element::Image {
            x: 36.0,
            top: 36.0,
            size: 60.0,
            data_url: "data:image/png;base64,AAAA".to_string(),
        }]);
        let bytes = write_pdf(&[page], &a4_page(), "x").unwrap();
        assert!(!contains(&bytes, b"/Im1 Do"));
    }

    #[test]
    fn test_photo_is_embedded() {
        let url = crate::photo::crop_square_center(&tiny_png(), 16).unwrap();
        let page = page_with(vec![Element::Image {
            x: 36.0,
            top: 36.0,
            size: 60.0,
            data_url: url,
        }]);
        let bytes = write_pdf(&[page], &a4_page(), "x").unwrap();
        assert!(contains(&bytes, b"/Im1 Do"));
        assert!(contains(&bytes, b"/Subtype /Image"));
    }

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 20, 30]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }
}
