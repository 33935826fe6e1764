//! Composition: positions a visual tree on a single tall page canvas.
//!
//! Coordinates are PDF points with the origin at the top-left of the first
//! page and `y` growing downwards. Pagination happens afterwards.

use serde::Serialize;

use crate::layout::font_metrics::{get_metrics, FontFamily, PageGeometry};
use crate::layout::wrap::wrap_text;
use crate::render::tree::{
    Align, Block, Column, Density, EducationItem, ExperienceItem, ProjectItem, SectionBody,
    VisualTree, ZoomTransform,
};

/// Line box height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.4;
const COLUMN_GAP: f32 = 24.0;
const PANEL_PADDING: f32 = 14.0;
const BOX_PADDING: f32 = 9.0;

// ────────────────────────────────────────────────────────────────────────────
// Elements
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    const fn hex(v: u32) -> Rgb {
        Rgb(
            ((v >> 16) & 0xff) as f32 / 255.0,
            ((v >> 8) & 0xff) as f32 / 255.0,
            (v & 0xff) as f32 / 255.0,
        )
    }
}

pub const INK: Rgb = Rgb::hex(0x0f172a);
pub const BODY: Rgb = Rgb::hex(0x334155);
pub const SUBTLE: Rgb = Rgb::hex(0x475569);
pub const MUTED: Rgb = Rgb::hex(0x64748b);
pub const PANEL: Rgb = Rgb::hex(0xf8fafc);
pub const BORDER: Rgb = Rgb::hex(0xe2e8f0);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Text {
        x: f32,
        top: f32,
        size: f32,
        font: FontFamily,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f32,
        top: f32,
        width: f32,
        height: f32,
        fill: Rgb,
        stroke: Option<Rgb>,
    },
    Rule {
        x: f32,
        top: f32,
        width: f32,
        color: Rgb,
    },
    Image {
        x: f32,
        top: f32,
        size: f32,
        data_url: String,
    },
}

impl Element {
    pub fn top(&self) -> f32 {
        match self {
            Element::Text { top, .. }
            | Element::Rect { top, .. }
            | Element::Rule { top, .. }
            | Element::Image { top, .. } => *top,
        }
    }

    pub fn bottom(&self) -> f32 {
        match self {
            Element::Text { top, size, .. } => top + size * LINE_HEIGHT,
            Element::Rect { top, height, .. } => top + height,
            Element::Rule { top, .. } => *top,
            Element::Image { top, size, .. } => top + size,
        }
    }

    /// Background boxes may be cut across pages; text lines and images may not.
    pub fn is_breakable(&self) -> bool {
        matches!(self, Element::Rect { .. })
    }

    pub fn translated(&self, dy: f32) -> Element {
        let mut e = self.clone();
        match &mut e {
            Element::Text { top, .. }
            | Element::Rect { top, .. }
            | Element::Rule { top, .. }
            | Element::Image { top, .. } => *top += dy,
        }
        e
    }

    /// Maps the element into preview space.
    pub fn scaled(&self, transform: &ZoomTransform, page_width: f32) -> Element {
        let s = transform.scale as f32;
        let mut e = self.clone();
        match &mut e {
            Element::Text { x, top, size, .. } => {
                (*x, *top) = transform.apply(*x, *top, page_width);
                *size *= s;
            }
            Element::Rect {
                x,
                top,
                width,
                height,
                ..
            } => {
                (*x, *top) = transform.apply(*x, *top, page_width);
                *width *= s;
                *height *= s;
            }
            Element::Rule { x, top, width, .. } => {
                (*x, *top) = transform.apply(*x, *top, page_width);
                *width *= s;
            }
            Element::Image { x, top, size, .. } => {
                (*x, *top) = transform.apply(*x, *top, page_width);
                *size *= s;
            }
        }
        e
    }
}

/// One tall page holding every composed element.
#[derive(Debug, Clone, Serialize)]
pub struct Canvas {
    pub width: f32,
    /// Bottom of the last element plus the bottom margin.
    pub height: f32,
    pub elements: Vec<Element>,
}

impl Canvas {
    pub fn text_runs(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Type scale
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct TypeScale {
    body: f32,
    small: f32,
    label: f32,
    item: f32,
    title: f32,
    chip: f32,
    block_gap: f32,
    section_gap: f32,
    item_gap: f32,
    row_gap: f32,
}

impl TypeScale {
    fn for_density(density: Density) -> Self {
        match density {
            Density::Regular => TypeScale {
                body: 10.5,
                small: 9.0,
                label: 8.0,
                item: 11.0,
                title: 11.0,
                chip: 8.5,
                block_gap: 10.0,
                section_gap: 20.0,
                item_gap: 12.0,
                row_gap: 16.0,
            },
            Density::Compact => TypeScale {
                body: 9.75,
                small: 8.25,
                label: 7.5,
                item: 10.5,
                title: 9.0,
                chip: 8.0,
                block_gap: 8.0,
                section_gap: 16.0,
                item_gap: 9.0,
                row_gap: 12.0,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

/// Composes the tree at scale 1. The zoom transform is never applied here.
pub fn compose(tree: &VisualTree, geometry: &PageGeometry) -> Canvas {
    let mut composer = Composer {
        scale: TypeScale::for_density(tree.density),
        elements: Vec::new(),
    };

    let x0 = geometry.margin_pt;
    let content_width = geometry.content_width();
    let mut y = geometry.margin_pt;

    for row in &tree.rows {
        let total_span: f32 = row.columns.iter().map(|c| c.span as f32).sum::<f32>().max(1.0);
        let gaps = COLUMN_GAP * row.columns.len().saturating_sub(1) as f32;
        let available = content_width - gaps;

        let mut x = x0;
        let mut bottom = y;
        for column in &row.columns {
            let width = available * column.span as f32 / total_span;
            bottom = bottom.max(composer.column(column, x, y, width));
            x += width + COLUMN_GAP;
        }
        if bottom > y {
            y = bottom + composer.scale.row_gap;
        }
    }

    let content_bottom = composer
        .elements
        .iter()
        .map(Element::bottom)
        .fold(geometry.margin_pt, f32::max);

    Canvas {
        width: geometry.width_pt,
        height: content_bottom + geometry.margin_pt,
        elements: composer.elements,
    }
}

/// Composes the tree and maps it through the preview zoom transform.
pub fn compose_preview(tree: &VisualTree, geometry: &PageGeometry) -> Canvas {
    let canvas = compose(tree, geometry);
    let s = tree.transform.scale as f32;
    Canvas {
        width: canvas.width,
        height: canvas.height * s,
        elements: canvas
            .elements
            .iter()
            .map(|e| e.scaled(&tree.transform, geometry.width_pt))
            .collect(),
    }
}

struct Composer {
    scale: TypeScale,
    elements: Vec<Element>,
}

impl Composer {
    fn column(&mut self, column: &Column, x: f32, y: f32, width: f32) -> f32 {
        let (inner_x, inner_y, inner_w) = if column.panel {
            (x + PANEL_PADDING, y + PANEL_PADDING, width - 2.0 * PANEL_PADDING)
        } else {
            (x, y, width)
        };
        let panel_slot = self.elements.len();

        let mut cursor = inner_y;
        for (i, block) in column.blocks.iter().enumerate() {
            if i > 0 {
                cursor += self.gap_before(block);
            }
            cursor = self.block(block, inner_x, cursor, inner_w, column.align);
        }

        if column.panel && !column.blocks.is_empty() {
            let bottom = cursor + PANEL_PADDING;
            self.elements.insert(
                panel_slot,
                Element::Rect {
                    x,
                    top: y,
                    width,
                    height: bottom - y,
                    fill: PANEL,
                    stroke: Some(BORDER),
                },
            );
            return bottom;
        }
        cursor
    }

    fn gap_before(&self, block: &Block) -> f32 {
        match block {
            Block::Section { .. } | Block::Divider | Block::Summary { boxed: true, .. } => {
                self.scale.section_gap
            }
            _ => self.scale.block_gap,
        }
    }

    fn block(&mut self, block: &Block, x: f32, y: f32, width: f32, align: Align) -> f32 {
        let s = self.scale;
        match block {
            Block::Identity {
                name,
                title,
                name_size,
            } => {
                let y = self.text(name, FontFamily::SansBold, *name_size, INK, x, y, width, align);
                self.text(title, FontFamily::SansBold, s.title, SUBTLE, x, y + 2.0, width, align)
            }
            Block::Contact {
                items,
                boxed,
                stacked,
            } => self.contact(items, *boxed, *stacked, x, y, width, align),
            Block::Photo { data_url, size } => {
                let size = size.min(width);
                let px = aligned_x(x, width, size, align);
                self.elements.push(Element::Image {
                    x: px,
                    top: y,
                    size,
                    data_url: data_url.clone(),
                });
                y + size
            }
            Block::Summary { text, boxed } => {
                if !*boxed {
                    return self.text(text, FontFamily::Sans, s.body, BODY, x, y, width, align);
                }
                let slot = self.elements.len();
                let inner_w = width - 2.0 * BOX_PADDING;
                let mut cy = self.text(
                    "SUMMARY",
                    FontFamily::SansBold,
                    s.label,
                    MUTED,
                    x + BOX_PADDING,
                    y + BOX_PADDING,
                    inner_w,
                    Align::Start,
                );
                cy = self.text(
                    text,
                    FontFamily::Sans,
                    s.body,
                    BODY,
                    x + BOX_PADDING,
                    cy + 4.0,
                    inner_w,
                    Align::Start,
                );
                let bottom = cy + BOX_PADDING;
                self.boxed(slot, x, y, width, bottom);
                bottom
            }
            Block::Divider => {
                self.elements.push(Element::Rule {
                    x,
                    top: y,
                    width,
                    color: BORDER,
                });
                y + 1.0
            }
            Block::Section { title, body } => {
                let y = self.text(
                    &title.to_uppercase(),
                    FontFamily::SansBold,
                    s.label,
                    MUTED,
                    x,
                    y,
                    width,
                    align,
                ) + 6.0;
                match body {
                    SectionBody::Skills(items) => self.chips(items, x, y, width),
                    SectionBody::Experience(items) => self.experience(items, x, y, width),
                    SectionBody::Education(items) => self.education(items, x, y, width),
                    SectionBody::Projects(items) => self.projects(items, x, y, width),
                }
            }
        }
    }

    /// Wraps and places text, returning the `y` below the last line.
    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        text: &str,
        font: FontFamily,
        size: f32,
        color: Rgb,
        x: f32,
        y: f32,
        width: f32,
        align: Align,
    ) -> f32 {
        let metrics = get_metrics(font);
        let mut y = y;
        for line in wrap_text(text, metrics, size, width) {
            let w = metrics.width_pt(&line, size);
            self.elements.push(Element::Text {
                x: aligned_x(x, width, w, align),
                top: y,
                size,
                font,
                color,
                text: line,
            });
            y += size * LINE_HEIGHT;
        }
        y
    }

    fn boxed(&mut self, slot: usize, x: f32, top: f32, width: f32, bottom: f32) {
        self.elements.insert(
            slot,
            Element::Rect {
                x,
                top,
                width,
                height: bottom - top,
                fill: PANEL,
                stroke: Some(BORDER),
            },
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn contact(
        &mut self,
        items: &[String],
        boxed: bool,
        stacked: bool,
        x: f32,
        y: f32,
        width: f32,
        align: Align,
    ) -> f32 {
        if items.is_empty() {
            return y;
        }
        let size = self.scale.small;
        let line_h = size * LINE_HEIGHT;
        let slot = self.elements.len();
        let pad = if boxed { BOX_PADDING } else { 0.0 };
        let (ix, iw) = (x + pad, width - 2.0 * pad);
        let mut cy = y + pad;

        if stacked {
            for item in items {
                cy = self.text(item, FontFamily::Sans, size, BODY, ix, cy, iw, align);
            }
        } else {
            let metrics = get_metrics(FontFamily::SansBold);
            let mut cx = ix;
            for item in items {
                let w = metrics.width_pt(item, size);
                if w > iw {
                    if cx > ix {
                        cy += line_h;
                    }
                    cy = self.text(item, FontFamily::SansBold, size, SUBTLE, ix, cy, iw, Align::Start);
                    cx = ix;
                    continue;
                }
                if cx > ix && cx + w > ix + iw {
                    cy += line_h;
                    cx = ix;
                }
                self.elements.push(Element::Text {
                    x: cx,
                    top: cy,
                    size,
                    font: FontFamily::SansBold,
                    color: SUBTLE,
                    text: item.clone(),
                });
                cx += w + 14.0;
            }
            if cx > ix {
                cy += line_h;
            }
        }

        let bottom = cy + pad;
        if boxed {
            self.boxed(slot, x, y, width, bottom);
        }
        bottom
    }

    fn chips(&mut self, items: &[String], x: f32, y: f32, width: f32) -> f32 {
        if items.is_empty() {
            return y;
        }
        let size = self.scale.chip;
        let metrics = get_metrics(FontFamily::SansBold);
        let (pad_x, pad_y, gap) = (7.0, 3.0, 5.0);
        let chip_h = size * LINE_HEIGHT + 2.0 * pad_y;

        let mut cx = x;
        let mut cy = y;
        for item in items {
            let chip_w = (metrics.width_pt(item, size) + 2.0 * pad_x).min(width);
            if cx > x && cx + chip_w > x + width {
                cx = x;
                cy += chip_h + gap;
            }
            self.elements.push(Element::Rect {
                x: cx,
                top: cy,
                width: chip_w,
                height: chip_h,
                fill: PANEL,
                stroke: Some(BORDER),
            });
            self.elements.push(Element::Text {
                x: cx + pad_x,
                top: cy + pad_y,
                size,
                font: FontFamily::SansBold,
                color: BODY,
                text: item.clone(),
            });
            cx += chip_w + gap;
        }
        cy + chip_h
    }

    /// Places `dates` flush right on the heading line and returns the width left for the heading.
    fn trailing_dates(&mut self, dates: &str, x: f32, y: f32, width: f32) -> f32 {
        if dates.is_empty() {
            return width;
        }
        let size = self.scale.small;
        let w = get_metrics(FontFamily::SansBold).width_pt(dates, size);
        self.elements.push(Element::Text {
            x: x + width - w,
            top: y + 1.0,
            size,
            font: FontFamily::SansBold,
            color: MUTED,
            text: dates.to_string(),
        });
        (width - w - 10.0).max(width * 0.5)
    }

    fn experience(&mut self, items: &[ExperienceItem], x: f32, y: f32, width: f32) -> f32 {
        let s = self.scale;
        let mut y = y;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                y += s.item_gap;
            }
            let heading_w = self.trailing_dates(&item.dates, x, y, width);
            let heading = format!("{} \u{00b7} {}", item.role, item.company);
            y = self.text(&heading, FontFamily::SansBold, s.item, INK, x, y, heading_w, Align::Start);

            if !item.bullets.is_empty() {
                y += 4.0;
            }
            for bullet in &item.bullets {
                self.elements.push(Element::Text {
                    x: x + 2.0,
                    top: y,
                    size: s.body,
                    font: FontFamily::Sans,
                    color: BODY,
                    text: "\u{2022}".to_string(),
                });
                y = self.text(bullet, FontFamily::Sans, s.body, BODY, x + 12.0, y, width - 12.0, Align::Start) + 2.0;
            }
        }
        y
    }

    fn education(&mut self, items: &[EducationItem], x: f32, y: f32, width: f32) -> f32 {
        let s = self.scale;
        let mut y = y;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                y += s.item_gap;
            }
            let heading_w = self.trailing_dates(&item.dates, x, y, width);
            y = self.text(&item.school, FontFamily::SansBold, s.item, INK, x, y, heading_w, Align::Start);
            y = self.text(&item.degree, FontFamily::Sans, s.body, BODY, x, y + 1.0, heading_w, Align::Start);
        }
        y
    }

    fn projects(&mut self, items: &[ProjectItem], x: f32, y: f32, width: f32) -> f32 {
        let s = self.scale;
        let bold = get_metrics(FontFamily::SansBold);
        let mut y = y;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                y += s.item_gap;
            }
            let name_w = bold.width_pt(&item.name, s.item);
            let link_w = bold.width_pt(&item.link, s.small);
            let link_inline = !item.link.is_empty() && name_w + link_w + 10.0 <= width;

            if link_inline {
                self.elements.push(Element::Text {
                    x: x + width - link_w,
                    top: y + 1.0,
                    size: s.small,
                    font: FontFamily::SansBold,
                    color: MUTED,
                    text: item.link.clone(),
                });
            }
            y = self.text(&item.name, FontFamily::SansBold, s.item, INK, x, y, width, Align::Start);
            if !link_inline && !item.link.is_empty() {
                y = self.text(&item.link, FontFamily::SansBold, s.small, MUTED, x, y, width, Align::Start);
            }
            if !item.desc.is_empty() {
                y = self.text(&item.desc, FontFamily::Sans, s.body, BODY, x, y + 3.0, width, Align::Start);
            }
        }
        y
    }
}

fn aligned_x(x: f32, width: f32, content_width: f32, align: Align) -> f32 {
    match align {
        Align::Start => x,
        Align::Center => x + (width - content_width).max(0.0) / 2.0,
        Align::End => x + (width - content_width).max(0.0),
    }
}
