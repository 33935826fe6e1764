//! HTML rendering of a visual tree for the live preview page.
//!
//! The page is a 12-column CSS grid inside a fixed A4 sheet. Zoom is a CSS
//! `transform: scale(z)` anchored at the top centre, so the sheet reflows
//! nothing when the zoom changes.

use std::fmt::Write;

use crate::render::tree::{Align, Block, Column, Density, SectionBody, VisualTree};

const STYLE: &str = r#"
body { margin: 0; background: #f1f5f9; font-family: 'DejaVu Sans Condensed', 'DejaVu Sans', Helvetica, Arial, sans-serif; color: #0f172a; }
.stage { display: flex; justify-content: center; padding: 24px 0; }
.sheet { width: 595.28pt; min-height: 841.89pt; box-sizing: border-box; padding: 36pt; background: #fff; box-shadow: 0 1px 3px rgba(15,23,42,.12); }
.row { display: grid; grid-template-columns: repeat(12, 1fr); column-gap: 24pt; margin-bottom: 16pt; }
.col.panel { background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 12px; padding: 14pt; }
.col > * + * { margin-top: 10pt; }
.align-center { text-align: center; }
.align-end { text-align: right; }
.name { font-weight: 700; margin: 0; }
.title { font-weight: 700; color: #475569; font-size: 11pt; margin: 2pt 0 0; }
.contact { display: flex; flex-wrap: wrap; gap: 4pt 14pt; font-size: 9pt; font-weight: 700; color: #475569; }
.contact.stacked { flex-direction: column; font-weight: 400; }
.boxed { background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 10px; padding: 9pt; }
.photo { border-radius: 12px; object-fit: cover; }
.summary { font-size: 10.5pt; color: #334155; line-height: 1.4; margin: 0; }
.label { font-size: 8pt; font-weight: 700; color: #64748b; text-transform: uppercase; letter-spacing: .08em; margin: 0 0 6pt; }
hr { border: 0; border-top: 1px solid #e2e8f0; }
.chips { display: flex; flex-wrap: wrap; gap: 5pt; }
.chip { font-size: 8.5pt; font-weight: 700; padding: 3pt 7pt; border: 1px solid #e2e8f0; background: #f8fafc; border-radius: 999px; }
.item + .item { margin-top: 12pt; }
.item-head { display: flex; justify-content: space-between; gap: 10pt; font-size: 11pt; font-weight: 700; }
.dates, .link { font-size: 9pt; font-weight: 700; color: #64748b; white-space: nowrap; }
.item ul { margin: 4pt 0 0; padding-left: 12pt; font-size: 10.5pt; color: #334155; }
.item p { margin: 3pt 0 0; font-size: 10.5pt; color: #334155; }
.compact .summary, .compact .item ul, .compact .item p { font-size: 9.75pt; }
.compact .row { margin-bottom: 12pt; }
"#;

/// A complete HTML document showing the tree at its zoom.
pub fn render_html(tree: &VisualTree) -> String {
    let mut body = String::new();
    for row in &tree.rows {
        body.push_str("<div class=\"row\">");
        for column in &row.columns {
            write_column(&mut body, column);
        }
        body.push_str("</div>");
    }

    let density = match tree.density {
        Density::Regular => "regular",
        Density::Compact => "compact",
    };

    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Resume preview | {label}</title><style>{STYLE}</style></head>\
         <body><div class=\"stage\"><div class=\"sheet theme-{theme} {density}\" style=\"transform: scale({scale}); transform-origin: {origin};\">{body}</div></div></body></html>",
        theme = tree.theme.key(),
        label = tree.theme.label(),
        scale = tree.transform.scale,
        origin = tree.transform.origin,
    )
}

fn write_column(out: &mut String, column: &Column) {
    let align = match column.align {
        Align::Start => "",
        Align::Center => " align-center",
        Align::End => " align-end",
    };
    let panel = if column.panel { " panel" } else { "" };
    let _ = write!(
        out,
        "<div class=\"col{panel}{align}\" style=\"grid-column: span {}\">",
        column.span
    );
    for block in &column.blocks {
        write_block(out, block);
    }
    out.push_str("</div>");
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Identity {
            name,
            title,
            name_size,
        } => {
            let _ = write!(
                out,
                "<div><h1 class=\"name\" style=\"font-size: {name_size}pt\">{}</h1><p class=\"title\">{}</p></div>",
                escape(name),
                escape(title)
            );
        }
        Block::Contact {
            items,
            boxed,
            stacked,
        } => {
            if items.is_empty() {
                return;
            }
            let _ = write!(
                out,
                "<div class=\"contact{}{}\">",
                if *boxed { " boxed" } else { "" },
                if *stacked { " stacked" } else { "" }
            );
            for item in items {
                let _ = write!(out, "<span>{}</span>", escape(item));
            }
            out.push_str("</div>");
        }
        Block::Photo { data_url, size } => {
            let _ = write!(
                out,
                "<img class=\"photo\" alt=\"Profile\" width=\"{size}\" height=\"{size}\" style=\"width: {size}pt; height: {size}pt\" src=\"{}\">",
                escape(data_url)
            );
        }
        Block::Summary { text, boxed } => {
            if *boxed {
                let _ = write!(
                    out,
                    "<div class=\"boxed\"><p class=\"label\">Summary</p><p class=\"summary\">{}</p></div>",
                    escape(text)
                );
            } else {
                let _ = write!(out, "<p class=\"summary\">{}</p>", escape(text));
            }
        }
        Block::Divider => out.push_str("<hr>"),
        Block::Section { title, body } => {
            let _ = write!(out, "<section><p class=\"label\">{}</p>", escape(title));
            write_section_body(out, body);
            out.push_str("</section>");
        }
    }
}

fn write_section_body(out: &mut String, body: &SectionBody) {
    match body {
        SectionBody::Skills(items) => {
            out.push_str("<div class=\"chips\">");
            for skill in items {
                let _ = write!(out, "<span class=\"chip\">{}</span>", escape(skill));
            }
            out.push_str("</div>");
        }
        SectionBody::Experience(items) => {
            for x in items {
                let _ = write!(
                    out,
                    "<div class=\"item\"><div class=\"item-head\"><span>{} &middot; {}</span><span class=\"dates\">{}</span></div>",
                    escape(&x.role),
                    escape(&x.company),
                    escape(&x.dates)
                );
                if !x.bullets.is_empty() {
                    out.push_str("<ul>");
                    for b in &x.bullets {
                        let _ = write!(out, "<li>{}</li>", escape(b));
                    }
                    out.push_str("</ul>");
                }
                out.push_str("</div>");
            }
        }
        SectionBody::Education(items) => {
            for e in items {
                let _ = write!(
                    out,
                    "<div class=\"item\"><div class=\"item-head\"><span>{}</span><span class=\"dates\">{}</span></div><p>{}</p></div>",
                    escape(&e.school),
                    escape(&e.dates),
                    escape(&e.degree)
                );
            }
        }
        SectionBody::Projects(items) => {
            for p in items {
                let _ = write!(
                    out,
                    "<div class=\"item\"><div class=\"item-head\"><span>{}</span><span class=\"link\">{}</span></div>",
                    escape(&p.name),
                    escape(&p.link)
                );
                if !p.desc.is_empty() {
                    let _ = write!(out, "<p>{}</p>", escape(&p.desc));
                }
                out.push_str("</div>");
            }
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_resume;
    use crate::models::resume::Theme;
    use crate::render::layouts::render;

    #[test]
    fn test_html_carries_zoom_transform() {
        let mut doc = default_resume();
        doc.settings.zoom = 1.2;
        let html = render_html(&render(&doc));
        assert!(html.contains("transform: scale(1.2)"));
        assert!(html.contains("transform-origin: top center"));
    }

    #[test]
    fn test_html_escapes_user_text() {
        let mut doc = default_resume();
        doc.basics.full_name = "<script>alert('x')</script>".to_string();
        let html = render_html(&render(&doc));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_html_marks_theme_and_sections() {
        let mut doc = default_resume();
        doc.theme = Theme::Sidebar;
        let html = render_html(&render(&doc));
        assert!(html.contains("theme-sidebar"));
        assert!(html.contains("col panel align-center"));
        assert!(html.contains("<li>Built responsive UI components and improved user experience.</li>"));
    }
}
