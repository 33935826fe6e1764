//! The four layout strategies and the single dispatch point that selects one.

use crate::models::resume::{ResumeDocument, SectionKey, Theme};
use crate::render::items;
use crate::render::tree::{Align, Block, Column, Density, Row, VisualTree, ZoomTransform};

/// Arranges a document into a visual tree. Implementations differ only in
/// spatial grouping; block contents always come from `render::items`.
pub trait LayoutStrategy: Send + Sync {
    fn theme(&self) -> Theme;
    fn render(&self, doc: &ResumeDocument) -> VisualTree;
}

pub struct SplitLayout;
pub struct SidebarLayout;
pub struct ClassicLayout;
pub struct CompactLayout;

/// The one place a theme is mapped to its strategy.
pub fn select_layout(theme: Theme) -> &'static dyn LayoutStrategy {
    match theme {
        Theme::Split => &SplitLayout,
        Theme::Sidebar => &SidebarLayout,
        Theme::Classic => &ClassicLayout,
        Theme::Compact => &CompactLayout,
    }
}

/// Renders the preview tree, carrying the document's zoom.
pub fn render(doc: &ResumeDocument) -> VisualTree {
    select_layout(doc.theme).render(doc)
}

/// Renders the tree used for export: same content, zoom forced to 1.
pub fn render_for_export(doc: &ResumeDocument) -> VisualTree {
    VisualTree {
        transform: ZoomTransform::identity(),
        ..render(doc)
    }
}

fn page(doc: &ResumeDocument, theme: Theme, density: Density, rows: Vec<Row>) -> VisualTree {
    VisualTree {
        theme,
        density,
        transform: ZoomTransform::new(doc.settings.zoom),
        rows,
    }
}

fn photo_column(doc: &ResumeDocument, size: f32) -> Column {
    Column::new(3, items::photo(doc, size).into_iter().collect()).aligned(Align::End)
}

impl LayoutStrategy for SplitLayout {
    fn theme(&self) -> Theme {
        Theme::Split
    }

    fn render(&self, doc: &ResumeDocument) -> VisualTree {
        let header = Row::split(vec![
            Column::new(9, vec![items::identity(doc, 25.5), items::contact(doc, true, false)]),
            photo_column(doc, 70.5),
        ]);

        let mut intro: Vec<Block> = items::summary(doc, false).into_iter().collect();
        intro.push(Block::Divider);

        let mut left = vec![items::skills(doc)];
        left.extend(items::in_section_order(doc, &[SectionKey::Projects]));
        let right =
            items::in_section_order(doc, &[SectionKey::Experience, SectionKey::Education]);

        page(
            doc,
            Theme::Split,
            Density::Regular,
            vec![
                header,
                Row::full(intro),
                Row::split(vec![Column::new(5, left), Column::new(7, right)]),
            ],
        )
    }
}

impl LayoutStrategy for SidebarLayout {
    fn theme(&self) -> Theme {
        Theme::Sidebar
    }

    fn render(&self, doc: &ResumeDocument) -> VisualTree {
        let mut panel: Vec<Block> = items::photo(doc, 84.0).into_iter().collect();
        panel.push(items::identity(doc, 13.5));
        panel.push(items::contact(doc, false, true));
        panel.push(Block::Divider);
        panel.push(items::skills(doc));

        let main: Vec<Block> = doc
            .section_order()
            .into_iter()
            .filter_map(|key| items::ordered_section(doc, key, true))
            .collect();

        page(
            doc,
            Theme::Sidebar,
            Density::Regular,
            vec![Row::split(vec![
                Column::new(4, panel).aligned(Align::Center).panel(),
                Column::new(8, main),
            ])],
        )
    }
}

impl LayoutStrategy for ClassicLayout {
    fn theme(&self) -> Theme {
        Theme::Classic
    }

    fn render(&self, doc: &ResumeDocument) -> VisualTree {
        let header = Row::split(vec![
            Column::new(9, vec![items::identity(doc, 28.5)]),
            photo_column(doc, 70.5),
        ]);

        let mut body = vec![items::contact(doc, false, false)];
        body.extend(items::summary(doc, false));
        body.push(Block::Divider);
        body.extend(items::in_section_order(doc, &[SectionKey::Experience]));

        let mut right = vec![items::skills(doc)];
        right.extend(items::in_section_order(doc, &[SectionKey::Education]));

        page(
            doc,
            Theme::Classic,
            Density::Regular,
            vec![
                header,
                Row::full(body),
                Row::split(vec![
                    Column::new(6, items::in_section_order(doc, &[SectionKey::Projects])),
                    Column::new(6, right),
                ]),
            ],
        )
    }
}

impl LayoutStrategy for CompactLayout {
    fn theme(&self) -> Theme {
        Theme::Compact
    }

    fn render(&self, doc: &ResumeDocument) -> VisualTree {
        let header = Row::split(vec![
            Column::new(9, vec![items::identity(doc, 19.5), items::contact(doc, false, false)]),
            photo_column(doc, 55.5),
        ]);

        let mut left = vec![items::skills(doc)];
        left.extend(items::in_section_order(doc, &[SectionKey::Education]));
        let right =
            items::in_section_order(doc, &[SectionKey::Experience, SectionKey::Projects]);

        page(
            doc,
            Theme::Compact,
            Density::Compact,
            vec![
                header,
                Row::full(items::summary(doc, false).into_iter().collect()),
                Row::split(vec![Column::new(4, left), Column::new(8, right)]),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_resume;
    use crate::normalize::clean;
    use crate::render::tree::ContentKind;

    fn doc_with_photo() -> ResumeDocument {
        let mut doc = default_resume();
        doc.basics.photo_data_url = "data:image/png;base64,AAAA".to_string();
        doc.projects[0].link = "https://www.reaplaylist.vercel.app/app".to_string();
        doc
    }

    #[test]
    fn test_select_layout_matches_theme() {
        for theme in Theme::ALL {
            assert_eq!(select_layout(theme).theme(), theme);
        }
    }

    #[test]
    fn test_content_parity_across_themes() {
        let mut doc = doc_with_photo();
        doc.theme = Theme::Split;
        let reference = render(&doc).content();
        assert!(reference.contains_key(&ContentKind::Photo));
        assert!(reference.contains_key(&ContentKind::Summary));

        for theme in Theme::ALL {
            doc.theme = theme;
            assert_eq!(render(&doc).content(), reference, "content differs for {theme:?}");
        }
    }

    #[test]
    fn test_content_parity_with_custom_section_order() {
        let mut doc = clean(&doc_with_photo());
        doc.sections = vec![SectionKey::Education, SectionKey::Summary];
        let mut doc = clean(&doc);
        let reference = render(&doc).content();
        for theme in Theme::ALL {
            doc.theme = theme;
            assert_eq!(render(&doc).content(), reference);
        }
    }

    #[test]
    fn test_hidden_photo_absent_in_all_themes() {
        let mut doc = doc_with_photo();
        doc.settings.show_photo = false;
        for theme in Theme::ALL {
            doc.theme = theme;
            assert!(!render(&doc).content().contains_key(&ContentKind::Photo));
        }
    }

    #[test]
    fn test_short_links_render_domain() {
        let mut doc = doc_with_photo();
        doc.settings.show_full_project_links = false;
        let content = render(&doc).content();
        assert!(content[&ContentKind::Projects].contains(&"reaplaylist.vercel.app".to_string()));
    }

    #[test]
    fn test_empty_sections_omitted() {
        let mut doc = default_resume();
        doc.experience.clear();
        doc.projects.clear();
        doc.education.clear();
        doc.basics.summary.clear();
        for theme in Theme::ALL {
            doc.theme = theme;
            let content = render(&doc).content();
            assert!(!content.contains_key(&ContentKind::Experience));
            assert!(!content.contains_key(&ContentKind::Summary));
            assert!(content.contains_key(&ContentKind::Skills));
        }
    }

    #[test]
    fn test_sidebar_follows_section_order() {
        let mut doc = default_resume();
        doc.theme = Theme::Sidebar;
        doc.sections = vec![
            SectionKey::Education,
            SectionKey::Projects,
            SectionKey::Experience,
            SectionKey::Summary,
        ];
        let tree = render(&doc);
        let main = &tree.rows[0].columns[1].blocks;
        assert!(matches!(&main[0], Block::Section { title, .. } if title == "Education"));
        assert!(matches!(main.last(), Some(Block::Summary { boxed: true, .. })));
    }

    #[test]
    fn test_export_tree_ignores_zoom() {
        let mut doc = default_resume();
        doc.settings.zoom = 0.8;
        assert_eq!(render(&doc).transform.scale, 0.8);
        assert_eq!(render_for_export(&doc).transform.scale, 1.0);
    }
}
