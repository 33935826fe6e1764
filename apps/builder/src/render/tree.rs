//! The visual tree: a theme-independent description of one resume page.
//!
//! Layout strategies only decide grouping (rows, columns, ordering). The block
//! contents come from the shared builders in `render::items`, which is what
//! keeps content identical across themes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::resume::Theme;

/// Uniform preview scale applied around the top-centre of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomTransform {
    pub scale: f64,
    pub origin: &'static str,
}

impl ZoomTransform {
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            origin: "top center",
        }
    }

    pub fn identity() -> Self {
        Self::new(1.0)
    }

    /// Maps a point of the unscaled page into preview space.
    /// The top-centre anchor `(page_width / 2, 0)` is the fixed point.
    pub fn apply(&self, x: f32, y: f32, page_width: f32) -> (f32, f32) {
        let s = self.scale as f32;
        let cx = page_width / 2.0;
        (cx + (x - cx) * s, y * s)
    }
}

/// Type scale family. Compact shrinks every size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Regular,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisualTree {
    pub theme: Theme,
    pub density: Density,
    pub transform: ZoomTransform,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub columns: Vec<Column>,
}

impl Row {
    pub fn full(blocks: Vec<Block>) -> Self {
        Row {
            columns: vec![Column::new(12, blocks)],
        }
    }

    pub fn split(columns: Vec<Column>) -> Self {
        Row { columns }
    }
}

/// One grid column. `span` is out of 12.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub span: u8,
    pub align: Align,
    /// Draws a tinted panel behind the column.
    pub panel: bool,
    pub blocks: Vec<Block>,
}

impl Column {
    pub fn new(span: u8, blocks: Vec<Block>) -> Self {
        Column {
            span,
            align: Align::Start,
            panel: false,
            blocks,
        }
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn panel(mut self) -> Self {
        self.panel = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Identity {
        name: String,
        title: String,
        name_size: f32,
    },
    Contact {
        items: Vec<String>,
        boxed: bool,
        /// One item per line instead of a wrapping row.
        stacked: bool,
    },
    Photo {
        data_url: String,
        size: f32,
    },
    Summary {
        text: String,
        /// Boxed summaries carry their own "Summary" label.
        boxed: bool,
    },
    Divider,
    Section {
        title: String,
        body: SectionBody,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum SectionBody {
    Skills(Vec<String>),
    Experience(Vec<ExperienceItem>),
    Education(Vec<EducationItem>),
    Projects(Vec<ProjectItem>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceItem {
    pub role: String,
    pub company: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationItem {
    pub school: String,
    pub degree: String,
    pub dates: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectItem {
    pub name: String,
    pub link: String,
    pub desc: String,
}

/// Content categories compared across themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ContentKind {
    Identity,
    Contact,
    Photo,
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
}

impl VisualTree {
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.rows
            .iter()
            .flat_map(|r| r.columns.iter())
            .flat_map(|c| c.blocks.iter())
    }

    /// Flattened text content per category, independent of spatial grouping.
    pub fn content(&self) -> BTreeMap<ContentKind, Vec<String>> {
        let mut out: BTreeMap<ContentKind, Vec<String>> = BTreeMap::new();
        for block in self.blocks() {
            match block {
                Block::Identity { name, title, .. } => out
                    .entry(ContentKind::Identity)
                    .or_default()
                    .extend([name.clone(), title.clone()]),
                Block::Contact { items, .. } => out
                    .entry(ContentKind::Contact)
                    .or_default()
                    .extend(items.iter().cloned()),
                Block::Photo { data_url, .. } => out
                    .entry(ContentKind::Photo)
                    .or_default()
                    .push(data_url.clone()),
                Block::Summary { text, .. } => out
                    .entry(ContentKind::Summary)
                    .or_default()
                    .push(text.clone()),
                Block::Divider => {}
                Block::Section { body, .. } => {
                    let (kind, texts) = body.texts();
                    out.entry(kind).or_default().extend(texts);
                }
            }
        }
        out
    }
}

impl SectionBody {
    fn texts(&self) -> (ContentKind, Vec<String>) {
        match self {
            SectionBody::Skills(items) => (ContentKind::Skills, items.clone()),
            SectionBody::Experience(items) => (
                ContentKind::Experience,
                items
                    .iter()
                    .flat_map(|x| {
                        [x.role.clone(), x.company.clone(), x.dates.clone()]
                            .into_iter()
                            .chain(x.bullets.iter().cloned())
                    })
                    .collect(),
            ),
            SectionBody::Education(items) => (
                ContentKind::Education,
                items
                    .iter()
                    .flat_map(|e| [e.school.clone(), e.degree.clone(), e.dates.clone()])
                    .collect(),
            ),
            SectionBody::Projects(items) => (
                ContentKind::Projects,
                items
                    .iter()
                    .flat_map(|p| [p.name.clone(), p.link.clone(), p.desc.clone()])
                    .collect(),
            ),
        }
    }
}
