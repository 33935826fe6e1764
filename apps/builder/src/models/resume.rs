use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// The four visual arrangements of the same resume content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Two-column body under a full-width header.
    #[default]
    Split,
    /// Left panel with identity and skills, ordered sections on the right.
    Sidebar,
    /// Top header, full-width experience, two-column tail.
    Classic,
    /// Dense type scale with a narrow left column.
    Compact,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Split, Theme::Sidebar, Theme::Classic, Theme::Compact];

    /// Parses a stored theme key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "split" => Some(Theme::Split),
            "sidebar" => Some(Theme::Sidebar),
            "classic" => Some(Theme::Classic),
            "compact" => Some(Theme::Compact),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Theme::Split => "split",
            Theme::Sidebar => "sidebar",
            Theme::Classic => "classic",
            Theme::Compact => "compact",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Split => "Split (Modern)",
            Theme::Sidebar => "Sidebar (Left)",
            Theme::Classic => "Classic (Top Header)",
            Theme::Compact => "Compact (Dense)",
        }
    }
}

/// Keys of the user-orderable content sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Summary,
    Experience,
    Projects,
    Education,
}

impl SectionKey {
    /// Canonical order used whenever the stored order is empty or unusable.
    pub const CANONICAL: [SectionKey; 4] = [
        SectionKey::Summary,
        SectionKey::Experience,
        SectionKey::Projects,
        SectionKey::Education,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "summary" => Some(SectionKey::Summary),
            "experience" => Some(SectionKey::Experience),
            "projects" => Some(SectionKey::Projects),
            "education" => Some(SectionKey::Education),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionKey::Summary => "Summary",
            SectionKey::Experience => "Experience",
            SectionKey::Projects => "Projects",
            SectionKey::Education => "Education",
        }
    }
}

pub fn canonical_sections() -> Vec<SectionKey> {
    SectionKey::CANONICAL.to_vec()
}

// ────────────────────────────────────────────────────────────────────────────
// Settings
// ────────────────────────────────────────────────────────────────────────────

pub const MIN_ZOOM: f64 = 0.8;
pub const MAX_ZOOM: f64 = 1.2;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Display and export preferences carried inside the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Preview scale, always within `[MIN_ZOOM, MAX_ZOOM]` after cleaning.
    pub zoom: f64,
    pub show_photo: bool,
    /// Full URL when true, bare domain when false.
    pub show_full_project_links: bool,
    pub file_base_name: String,
    pub include_date_in_filename: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            show_photo: true,
            show_full_project_links: true,
            file_base_name: String::new(),
            include_date_in_filename: false,
        }
    }
}

/// Clamps a zoom value into the supported range. Non-finite input resets to 1.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        DEFAULT_ZOOM
    }
}

/// Partial settings update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub zoom: Option<f64>,
    pub show_photo: Option<bool>,
    pub show_full_project_links: Option<bool>,
    pub file_base_name: Option<String>,
    pub include_date_in_filename: Option<bool>,
}

impl Settings {
    pub fn merge(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            zoom: patch.zoom.map(clamp_zoom).unwrap_or(self.zoom),
            show_photo: patch.show_photo.unwrap_or(self.show_photo),
            show_full_project_links: patch
                .show_full_project_links
                .unwrap_or(self.show_full_project_links),
            file_base_name: patch
                .file_base_name
                .clone()
                .unwrap_or_else(|| self.file_base_name.clone()),
            include_date_in_filename: patch
                .include_date_in_filename
                .unwrap_or(self.include_date_in_filename),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Content records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basics {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub summary: String,
    /// Embedded `data:` URL of the square photo, or empty.
    pub photo_data_url: String,
}

impl Basics {
    /// Contact line items in display order.
    pub fn contact_items(&self) -> [&str; 4] {
        [&self.email, &self.phone, &self.location, &self.website]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub start: String,
    pub end: String,
    pub bullets: Vec<String>,
}

impl Default for ExperienceEntry {
    fn default() -> Self {
        Self {
            company: String::new(),
            role: String::new(),
            start: String::new(),
            end: String::new(),
            bullets: vec![String::new()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub link: String,
    pub desc: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Root document
// ────────────────────────────────────────────────────────────────────────────

/// The complete user-editable resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub theme: Theme,
    pub sections: Vec<SectionKey>,
    pub settings: Settings,
    pub basics: Basics,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
}

impl ResumeDocument {
    /// An empty document with default settings and canonical section order.
    #[cfg(test)]
    pub fn blank() -> Self {
        Self {
            theme: Theme::default(),
            sections: canonical_sections(),
            settings: Settings::default(),
            basics: Basics::default(),
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            projects: Vec::new(),
        }
    }

    /// Section order as rendered: the stored order, or canonical when empty.
    pub fn section_order(&self) -> Vec<SectionKey> {
        if self.sections.is_empty() {
            canonical_sections()
        } else {
            self.sections.clone()
        }
    }

    pub fn has_photo(&self) -> bool {
        self.settings.show_photo && !self.basics.photo_data_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_serde_lowercase() {
        let json = serde_json::to_string(&Theme::Sidebar).unwrap();
        assert_eq!(json, "\"sidebar\"");
        let back: Theme = serde_json::from_str("\"compact\"").unwrap();
        assert_eq!(back, Theme::Compact);
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["showFullProjectLinks"], true);
        assert_eq!(json["includeDateInFilename"], false);
        assert_eq!(json["fileBaseName"], "");
    }

    #[test]
    fn test_settings_merge_clamps_zoom() {
        let merged = Settings::default().merge(&SettingsPatch {
            zoom: Some(3.0),
            show_photo: Some(false),
            ..Default::default()
        });
        assert_eq!(merged.zoom, MAX_ZOOM);
        assert!(!merged.show_photo);
        assert!(merged.show_full_project_links);
    }

    #[test]
    fn test_clamp_zoom_non_finite_resets() {
        assert_eq!(clamp_zoom(f64::NAN), DEFAULT_ZOOM);
        assert_eq!(clamp_zoom(0.5), MIN_ZOOM);
        assert_eq!(clamp_zoom(0.95), 0.95);
    }

    #[test]
    fn test_has_photo_requires_setting_and_data() {
        let mut doc = ResumeDocument::blank();
        assert!(!doc.has_photo());
        doc.basics.photo_data_url = "data:image/png;base64,AAAA".to_string();
        assert!(doc.has_photo());
        doc.settings.show_photo = false;
        assert!(!doc.has_photo());
    }
}
