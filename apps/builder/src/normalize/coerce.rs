//! Shape-typing of untrusted JSON into a `ResumeDocument`.
//!
//! `coerce` never fails: every missing or mistyped field takes its default.
//! It does not clean content (no trimming, no pruning); see `clean` for that.

use serde_json::{Map, Value};

use crate::models::resume::{
    clamp_zoom, Basics, EducationEntry, ExperienceEntry, ProjectEntry, ResumeDocument, SectionKey,
    Settings, Theme,
};

/// Maps arbitrary JSON onto the typed document schema.
pub fn coerce(raw: &Value) -> ResumeDocument {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    ResumeDocument {
        theme: obj
            .get("theme")
            .and_then(Value::as_str)
            .and_then(Theme::from_key)
            .unwrap_or_default(),
        sections: coerce_sections(obj.get("sections")),
        settings: coerce_settings(obj.get("settings")),
        basics: coerce_basics(obj.get("basics")),
        skills: list(obj.get("skills")).iter().map(text).collect(),
        experience: objects(obj.get("experience"))
            .map(coerce_experience)
            .collect(),
        education: objects(obj.get("education"))
            .map(|e| EducationEntry {
                school: field(e, "school"),
                degree: field(e, "degree"),
                start: field(e, "start"),
                end: field(e, "end"),
            })
            .collect(),
        projects: objects(obj.get("projects"))
            .map(|p| ProjectEntry {
                name: field(p, "name"),
                link: field(p, "link"),
                desc: field(p, "desc"),
            })
            .collect(),
    }
}

/// Recognised section keys in stored order. Unknown keys are dropped.
fn coerce_sections(value: Option<&Value>) -> Vec<SectionKey> {
    list(value)
        .iter()
        .filter_map(Value::as_str)
        .filter_map(SectionKey::from_key)
        .collect()
}

fn coerce_settings(value: Option<&Value>) -> Settings {
    let defaults = Settings::default();
    let Some(obj) = value.and_then(Value::as_object) else {
        return defaults;
    };

    Settings {
        zoom: obj
            .get("zoom")
            .and_then(Value::as_f64)
            .map(clamp_zoom)
            .unwrap_or(defaults.zoom),
        show_photo: obj
            .get("showPhoto")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.show_photo),
        show_full_project_links: obj
            .get("showFullProjectLinks")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.show_full_project_links),
        file_base_name: obj
            .get("fileBaseName")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(defaults.file_base_name),
        include_date_in_filename: obj
            .get("includeDateInFilename")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.include_date_in_filename),
    }
}

fn coerce_basics(value: Option<&Value>) -> Basics {
    let empty = Map::new();
    let b = value.and_then(Value::as_object).unwrap_or(&empty);
    Basics {
        full_name: field(b, "fullName"),
        title: field(b, "title"),
        email: field(b, "email"),
        phone: field(b, "phone"),
        location: field(b, "location"),
        website: field(b, "website"),
        summary: field(b, "summary"),
        photo_data_url: field(b, "photoDataUrl"),
    }
}

fn coerce_experience(x: &Map<String, Value>) -> ExperienceEntry {
    let mut bullets: Vec<String> = list(x.get("bullets")).iter().map(text).collect();
    if bullets.is_empty() {
        bullets.push(String::new());
    }
    ExperienceEntry {
        company: field(x, "company"),
        role: field(x, "role"),
        start: field(x, "start"),
        end: field(x, "end"),
        bullets,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Value helpers
// ────────────────────────────────────────────────────────────────────────────

/// Strings pass through, numbers become their decimal text, anything else is empty.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(text).unwrap_or_default()
}

fn list(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    list(value).iter().filter_map(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_non_object_yields_blank_document() {
        let doc = coerce(&json!([1, 2, 3]));
        assert_eq!(doc.theme, Theme::Split);
        assert!(doc.sections.is_empty());
        assert_eq!(doc.settings, Settings::default());
        assert!(doc.experience.is_empty());
    }

    #[test]
    fn test_coerce_mistyped_settings_take_defaults() {
        let doc = coerce(&json!({
            "settings": {
                "zoom": "big",
                "showPhoto": "yes",
                "showFullProjectLinks": false,
                "fileBaseName": 42,
                "includeDateInFilename": true
            }
        }));
        assert_eq!(doc.settings.zoom, 1.0);
        assert!(doc.settings.show_photo);
        assert!(!doc.settings.show_full_project_links);
        assert_eq!(doc.settings.file_base_name, "");
        assert!(doc.settings.include_date_in_filename);
    }

    #[test]
    fn test_coerce_numbers_become_text() {
        let doc = coerce(&json!({
            "education": [{ "school": "MIT", "start": 2019, "end": null }]
        }));
        assert_eq!(doc.education[0].start, "2019");
        assert_eq!(doc.education[0].end, "");
    }

    #[test]
    fn test_coerce_drops_non_object_entries_and_unknown_sections() {
        let doc = coerce(&json!({
            "theme": "neon",
            "sections": ["education", "hobbies", 7, "summary"],
            "projects": [null, "x", { "name": "Crate" }]
        }));
        assert_eq!(doc.theme, Theme::Split);
        assert_eq!(doc.sections, vec![SectionKey::Education, SectionKey::Summary]);
        assert_eq!(doc.projects.len(), 1);
        assert_eq!(doc.projects[0].name, "Crate");
    }

    #[test]
    fn test_coerce_experience_gets_bullet_slot() {
        let doc = coerce(&json!({ "experience": [{ "company": "Acme", "bullets": "nope" }] }));
        assert_eq!(doc.experience[0].bullets, vec![String::new()]);
    }
}
