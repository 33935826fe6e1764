//! Normalizer: the total, failure-free repair of a resume document.
//!
//! `clean` is idempotent. Malformed input is coerced, never rejected.

pub mod coerce;
pub mod entries;
pub mod skills;

use serde_json::Value;

use crate::models::resume::{clamp_zoom, ResumeDocument, SectionKey};

pub use coerce::coerce;
pub use skills::{dedup_skills, skills_from_text};

/// Cleans a typed document: skills, bullets, empty records, settings and section order.
pub fn clean(doc: &ResumeDocument) -> ResumeDocument {
    let mut settings = doc.settings.clone();
    settings.zoom = clamp_zoom(settings.zoom);

    ResumeDocument {
        theme: doc.theme,
        sections: clean_sections(&doc.sections),
        settings,
        basics: doc.basics.clone(),
        skills: dedup_skills(&doc.skills),
        experience: entries::clean_experience(&doc.experience),
        education: entries::prune_education(&doc.education),
        projects: entries::prune_projects(&doc.projects),
    }
}

/// `clean(coerce(raw))`: the entry point for persisted and imported JSON.
pub fn clean_value(raw: &Value) -> ResumeDocument {
    clean(&coerce(raw))
}

/// Deduplicates the stored order and appends any missing keys in canonical order.
///
/// Every section stays reachable, so no layout can silently drop one. An empty
/// order becomes the canonical order.
pub fn clean_sections(sections: &[SectionKey]) -> Vec<SectionKey> {
    let mut out: Vec<SectionKey> = Vec::with_capacity(SectionKey::CANONICAL.len());
    for key in sections.iter().chain(SectionKey::CANONICAL.iter()) {
        if !out.contains(key) {
            out.push(*key);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_resume;
    use crate::models::resume::{canonical_sections, ExperienceEntry};
    use serde_json::json;

    fn messy() -> Value {
        json!({
            "theme": "compact",
            "sections": ["projects", "projects", "bogus"],
            "settings": { "zoom": 9, "showPhoto": false },
            "basics": { "fullName": "Ada Lovelace" },
            "skills": ["react", "React", " REACT ", "", "rust  lang"],
            "experience": [
                { "company": "", "role": "", "bullets": ["", "  "] },
                { "company": "Acme", "bullets": [] },
                { "role": "Engineer", "bullets": ["  shipped   it ", ""] }
            ],
            "education": [{}, { "school": "MIT" }],
            "projects": [{ "name": "" }, { "desc": "A crate" }],
            "extra": "dropped"
        })
    }

    #[test]
    fn test_clean_is_idempotent_on_messy_input() {
        let once = clean_value(&messy());
        let twice = clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_is_idempotent_on_default() {
        let once = clean(&default_resume());
        assert_eq!(clean(&once), once);
        assert_eq!(once, default_resume());
    }

    #[test]
    fn test_clean_skills_duplicate_free() {
        let doc = clean_value(&messy());
        assert_eq!(doc.skills, vec!["React", "Rust Lang"]);
    }

    #[test]
    fn test_clean_experience_pruning() {
        let doc = clean_value(&messy());
        assert_eq!(doc.experience.len(), 2);
        assert_eq!(doc.experience[0].company, "Acme");
        assert_eq!(doc.experience[0].bullets, vec![""]);
        assert_eq!(doc.experience[1].bullets, vec!["shipped it"]);
    }

    #[test]
    fn test_clean_settings_defaulted_and_clamped() {
        let doc = clean_value(&messy());
        assert_eq!(doc.settings.zoom, 1.2);
        assert!(!doc.settings.show_photo);
        assert!(doc.settings.show_full_project_links);
        assert_eq!(doc.settings.file_base_name, "");
        assert!(!doc.settings.include_date_in_filename);
    }

    #[test]
    fn test_sections_default_when_missing_empty_or_not_array() {
        for raw in [json!({}), json!({ "sections": [] }), json!({ "sections": "summary" })] {
            assert_eq!(clean_value(&raw).sections, canonical_sections());
        }
    }

    #[test]
    fn test_sections_keep_user_order_and_fill_missing() {
        let doc = clean_value(&messy());
        assert_eq!(
            doc.sections,
            vec![
                SectionKey::Projects,
                SectionKey::Summary,
                SectionKey::Experience,
                SectionKey::Education
            ]
        );
    }

    #[test]
    fn test_clean_typed_document_with_blank_entries() {
        let mut doc = default_resume();
        doc.experience.push(ExperienceEntry::default());
        let cleaned = clean(&doc);
        assert_eq!(cleaned.experience.len(), 1);
    }
}
