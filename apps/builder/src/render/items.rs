//! Block builders shared by every layout strategy.

use axum::http::Uri;

use crate::models::resume::{ResumeDocument, SectionKey};
use crate::render::tree::{
    Block, EducationItem, ExperienceItem, ProjectItem, SectionBody,
};

pub const PLACEHOLDER_NAME: &str = "Your Name";
pub const PLACEHOLDER_TITLE: &str = "Your Title";

/// Start and end joined by an em dash when both exist, otherwise whichever one does.
pub fn date_range(start: &str, end: &str) -> String {
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} \u{2014} {end}"),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (true, true) => String::new(),
    }
}

/// Host part of a link with any leading `www.` removed.
///
/// Links without a scheme are parsed as `https://`. When the link does not
/// parse as a URI the scheme and `www.` prefixes are stripped textually.
pub fn domain_only(link: &str) -> String {
    let s = link.trim();
    if s.is_empty() {
        return String::new();
    }
    let candidate = if s.starts_with("http") {
        s.to_string()
    } else {
        format!("https://{s}")
    };

    match candidate.parse::<Uri>() {
        Ok(uri) if uri.authority().is_some() => {
            let authority = uri.authority().map(|a| a.as_str()).unwrap_or_default();
            // Drop credentials, keep host[:port]. Hosts compare case-insensitively.
            let host = authority.rsplit('@').next().unwrap_or(authority).to_ascii_lowercase();
            strip_www(&host).to_string()
        }
        _ => {
            let without_scheme = s
                .strip_prefix("https://")
                .or_else(|| s.strip_prefix("http://"))
                .unwrap_or(s);
            strip_www(without_scheme).to_string()
        }
    }
}

fn strip_www(s: &str) -> &str {
    s.strip_prefix("www.").unwrap_or(s)
}

pub fn display_link(link: &str, show_full: bool) -> String {
    if show_full {
        link.to_string()
    } else {
        domain_only(link)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Block builders
// ────────────────────────────────────────────────────────────────────────────

pub fn identity(doc: &ResumeDocument, name_size: f32) -> Block {
    let b = &doc.basics;
    Block::Identity {
        name: or_placeholder(&b.full_name, PLACEHOLDER_NAME),
        title: or_placeholder(&b.title, PLACEHOLDER_TITLE),
        name_size,
    }
}

/// Non-empty contact items in display order.
pub fn contact(doc: &ResumeDocument, boxed: bool, stacked: bool) -> Block {
    Block::Contact {
        items: doc
            .basics
            .contact_items()
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect(),
        boxed,
        stacked,
    }
}

/// Photo block, only when the photo exists and is enabled.
pub fn photo(doc: &ResumeDocument, size: f32) -> Option<Block> {
    doc.has_photo().then(|| Block::Photo {
        data_url: doc.basics.photo_data_url.clone(),
        size,
    })
}

pub fn summary(doc: &ResumeDocument, boxed: bool) -> Option<Block> {
    let text = &doc.basics.summary;
    (!text.is_empty()).then(|| Block::Summary {
        text: text.clone(),
        boxed,
    })
}

/// Skills always render, even when the list is empty.
pub fn skills(doc: &ResumeDocument) -> Block {
    Block::Section {
        title: "Skills".to_string(),
        body: SectionBody::Skills(doc.skills.clone()),
    }
}

pub fn experience(doc: &ResumeDocument) -> Option<Block> {
    if doc.experience.is_empty() {
        return None;
    }
    let items = doc
        .experience
        .iter()
        .map(|x| ExperienceItem {
            role: or_placeholder(&x.role, "Role"),
            company: or_placeholder(&x.company, "Company"),
            dates: date_range(&x.start, &x.end),
            bullets: x
                .bullets
                .iter()
                .filter(|b| !b.trim().is_empty())
                .cloned()
                .collect(),
        })
        .collect();
    Some(section(SectionKey::Experience, SectionBody::Experience(items)))
}

pub fn education(doc: &ResumeDocument) -> Option<Block> {
    if doc.education.is_empty() {
        return None;
    }
    let items = doc
        .education
        .iter()
        .map(|e| EducationItem {
            school: or_placeholder(&e.school, "School"),
            degree: or_placeholder(&e.degree, "Degree"),
            dates: date_range(&e.start, &e.end),
        })
        .collect();
    Some(section(SectionKey::Education, SectionBody::Education(items)))
}

pub fn projects(doc: &ResumeDocument) -> Option<Block> {
    if doc.projects.is_empty() {
        return None;
    }
    let show_full = doc.settings.show_full_project_links;
    let items = doc
        .projects
        .iter()
        .map(|p| ProjectItem {
            name: or_placeholder(&p.name, "Project"),
            link: display_link(&p.link, show_full),
            desc: p.desc.clone(),
        })
        .collect();
    Some(section(SectionKey::Projects, SectionBody::Projects(items)))
}

/// The block for an orderable section key. `boxed_summary` picks the summary style.
pub fn ordered_section(doc: &ResumeDocument, key: SectionKey, boxed_summary: bool) -> Option<Block> {
    match key {
        SectionKey::Summary => summary(doc, boxed_summary),
        SectionKey::Experience => experience(doc),
        SectionKey::Projects => projects(doc),
        SectionKey::Education => education(doc),
    }
}

/// Builds the given sections in the document's section order.
pub fn in_section_order(doc: &ResumeDocument, keys: &[SectionKey]) -> Vec<Block> {
    doc.section_order()
        .into_iter()
        .filter(|k| keys.contains(k))
        .filter_map(|k| ordered_section(doc, k, false))
        .collect()
}

fn section(key: SectionKey, body: SectionBody) -> Block {
    Block::Section {
        title: key.label().to_string(),
        body,
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_resume;

    #[test]
    fn test_date_range_variants() {
        assert_eq!(date_range("2020", "2022"), "2020 \u{2014} 2022");
        assert_eq!(date_range("2020", ""), "2020");
        assert_eq!(date_range("", "Present"), "Present");
        assert_eq!(date_range("", ""), "");
    }

    #[test]
    fn test_domain_only_strips_scheme_path_and_www() {
        assert_eq!(domain_only("https://www.example.com/path?q=1"), "example.com");
        assert_eq!(domain_only("reaplaylist.vercel.app"), "reaplaylist.vercel.app");
        assert_eq!(domain_only("http://blog.dev:8080/x"), "blog.dev:8080");
        assert_eq!(domain_only("   "), "");
    }

    #[test]
    fn test_domain_only_lowercases_host() {
        assert_eq!(domain_only("Example.COM/x"), "example.com");
        assert_eq!(domain_only("https://WWW.Portfolio.Dev/Work"), "portfolio.dev");
    }

    #[test]
    fn test_domain_only_falls_back_on_unparseable() {
        assert_eq!(domain_only("https://www.bad host/x"), "bad host/x");
    }

    #[test]
    fn test_display_link_respects_setting() {
        assert_eq!(display_link("https://www.a.io/b", true), "https://www.a.io/b");
        assert_eq!(display_link("https://www.a.io/b", false), "a.io");
    }

    #[test]
    fn test_experience_placeholders_and_blank_bullets() {
        let mut doc = default_resume();
        doc.experience[0].role.clear();
        doc.experience[0].bullets.push("   ".to_string());
        let Some(Block::Section {
            body: SectionBody::Experience(items),
            ..
        }) = experience(&doc)
        else {
            panic!("expected experience section");
        };
        assert_eq!(items[0].role, "Role");
        assert_eq!(items[0].bullets.len(), 2);
    }

    #[test]
    fn test_photo_hidden_without_data() {
        let doc = default_resume();
        assert!(photo(&doc, 70.0).is_none());
    }

    #[test]
    fn test_in_section_order_follows_document() {
        let mut doc = default_resume();
        doc.sections = vec![
            SectionKey::Education,
            SectionKey::Projects,
            SectionKey::Experience,
            SectionKey::Summary,
        ];
        let blocks = in_section_order(&doc, &[SectionKey::Experience, SectionKey::Education]);
        let titles: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Section { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(titles, vec!["Education", "Experience"]);
    }
}
