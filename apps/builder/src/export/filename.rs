use chrono::NaiveDate;

use crate::models::resume::ResumeDocument;

const FALLBACK: &str = "resume";

/// Lowercases, keeps `[a-z0-9]`, whitespace, `-` and `_`, turns whitespace
/// runs into single hyphens and squeezes repeated hyphens.
pub fn slugify(input: &str) -> String {
    let kept: String = input
        .to_lowercase()
        .trim()
        .chars()
        .filter(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-' || *c == '_'
        })
        .collect();

    let mut slug = String::with_capacity(kept.len());
    for c in kept.chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    if slug.is_empty() {
        FALLBACK.to_string()
    } else {
        slug
    }
}

/// `fileBaseName` when set, otherwise the full name, otherwise "resume".
pub fn base_name(doc: &ResumeDocument) -> &str {
    [doc.settings.file_base_name.as_str(), doc.basics.full_name.as_str()]
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .unwrap_or(FALLBACK)
}

pub fn json_filename(doc: &ResumeDocument) -> String {
    format!("{}.json", slugify(base_name(doc)))
}

/// `today` is only used when the document asks for a dated filename.
pub fn pdf_filename(doc: &ResumeDocument, today: NaiveDate) -> String {
    let slug = slugify(base_name(doc));
    if doc.settings.include_date_in_filename {
        format!("{slug}-resume-{}.pdf", today.format("%Y-%m-%d"))
    } else {
        format!("{slug}-resume.pdf")
    }
}
