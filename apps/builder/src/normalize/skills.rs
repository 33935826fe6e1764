use std::collections::HashSet;

/// Uppercases the first letter of every word and leaves the rest untouched,
/// so acronyms such as "PHP" or "MySQL" survive. Whitespace runs collapse.
pub fn title_case_skill(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-cases, drops empties and removes duplicates.
///
/// Duplicates are detected case-insensitively; the first-seen spelling wins, so
/// `["react", "React", " REACT "]` collapses to `["React"]`.
pub fn dedup_skills<I, S>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .map(|s| title_case_skill(s.as_ref()))
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

/// Parses the comma-separated skills text field of the form.
pub fn skills_from_text(text: &str) -> Vec<String> {
    dedup_skills(text.split(','))
}
