use crate::models::resume::{EducationEntry, ExperienceEntry, ProjectEntry};

/// Trims a bullet and collapses internal whitespace runs to one space.
pub fn clean_bullet(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleans bullets, keeping a single empty placeholder when none survive.
pub fn clean_bullets(bullets: &[String]) -> Vec<String> {
    let cleaned: Vec<String> = bullets
        .iter()
        .map(|b| clean_bullet(b))
        .filter(|b| !b.is_empty())
        .collect();
    if cleaned.is_empty() {
        vec![String::new()]
    } else {
        cleaned
    }
}

pub fn experience_has_content(x: &ExperienceEntry) -> bool {
    !x.company.is_empty()
        || !x.role.is_empty()
        || !x.start.is_empty()
        || !x.end.is_empty()
        || x.bullets.iter().any(|b| !b.trim().is_empty())
}

pub fn education_has_content(e: &EducationEntry) -> bool {
    !e.school.is_empty() || !e.degree.is_empty() || !e.start.is_empty() || !e.end.is_empty()
}

pub fn project_has_content(p: &ProjectEntry) -> bool {
    !p.name.is_empty() || !p.link.is_empty() || !p.desc.is_empty()
}

pub fn clean_experience(entries: &[ExperienceEntry]) -> Vec<ExperienceEntry> {
    entries
        .iter()
        .map(|x| ExperienceEntry {
            bullets: clean_bullets(&x.bullets),
            ..x.clone()
        })
        .filter(experience_has_content)
        .collect()
}

pub fn prune_education(entries: &[EducationEntry]) -> Vec<EducationEntry> {
    entries
        .iter()
        .filter(|e| education_has_content(e))
        .cloned()
        .collect()
}

pub fn prune_projects(entries: &[ProjectEntry]) -> Vec<ProjectEntry> {
    entries
        .iter()
        .filter(|p| project_has_content(p))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(company: &str, bullets: &[&str]) -> ExperienceEntry {
        ExperienceEntry {
            company: company.to_string(),
            bullets: bullets.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_bullet_collapses_whitespace() {
        assert_eq!(clean_bullet("  Shipped \t the\n\nthing  "), "Shipped the thing");
    }

    #[test]
    fn test_clean_bullets_keeps_placeholder() {
        assert_eq!(clean_bullets(&["  ".to_string(), String::new()]), vec![""]);
    }

    #[test]
    fn test_empty_experience_removed() {
        let out = clean_experience(&[exp("", &["", "   "])]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_company_only_experience_kept_with_placeholder() {
        let out = clean_experience(&[exp("Acme", &[])]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].company, "Acme");
        assert_eq!(out[0].bullets, vec![""]);
    }

    #[test]
    fn test_bullet_only_experience_kept() {
        let out = clean_experience(&[exp("", &["  led   migration "])]);
        assert_eq!(out[0].bullets, vec!["led migration"]);
    }

    #[test]
    fn test_prune_education_and_projects() {
        let edu = vec![
            EducationEntry::default(),
            EducationEntry {
                degree: "BSc".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(prune_education(&edu).len(), 1);

        let projects = vec![
            ProjectEntry::default(),
            ProjectEntry {
                link: "example.com".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(prune_projects(&projects).len(), 1);
    }
}
