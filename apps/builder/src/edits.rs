//! Typed form edits. Each edit maps a document to a new whole document.
//!
//! Edits never run the normalizer: a freshly added empty entry must survive
//! until the user explicitly cleans.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::{
    canonical_sections, Basics, EducationEntry, ExperienceEntry, ProjectEntry, ResumeDocument,
    SettingsPatch, Theme,
};
use crate::normalize::skills_from_text;

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("{list} entry {index} does not exist")]
    NoSuchEntry { list: &'static str, index: usize },

    #[error("bullet {bullet} of experience entry {index} does not exist")]
    NoSuchBullet { index: usize, bullet: usize },
}

/// Editable text fields of `basics`. The photo has its own edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BasicsField {
    FullName,
    Title,
    Email,
    Phone,
    Location,
    Website,
    Summary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationPatch {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub link: Option<String>,
    pub desc: Option<String>,
}

/// One user action on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    SetTheme { theme: Theme },
    SetBasic { field: BasicsField, value: String },
    ResetBasics,
    ClearPhoto,

    SetSkillsText { text: String },
    ResetSkills,

    AddExperience,
    UpdateExperience { index: usize, patch: ExperiencePatch },
    RemoveExperience { index: usize },
    AddBullet { index: usize },
    SetBullet { index: usize, bullet: usize, value: String },
    RemoveBullet { index: usize, bullet: usize },
    ResetExperience,

    AddEducation,
    UpdateEducation { index: usize, patch: EducationPatch },
    RemoveEducation { index: usize },
    ResetEducation,

    AddProject,
    UpdateProject { index: usize, patch: ProjectPatch },
    RemoveProject { index: usize },
    ResetProjects,

    MoveSection { from: usize, to: usize },
    ResetSectionOrder,

    UpdateSettings { patch: SettingsPatch },
}

/// Applies an edit to a copy of `doc`. On error `doc` is untouched.
pub fn apply_edit(doc: &ResumeDocument, edit: &Edit) -> Result<ResumeDocument, EditError> {
    let mut next = doc.clone();

    match edit {
        Edit::SetTheme { theme } => next.theme = *theme,
        Edit::SetBasic { field, value } => *basics_field(&mut next.basics, *field) = value.clone(),
        Edit::ResetBasics => {
            next.basics = Basics {
                photo_data_url: doc.basics.photo_data_url.clone(),
                ..Basics::default()
            }
        }
        Edit::ClearPhoto => next.basics.photo_data_url.clear(),

        Edit::SetSkillsText { text } => next.skills = skills_from_text(text),
        Edit::ResetSkills => next.skills.clear(),

        Edit::AddExperience => next.experience.push(ExperienceEntry::default()),
        Edit::UpdateExperience { index, patch } => {
            let x = entry_mut(&mut next.experience, "experience", *index)?;
            patch_field(&mut x.company, &patch.company);
            patch_field(&mut x.role, &patch.role);
            patch_field(&mut x.start, &patch.start);
            patch_field(&mut x.end, &patch.end);
        }
        Edit::RemoveExperience { index } => {
            entry_mut(&mut next.experience, "experience", *index)?;
            next.experience.remove(*index);
        }
        Edit::AddBullet { index } => {
            entry_mut(&mut next.experience, "experience", *index)?
                .bullets
                .push(String::new());
        }
        Edit::SetBullet {
            index,
            bullet,
            value,
        } => {
            let x = entry_mut(&mut next.experience, "experience", *index)?;
            let slot = x.bullets.get_mut(*bullet).ok_or(EditError::NoSuchBullet {
                index: *index,
                bullet: *bullet,
            })?;
            *slot = value.clone();
        }
        Edit::RemoveBullet { index, bullet } => {
            let x = entry_mut(&mut next.experience, "experience", *index)?;
            if *bullet >= x.bullets.len() {
                return Err(EditError::NoSuchBullet {
                    index: *index,
                    bullet: *bullet,
                });
            }
            x.bullets.remove(*bullet);
            if x.bullets.is_empty() {
                x.bullets.push(String::new());
            }
        }
        Edit::ResetExperience => next.experience.clear(),

        Edit::AddEducation => next.education.push(EducationEntry::default()),
        Edit::UpdateEducation { index, patch } => {
            let e = entry_mut(&mut next.education, "education", *index)?;
            patch_field(&mut e.school, &patch.school);
            patch_field(&mut e.degree, &patch.degree);
            patch_field(&mut e.start, &patch.start);
            patch_field(&mut e.end, &patch.end);
        }
        Edit::RemoveEducation { index } => {
            entry_mut(&mut next.education, "education", *index)?;
            next.education.remove(*index);
        }
        Edit::ResetEducation => next.education.clear(),

        Edit::AddProject => next.projects.push(ProjectEntry::default()),
        Edit::UpdateProject { index, patch } => {
            let p = entry_mut(&mut next.projects, "projects", *index)?;
            patch_field(&mut p.name, &patch.name);
            patch_field(&mut p.link, &patch.link);
            patch_field(&mut p.desc, &patch.desc);
        }
        Edit::RemoveProject { index } => {
            entry_mut(&mut next.projects, "projects", *index)?;
            next.projects.remove(*index);
        }
        Edit::ResetProjects => next.projects.clear(),

        Edit::MoveSection { from, to } => {
            let mut order = doc.section_order();
            if *from < order.len() && *to < order.len() {
                let key = order.remove(*from);
                order.insert(*to, key);
                next.sections = order;
            }
        }
        Edit::ResetSectionOrder => next.sections = canonical_sections(),

        Edit::UpdateSettings { patch } => next.settings = doc.settings.merge(patch),
    }

    Ok(next)
}

fn basics_field(basics: &mut Basics, field: BasicsField) -> &mut String {
    match field {
        BasicsField::FullName => &mut basics.full_name,
        BasicsField::Title => &mut basics.title,
        BasicsField::Email => &mut basics.email,
        BasicsField::Phone => &mut basics.phone,
        BasicsField::Location => &mut basics.location,
        BasicsField::Website => &mut basics.website,
        BasicsField::Summary => &mut basics.summary,
    }
}

fn entry_mut<'a, T>(
    list: &'a mut [T],
    name: &'static str,
    index: usize,
) -> Result<&'a mut T, EditError> {
    list.get_mut(index)
        .ok_or(EditError::NoSuchEntry { list: name, index })
}

fn patch_field(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        target.clone_from(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_resume;
    use crate::models::resume::SectionKey;
    use serde_json::json;

    #[test]
    fn test_edit_deserializes_from_tagged_json() {
        let edit: Edit = serde_json::from_value(json!({
            "op": "set_basic",
            "field": "fullName",
            "value": "Grace Hopper"
        }))
        .unwrap();
        let doc = apply_edit(&default_resume(), &edit).unwrap();
        assert_eq!(doc.basics.full_name, "Grace Hopper");
    }

    #[test]
    fn test_reset_basics_keeps_photo() {
        let mut doc = default_resume();
        doc.basics.photo_data_url = "data:image/png;base64,AA".to_string();
        let next = apply_edit(&doc, &Edit::ResetBasics).unwrap();
        assert_eq!(next.basics.full_name, "");
        assert_eq!(next.basics.photo_data_url, "data:image/png;base64,AA");
    }

    #[test]
    fn test_add_experience_is_not_cleaned_away() {
        let next = apply_edit(&default_resume(), &Edit::AddExperience).unwrap();
        assert_eq!(next.experience.len(), 2);
        assert_eq!(next.experience[1].bullets, vec![""]);
    }

    #[test]
    fn test_remove_last_bullet_leaves_placeholder() {
        let mut doc = default_resume();
        doc.experience[0].bullets = vec!["only".to_string()];
        let next = apply_edit(&doc, &Edit::RemoveBullet { index: 0, bullet: 0 }).unwrap();
        assert_eq!(next.experience[0].bullets, vec![""]);
    }

    #[test]
    fn test_out_of_range_entry_is_error_and_document_untouched() {
        let doc = default_resume();
        let err = apply_edit(&doc, &Edit::RemoveProject { index: 5 }).unwrap_err();
        assert_eq!(
            err,
            EditError::NoSuchEntry {
                list: "projects",
                index: 5
            }
        );
        assert_eq!(doc, default_resume());
    }

    #[test]
    fn test_set_bullet_out_of_range() {
        let err = apply_edit(
            &default_resume(),
            &Edit::SetBullet {
                index: 0,
                bullet: 9,
                value: "x".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err, EditError::NoSuchBullet { index: 0, bullet: 9 });
    }

    #[test]
    fn test_move_section_reorders() {
        let next = apply_edit(&default_resume(), &Edit::MoveSection { from: 3, to: 0 }).unwrap();
        assert_eq!(
            next.sections,
            vec![
                SectionKey::Education,
                SectionKey::Summary,
                SectionKey::Experience,
                SectionKey::Projects
            ]
        );
    }

    #[test]
    fn test_move_section_out_of_range_is_noop() {
        let doc = default_resume();
        let next = apply_edit(&doc, &Edit::MoveSection { from: 0, to: 4 }).unwrap();
        assert_eq!(next.sections, doc.sections);
    }

    #[test]
    fn test_skills_text_title_cased_and_deduped() {
        let next = apply_edit(
            &default_resume(),
            &Edit::SetSkillsText {
                text: "rust, Rust, axum".to_string(),
            },
        )
        .unwrap();
        assert_eq!(next.skills, vec!["Rust", "Axum"]);
    }

    #[test]
    fn test_update_settings_merges_patch() {
        let next = apply_edit(
            &default_resume(),
            &Edit::UpdateSettings {
                patch: SettingsPatch {
                    file_base_name: Some("My CV".to_string()),
                    ..Default::default()
                },
            },
        )
        .unwrap();
        assert_eq!(next.settings.file_base_name, "My CV");
        assert_eq!(next.settings.zoom, 1.0);
    }

    #[test]
    fn test_update_experience_patch_only_touches_given_fields() {
        let next = apply_edit(
            &default_resume(),
            &Edit::UpdateExperience {
                index: 0,
                patch: ExperiencePatch {
                    role: Some("Lead".to_string()),
                    ..Default::default()
                },
            },
        )
        .unwrap();
        assert_eq!(next.experience[0].role, "Lead");
        assert_eq!(next.experience[0].company, "Company Name");
    }
}
