use crate::models::resume::{
    canonical_sections, Basics, EducationEntry, ExperienceEntry, ProjectEntry, ResumeDocument,
    Settings, Theme,
};

/// The built-in starter resume used on first launch and on reset.
pub fn default_resume() -> ResumeDocument {
    ResumeDocument {
        theme: Theme::Split,
        sections: canonical_sections(),
        settings: Settings::default(),
        basics: Basics {
            full_name: "Mark Daryl Pineda".to_string(),
            title: "Web Developer".to_string(),
            email: "you@email.com".to_string(),
            phone: "+63 9XX XXX XXXX".to_string(),
            location: "Quezon City, Philippines".to_string(),
            website: "your-site.com".to_string(),
            summary: "Motivated developer building clean, responsive web apps with modern UI \
                      and practical features."
                .to_string(),
            photo_data_url: String::new(),
        },
        skills: ["React", "Tailwind", "PHP", "MySQL"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        experience: vec![ExperienceEntry {
            company: "Company Name".to_string(),
            role: "Intern / Developer".to_string(),
            start: "2025".to_string(),
            end: "2026".to_string(),
            bullets: vec![
                "Built responsive UI components and improved user experience.".to_string(),
                "Integrated APIs and optimized performance for key pages.".to_string(),
            ],
        }],
        education: vec![EducationEntry {
            school: "Quezon City University".to_string(),
            degree: "BS Information Technology".to_string(),
            start: "2022".to_string(),
            end: "2026".to_string(),
        }],
        projects: vec![ProjectEntry {
            name: "ReaPlaylist".to_string(),
            link: "reaplaylist.vercel.app".to_string(),
            desc: "Personal playlist web app with adaptive background and live lyrics."
                .to_string(),
        }],
    }
}
