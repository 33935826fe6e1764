pub mod defaults;
pub mod resume;

pub use defaults::default_resume;
pub use resume::ResumeDocument;
