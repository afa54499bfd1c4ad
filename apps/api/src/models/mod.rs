pub mod resume;

pub use resume::{format_skills, Education, Experience, PersonalInfo, Project, ResumeData};
#[cfg_attr(not(test), allow(unused_imports))]
pub use resume::Skill;
