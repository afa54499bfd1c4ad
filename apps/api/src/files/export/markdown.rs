use std::fmt::Write;

use super::{
    contact_line, education_heading, education_meta, experience_heading, experience_meta,
    non_blank, project_technologies,
};
use crate::models::{format_skills, ResumeData};

/// `#` for the name, `##` for the title and each section, `###` for entries.
pub fn render_markdown(data: &ResumeData) -> String {
    let personal = &data.personal;
    let mut md = String::new();

    // Writing into a String cannot fail.
    let _ = write!(md, "# {}\n\n", personal.name);
    let _ = write!(md, "## {}\n\n", personal.title);
    let _ = write!(md, "{}\n\n", contact_line(personal));

    let _ = write!(md, "## Summary\n\n{}\n\n", personal.summary);

    md.push_str("## Experience\n\n");
    for exp in &data.experience {
        let _ = write!(md, "### {}\n\n", experience_heading(exp));
        let _ = write!(md, "{}\n\n", experience_meta(exp));
        let _ = write!(md, "{}\n\n", exp.description);
    }

    md.push_str("## Education\n\n");
    for edu in &data.education {
        let _ = write!(md, "### {}\n\n", education_heading(edu));
        let _ = write!(md, "{}\n\n", education_meta(edu));
        if let Some(description) = non_blank(&edu.description) {
            let _ = write!(md, "{description}\n\n");
        }
    }

    md.push_str("## Skills\n\n");
    md.push_str(&format_skills(&data.skills));

    if !data.projects.is_empty() {
        md.push_str("\n\n## Projects\n");
        for project in &data.projects {
            let _ = write!(md, "\n### {}\n\n", project.name);
            if let Some(tech) = project_technologies(project) {
                let _ = write!(md, "{tech}\n\n");
            }
            md.push_str(&project.description);
            md.push('\n');
            if let Some(link) = non_blank(&project.link) {
                let _ = write!(md, "\n{link}\n");
            }
        }
    }

    md
}
