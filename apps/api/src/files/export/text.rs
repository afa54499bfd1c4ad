use super::{
    contact_line, education_heading, education_meta, experience_heading, experience_meta,
    non_blank, project_technologies,
};
use crate::models::{format_skills, ResumeData};

fn underlined(out: &mut String, title: &str, rule: char) {
    let title = title.to_uppercase();
    out.push_str(&title);
    out.push('\n');
    out.extend(std::iter::repeat(rule).take(title.chars().count()));
    out.push('\n');
}

fn paragraph(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

/// Plain text with upper-case headings: `=` under the name, `-` under sections.
pub fn render_text(data: &ResumeData) -> String {
    let personal = &data.personal;
    let mut out = String::new();

    underlined(&mut out, &personal.name, '=');
    paragraph(&mut out, &personal.title);
    paragraph(&mut out, &contact_line(personal));

    out.push('\n');
    underlined(&mut out, "Summary", '-');
    paragraph(&mut out, &personal.summary);

    out.push('\n');
    underlined(&mut out, "Experience", '-');
    for exp in &data.experience {
        paragraph(&mut out, &experience_heading(exp));
        paragraph(&mut out, &experience_meta(exp));
        paragraph(&mut out, &exp.description);
        out.push('\n');
    }

    out.push('\n');
    underlined(&mut out, "Education", '-');
    for edu in &data.education {
        paragraph(&mut out, &education_heading(edu));
        paragraph(&mut out, &education_meta(edu));
        if let Some(description) = non_blank(&edu.description) {
            paragraph(&mut out, description);
        }
        out.push('\n');
    }

    out.push('\n');
    underlined(&mut out, "Skills", '-');
    paragraph(&mut out, &format_skills(&data.skills));

    if !data.projects.is_empty() {
        out.push('\n');
        underlined(&mut out, "Projects", '-');
        for project in &data.projects {
            paragraph(&mut out, &project.name);
            if let Some(tech) = project_technologies(project) {
                paragraph(&mut out, &tech);
            }
            paragraph(&mut out, &project.description);
            if let Some(link) = non_blank(&project.link) {
                paragraph(&mut out, link);
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::export::tests::sample_resume;

    #[test]
    fn test_headings_are_underlined() {
        let text = render_text(&sample_resume());
        assert!(text.starts_with("ADA LOVELACE\n============\nStaff Engineer\n"));
        assert!(text.contains("\nSKILLS\n------\nGo, Rust\n"));
        assert!(text.contains("\nPROJECTS\n--------\nNote G\nTechnologies: Punch cards\n"));
    }

    #[test]
    fn test_education_without_description() {
        let mut data = sample_resume();
        data.education[0].description = None;
        let text = render_text(&data);
        assert!(text.contains("Home Tutoring | 1830 - 1835\n\n"));
    }
}
