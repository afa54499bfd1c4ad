//! DOCX export: a flat paragraph/run tree written as a minimal OOXML package.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{
    contact_line, education_heading, education_meta, experience_heading, experience_meta,
    non_blank, project_technologies, ExportError,
};
use crate::models::{format_skills, ResumeData};

// Run sizes in half-points.
const NAME_SIZE: u32 = 28;
const HEADING_SIZE: u32 = 24;
const BODY_SIZE: u32 = 20;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub size_half_points: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

impl Paragraph {
    fn single(text: impl Into<String>, bold: bool, size_half_points: u32) -> Self {
        Self {
            runs: vec![Run {
                text: text.into(),
                bold,
                size_half_points,
            }],
        }
    }

    fn heading(text: &str) -> Self {
        Self::single(text, true, HEADING_SIZE)
    }

    fn body(text: impl Into<String>) -> Self {
        Self::single(text, false, BODY_SIZE)
    }

    fn entry_title(text: impl Into<String>) -> Self {
        Self::single(text, true, BODY_SIZE)
    }
}

pub fn document_paragraphs(data: &ResumeData) -> Vec<Paragraph> {
    let personal = &data.personal;
    let mut paragraphs = vec![
        Paragraph::single(&personal.name, true, NAME_SIZE),
        Paragraph::single(&personal.title, false, HEADING_SIZE),
        Paragraph::body(contact_line(personal)),
        Paragraph::heading("Summary"),
        Paragraph::body(&personal.summary),
        Paragraph::heading("Experience"),
    ];

    for exp in &data.experience {
        paragraphs.push(Paragraph::entry_title(experience_heading(exp)));
        paragraphs.push(Paragraph::body(experience_meta(exp)));
        paragraphs.push(Paragraph::body(&exp.description));
    }

    paragraphs.push(Paragraph::heading("Education"));
    for edu in &data.education {
        paragraphs.push(Paragraph::entry_title(education_heading(edu)));
        paragraphs.push(Paragraph::body(education_meta(edu)));
        if let Some(description) = non_blank(&edu.description) {
            paragraphs.push(Paragraph::body(description));
        }
    }

    paragraphs.push(Paragraph::heading("Skills"));
    paragraphs.push(Paragraph::body(format_skills(&data.skills)));

    if !data.projects.is_empty() {
        paragraphs.push(Paragraph::heading("Projects"));
        for project in &data.projects {
            paragraphs.push(Paragraph::entry_title(&project.name));
            if let Some(tech) = project_technologies(project) {
                paragraphs.push(Paragraph::body(tech));
            }
            paragraphs.push(Paragraph::body(&project.description));
            if let Some(link) = non_blank(&project.link) {
                paragraphs.push(Paragraph::body(link));
            }
        }
    }

    paragraphs
}

/// Serializes paragraphs into `word/document.xml`. Newlines inside a run become `<w:br/>`.
fn document_xml(paragraphs: &[Paragraph]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );

    for paragraph in paragraphs {
        xml.push_str("<w:p>");
        for run in &paragraph.runs {
            xml.push_str("<w:r><w:rPr>");
            if run.bold {
                xml.push_str("<w:b/>");
            }
            xml.push_str(&format!(
                r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/></w:rPr>"#,
                run.size_half_points
            ));
            for (i, segment) in run.text.split('\n').enumerate() {
                if i > 0 {
                    xml.push_str("<w:br/>");
                }
                xml.push_str(r#"<w:t xml:space="preserve">"#);
                xml.push_str(&escape(segment));
                xml.push_str("</w:t>");
            }
            xml.push_str("</w:r>");
        }
        xml.push_str("</w:p>");
    }

    xml.push_str("<w:sectPr/></w:body></w:document>");
    xml
}

pub fn write_package(paragraphs: &[Paragraph]) -> Result<Vec<u8>, ExportError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;
    zip.start_file("_rels/.rels", options)?;
    zip.write_all(RELS_XML.as_bytes())?;
    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(paragraphs).as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

pub fn render_docx(data: &ResumeData) -> Result<Vec<u8>, ExportError> {
    write_package(&document_paragraphs(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::export::tests::sample_resume;
    use crate::files::extract::extract_docx_text;

    #[test]
    fn test_heading_runs_are_bold() {
        let paragraphs = document_paragraphs(&sample_resume());
        let name = &paragraphs[0].runs[0];
        assert!(name.bold);
        assert_eq!(name.size_half_points, 28);
        let summary = paragraphs
            .iter()
            .find(|p| p.runs[0].text == "Summary")
            .unwrap();
        assert!(summary.runs[0].bold);
        assert_eq!(summary.runs[0].size_half_points, 24);
    }

    #[test]
    fn test_xml_escapes_text() {
        let xml = document_xml(&[Paragraph::body("R&D <lead>")]);
        assert!(xml.contains("R&amp;D &lt;lead&gt;"));
    }

    #[test]
    fn test_export_then_extract_contains_headings() {
        let bytes = render_docx(&sample_resume()).unwrap();
        let text = extract_docx_text(&bytes).unwrap();
        for heading in ["Summary", "Experience", "Education", "Skills", "Projects"] {
            assert!(text.contains(heading), "missing {heading} in {text}");
        }
        assert!(text.contains("Lead Engineer at Analytical Co"));
        assert!(text.contains("Go, Rust"));
    }
}
