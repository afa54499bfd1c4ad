//! Renders a `ResumeData` document into a downloadable file.
//!
//! Every format walks the same section order: header, Summary, Experience,
//! Education, Skills, then Projects when there are any.

use std::str::FromStr;

use thiserror::Error;

use crate::models::{Education, Experience, PersonalInfo, Project, ResumeData};

pub mod docx;
pub mod font_metrics;
pub mod markdown;
pub mod pdf;
pub mod text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Markdown,
    Text,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Text => "text/plain; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "md" => Ok(ExportFormat::Markdown),
            "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unsupported export format '{other}'")),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("DOCX packaging failed: {0}")]
    Docx(#[from] zip::result::ZipError),

    #[error("I/O error while exporting: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Produces the file bytes for `format`. PDF rendering runs on a blocking thread.
pub async fn export_resume(data: ResumeData, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Pdf => tokio::task::spawn_blocking(move || pdf::render_pdf(&data)).await?,
        ExportFormat::Docx => docx::render_docx(&data),
        ExportFormat::Markdown => Ok(markdown::render_markdown(&data).into_bytes()),
        ExportFormat::Text => Ok(text::render_text(&data).into_bytes()),
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(&data)?),
    }
}

// Line builders shared by the renderers.

fn contact_line(personal: &PersonalInfo) -> String {
    format!(
        "Email: {} | Phone: {} | Location: {}",
        personal.email, personal.phone, personal.location
    )
}

fn experience_heading(exp: &Experience) -> String {
    format!("{} at {}", exp.position, exp.company)
}

fn experience_meta(exp: &Experience) -> String {
    format!("{} - {} | {}", exp.start_date, exp.end_date, exp.location)
}

fn education_heading(edu: &Education) -> String {
    format!("{} in {}", edu.degree, edu.field)
}

fn education_meta(edu: &Education) -> String {
    format!("{} | {} - {}", edu.institution, edu.start_date, edu.end_date)
}

fn project_technologies(project: &Project) -> Option<String> {
    let tech = project.technologies.trim();
    (!tech.is_empty()).then(|| format!("Technologies: {tech}"))
}

/// Optional text that is present and not blank.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
