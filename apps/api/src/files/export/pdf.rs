//! PDF export: lay the document out into a page plan, then draw it with `printpdf`.
//!
//! Coordinates in the plan are millimetres measured from the top-left corner of
//! an A4 page; `printpdf` measures from the bottom-left, so the renderer flips y.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

use super::font_metrics::{get_metrics, Face};
use super::{
    education_heading, education_meta, experience_heading, experience_meta,
    non_blank, project_technologies, ExportError,
};
use crate::models::{format_skills, ResumeData};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_X_MM: f32 = 20.0;
const TOP_MM: f32 = 20.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;
const WRAP_WIDTH_MM: f32 = 170.0;
const LINE_STEP_MM: f32 = 7.0;

const NAME_SIZE: f32 = 24.0;
const HEADING_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub x_mm: f32,
    /// Baseline, from the top of the page.
    pub y_mm: f32,
    pub size_pt: f32,
    pub face: Face,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    pub lines: Vec<PlacedText>,
}

/// Running y cursor that opens a new page once it passes the bottom margin.
struct LayoutCursor {
    pages: Vec<PagePlan>,
    y: f32,
}

impl LayoutCursor {
    fn new() -> Self {
        Self {
            pages: vec![PagePlan::default()],
            y: TOP_MM,
        }
    }

    fn place(&mut self, text: impl Into<String>, size_pt: f32, face: Face, advance: f32) {
        if self.y > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
            self.pages.push(PagePlan::default());
            self.y = TOP_MM;
        }
        let y_mm = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedText {
                text: text.into(),
                x_mm: MARGIN_X_MM,
                y_mm,
                size_pt,
                face,
            });
        }
        self.y += advance;
    }

    fn wrapped(&mut self, text: &str, size_pt: f32, face: Face) {
        for line in get_metrics(face).wrap(text, size_pt, WRAP_WIDTH_MM) {
            self.place(line, size_pt, face, LINE_STEP_MM);
        }
    }

    fn heading(&mut self, title: &str) {
        self.place(title, HEADING_SIZE, Face::Bold, 8.0);
    }

    fn gap(&mut self, mm: f32) {
        self.y += mm;
    }
}

pub fn layout_resume(data: &ResumeData) -> Vec<PagePlan> {
    let personal = &data.personal;
    let mut cursor = LayoutCursor::new();

    cursor.place(&personal.name, NAME_SIZE, Face::Bold, 10.0);
    cursor.place(&personal.title, BODY_SIZE, Face::Regular, 8.0);
    cursor.place(format!("Email: {}", personal.email), BODY_SIZE, Face::Regular, 8.0);
    cursor.place(format!("Phone: {}", personal.phone), BODY_SIZE, Face::Regular, 8.0);
    cursor.place(
        format!("Location: {}", personal.location),
        BODY_SIZE,
        Face::Regular,
        8.0,
    );
    cursor.gap(8.0);

    cursor.heading("Summary");
    cursor.wrapped(&personal.summary, BODY_SIZE, Face::Regular);
    cursor.gap(5.0);

    cursor.heading("Experience");
    for exp in &data.experience {
        cursor.gap(2.0);
        cursor.wrapped(&experience_heading(exp), BODY_SIZE, Face::Bold);
        cursor.wrapped(&experience_meta(exp), BODY_SIZE, Face::Regular);
        cursor.wrapped(&exp.description, BODY_SIZE, Face::Regular);
        cursor.gap(3.0);
    }
    cursor.gap(5.0);

    cursor.heading("Education");
    for edu in &data.education {
        cursor.gap(2.0);
        cursor.wrapped(&education_heading(edu), BODY_SIZE, Face::Bold);
        cursor.wrapped(&education_meta(edu), BODY_SIZE, Face::Regular);
        if let Some(description) = non_blank(&edu.description) {
            cursor.wrapped(description, BODY_SIZE, Face::Regular);
        }
        cursor.gap(3.0);
    }
    cursor.gap(5.0);

    cursor.heading("Skills");
    cursor.wrapped(&format_skills(&data.skills), BODY_SIZE, Face::Regular);

    if !data.projects.is_empty() {
        cursor.gap(10.0);
        cursor.heading("Projects");
        for project in &data.projects {
            cursor.gap(2.0);
            cursor.wrapped(&project.name, BODY_SIZE, Face::Bold);
            if let Some(tech) = project_technologies(project) {
                cursor.wrapped(&tech, BODY_SIZE, Face::Regular);
            }
            cursor.wrapped(&project.description, BODY_SIZE, Face::Regular);
            if let Some(link) = non_blank(&project.link) {
                cursor.wrapped(link, BODY_SIZE, Face::Regular);
            }
            cursor.gap(3.0);
        }
    }

    // Trailing gaps can push the cursor over the edge without placing anything.
    cursor.pages.retain(|page| !page.lines.is_empty());
    cursor.pages
}

/// Draws a page plan with the built-in Helvetica faces.
pub fn render_pages(pages: &[PagePlan], title: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(format!("{e:?}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(format!("{e:?}")))?;

    for (index, page) in pages.iter().enumerate() {
        let (page_idx, layer_idx) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);

        for line in &page.lines {
            let font: &IndirectFontRef = match line.face {
                Face::Regular => &regular,
                Face::Bold => &bold,
            };
            layer.use_text(
                line.text.clone(),
                line.size_pt,
                Mm(line.x_mm),
                Mm(PAGE_HEIGHT_MM - line.y_mm),
                font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(format!("{e:?}")))
}

pub fn render_pdf(data: &ResumeData) -> Result<Vec<u8>, ExportError> {
    let title = if data.personal.name.trim().is_empty() {
        "Resume".to_string()
    } else {
        format!("{} - Resume", data.personal.name)
    };
    render_pages(&layout_resume(data), &title)
}
