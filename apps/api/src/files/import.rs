use crate::models::{PersonalInfo, ResumeData};

const SUMMARY_CHARS: usize = 500;

/// Wraps extracted text in a placeholder document.
///
/// No structuring happens: contact fields are fixed placeholders, the summary is
/// the first 500 characters of the text and every list is empty. The user fills
/// in the rest in the builder.
pub fn skeleton_from_text(text: &str) -> ResumeData {
    ResumeData {
        personal: PersonalInfo {
            name: "Extracted Name".to_string(),
            email: "example@example.com".to_string(),
            phone: "123-456-7890".to_string(),
            location: "City, Country".to_string(),
            title: "Professional Title".to_string(),
            summary: text.chars().take(SUMMARY_CHARS).collect(),
            ..Default::default()
        },
        ..Default::default()
    }
}
