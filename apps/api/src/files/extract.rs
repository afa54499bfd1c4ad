//! Plain-text extraction from uploaded resume files.

use std::io::{Cursor, Read};

use bytes::Bytes;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("not a readable DOCX package: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("malformed document XML: {0}")]
    Xml(String),

    #[error("I/O error while extracting: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Which extractor an uploaded file goes through, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" | "doc" => Some(DocumentKind::Docx),
            "md" | "mdx" | "txt" => Some(DocumentKind::Text),
            _ => None,
        }
    }
}

/// Runs `pdf-extract` on a blocking thread; it is CPU-bound and synchronous.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
    })
    .await?
}

/// Reads `word/document.xml` and flattens it to text.
///
/// `w:t` contributes its text, `w:tab` a tab, `w:br` and the end of every `w:p`
/// a newline. Everything else (styles, properties, drawings) is skipped.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let decoded = t.decode().map_err(|e| ExtractError::Xml(e.to_string()))?;
                text.push_str(&decoded);
            }
            Ok(Event::GeneralRef(r)) if in_text => {
                if let Some(ch) = r
                    .resolve_char_ref()
                    .map_err(|e| ExtractError::Xml(e.to_string()))?
                {
                    text.push(ch);
                } else {
                    let name = r.decode().map_err(|e| ExtractError::Xml(e.to_string()))?;
                    match resolve_predefined_entity(&name) {
                        Some(resolved) => text.push_str(resolved),
                        None => return Err(ExtractError::Xml(format!("unknown entity &{name};"))),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Xml(e.to_string())),
            _ => {}
        }
    }

    Ok(text.trim_end().to_string())
}

/// Markdown and plain text pass through; invalid UTF-8 is replaced, not rejected.
pub fn extract_plain_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

pub async fn extract_text(kind: DocumentKind, bytes: Bytes) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => extract_pdf_text(bytes).await,
        DocumentKind::Docx => extract_docx_text(&bytes),
        DocumentKind::Text => Ok(extract_plain_text(&bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        write!(
            zip,
            r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
        .unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_file_name("cv.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("cv.doc"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_file_name("cv.final.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_file_name("notes.mdx"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_file_name("cv.txt"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_file_name("cv.rtf"), None);
        assert_eq!(DocumentKind::from_file_name("README"), None);
    }

    #[test]
    fn test_docx_paragraphs_tabs_and_breaks() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>Ada</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve">Lovelace</w:t></w:r></w:p><w:p><w:r><w:t>line one</w:t><w:br/><w:t>line two</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            extract_docx_text(&bytes).unwrap(),
            "Ada\tLovelace\nline one\nline two"
        );
    }

    #[test]
    fn test_docx_entities_are_resolved() {
        let bytes = docx_with_body(r#"<w:p><w:r><w:t>R&amp;D &#38; QA</w:t></w:r></w:p>"#);
        assert_eq!(extract_docx_text(&bytes).unwrap(), "R&D & QA");
    }

    #[test]
    fn test_docx_ignores_text_outside_runs() {
        let bytes = docx_with_body(r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Body</w:t></w:r></w:p>"#);
        assert_eq!(extract_docx_text(&bytes).unwrap(), "Body");
    }

    #[test]
    fn test_non_zip_is_package_error() {
        assert!(matches!(
            extract_docx_text(b"plain text, not a zip"),
            Err(ExtractError::Package(_))
        ));
    }

    #[test]
    fn test_plain_text_is_lossy() {
        assert_eq!(extract_plain_text(b"caf\xff"), "caf\u{FFFD}");
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_error() {
        let result = extract_pdf_text(Bytes::from_static(b"definitely not a pdf")).await;
        assert!(result.is_err());
    }
}
