use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::files::export::{export_resume, ExportFormat};
use crate::files::extract::{extract_text, DocumentKind};
use crate::files::import::skeleton_from_text;
use crate::models::ResumeData;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ParsedText {
    pub text: String,
}

struct Upload {
    file_name: Option<String>,
    bytes: Bytes,
}

/// Upper bound for `/parse/*` and `/import` bodies, replacing axum's 2 MiB default.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Reading a field failed after the upload started. Hitting the body limit is
/// reported as 413; anything else gets the endpoint's own failure message.
fn upload_error(error: MultipartError, failure: &'static str) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File too large")
    } else {
        AppError::internal(failure, error)
    }
}

/// Finds the `file` field. A body that is not multipart at all counts as no file.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
    failure: &'static str,
) -> Result<Upload, AppError> {
    let mut multipart = multipart.map_err(|_| AppError::BadRequest("No file provided"))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, failure))?
    {
        if field.name() == Some(FILE_FIELD) {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(|e| upload_error(e, failure))?;
            return Ok(Upload { file_name, bytes });
        }
    }
    Err(AppError::BadRequest("No file provided"))
}

async fn parse_as(
    kind: DocumentKind,
    multipart: Result<Multipart, MultipartRejection>,
    failure: &'static str,
) -> Result<Json<ParsedText>, AppError> {
    let upload = read_upload(multipart, failure).await?;

    let text = extract_text(kind, upload.bytes)
        .await
        .map_err(|e| AppError::internal(failure, e))?;
    Ok(Json(ParsedText { text }))
}

/// POST /parse/pdf
pub async fn handle_parse_pdf(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParsedText>, AppError> {
    parse_as(DocumentKind::Pdf, multipart, "Failed to parse PDF file").await
}

/// POST /parse/docx
pub async fn handle_parse_docx(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParsedText>, AppError> {
    parse_as(DocumentKind::Docx, multipart, "Failed to parse DOCX file").await
}

/// POST /parse/text
pub async fn handle_parse_text(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParsedText>, AppError> {
    parse_as(DocumentKind::Text, multipart, "Failed to parse text file").await
}

/// POST /import
///
/// Extracts text by file extension, wraps it in a skeleton document and stores it.
pub async fn handle_import(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResumeData>, AppError> {
    let upload = read_upload(multipart, "Failed to import resume").await?;

    let kind = upload
        .file_name
        .as_deref()
        .and_then(DocumentKind::from_file_name)
        .ok_or(AppError::BadRequest(
            "Unsupported file format. Please upload a PDF, DOCX, or Markdown file.",
        ))?;

    let text = extract_text(kind, upload.bytes)
        .await
        .map_err(|e| AppError::internal("Failed to import resume", e))?;

    let data = skeleton_from_text(&text);
    state
        .store
        .save_resume(&data)
        .await
        .map_err(|e| AppError::internal("Failed to import resume", e))?;

    info!(kind = ?kind, chars = text.chars().count(), "resume imported");
    Ok(Json(data))
}

/// POST /export/:format
pub async fn handle_export(
    Path(format): Path<String>,
    payload: Result<Json<ResumeData>, JsonRejection>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format
        .parse()
        .map_err(|_| AppError::BadRequest("Unsupported export format"))?;
    let Json(data) = payload.map_err(|e| AppError::internal("Failed to export resume", e))?;

    let bytes = export_resume(data, format)
        .await
        .map_err(|e| AppError::internal("Failed to export resume", e))?;

    let disposition = format!("attachment; filename=\"resume.{}\"", format.extension());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
