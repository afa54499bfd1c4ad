use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::ResumeData;
use crate::state::AppState;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSelection {
    pub template_id: Option<String>,
}

/// GET /resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
) -> Result<Json<ResumeData>, AppError> {
    state
        .store
        .load_resume()
        .await
        .map_err(|e| AppError::internal("Failed to load resume data", e))?
        .map(Json)
        .ok_or(AppError::NotFound("No resume data found"))
}

/// PUT /resume
pub async fn handle_save_resume(
    State(state): State<AppState>,
    payload: Result<Json<ResumeData>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(data) = payload.map_err(|e| AppError::internal("Failed to save resume data", e))?;
    state
        .store
        .save_resume(&data)
        .await
        .map_err(|e| AppError::internal("Failed to save resume data", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /resume
pub async fn handle_clear_resume(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .store
        .clear_resume()
        .await
        .map_err(|e| AppError::internal("Failed to clear resume data", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /resume/template
pub async fn handle_get_template(
    State(state): State<AppState>,
) -> Result<Json<TemplateSelection>, AppError> {
    let template_id = state
        .store
        .load_template()
        .await
        .map_err(|e| AppError::internal("Failed to load template", e))?;
    Ok(Json(TemplateSelection { template_id }))
}

/// PUT /resume/template
pub async fn handle_save_template(
    State(state): State<AppState>,
    payload: Result<Json<TemplateSelection>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let selection = payload.map(|Json(body)| body).unwrap_or_default();
    let Some(template_id) = selection
        .template_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        return Err(AppError::BadRequest("Template id is required"));
    };

    state
        .store
        .save_template(template_id)
        .await
        .map_err(|e| AppError::internal("Failed to save template", e))?;
    Ok(StatusCode::NO_CONTENT)
}
