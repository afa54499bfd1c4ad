use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::ai::schema::{ContentSuggestion, KeywordAnalysis, ResumeAnalysis};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ContentSuggestionRequest {
    pub content: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRequest {
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AchievementResponse {
    pub achievements: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordAnalysisRequest {
    pub resume_content: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisRequest {
    pub resume_content: Option<String>,
    pub target_role: Option<String>,
}

/// A body that failed to parse is handled like an empty one.
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    payload.map(|Json(body)| body).unwrap_or_default()
}

/// Present and non-empty after trimming. The untrimmed value is what gets used.
fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// POST /ai/content-suggestions
pub async fn handle_content_suggestions(
    State(state): State<AppState>,
    payload: Result<Json<ContentSuggestionRequest>, JsonRejection>,
) -> Result<Json<ContentSuggestion>, AppError> {
    let req = body_or_default(payload);
    let (Some(content), Some(section)) = (required(&req.content), required(&req.section)) else {
        return Err(AppError::BadRequest("Content and section are required"));
    };

    let suggestion = state
        .ai
        .get_suggestions(content, section)
        .await
        .map_err(|e| AppError::internal("Failed to generate content suggestions", e))?;
    Ok(Json(suggestion))
}

/// POST /ai/format-achievements
pub async fn handle_format_achievements(
    State(state): State<AppState>,
    payload: Result<Json<AchievementRequest>, JsonRejection>,
) -> Result<Json<AchievementResponse>, AppError> {
    let req = body_or_default(payload);
    let Some(job_description) = required(&req.job_description) else {
        return Err(AppError::BadRequest("Job description is required"));
    };

    let achievements = state
        .ai
        .format_achievements(job_description)
        .await
        .map_err(|e| AppError::internal("Failed to format achievements", e))?;
    Ok(Json(AchievementResponse { achievements }))
}

/// POST /ai/keyword-analysis
pub async fn handle_keyword_analysis(
    State(state): State<AppState>,
    payload: Result<Json<KeywordAnalysisRequest>, JsonRejection>,
) -> Result<Json<KeywordAnalysis>, AppError> {
    let req = body_or_default(payload);
    let (Some(resume_content), Some(job_description)) = (
        required(&req.resume_content),
        required(&req.job_description),
    ) else {
        return Err(AppError::BadRequest(
            "Resume content and job description are required",
        ));
    };

    let analysis = state
        .ai
        .analyze_keywords(resume_content, job_description)
        .await
        .map_err(|e| AppError::internal("Failed to analyze keywords", e))?;
    Ok(Json(analysis))
}

/// POST /ai/resume-analysis
pub async fn handle_resume_analysis(
    State(state): State<AppState>,
    payload: Result<Json<ResumeAnalysisRequest>, JsonRejection>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let req = body_or_default(payload);
    let Some(resume_content) = required(&req.resume_content) else {
        return Err(AppError::BadRequest("Resume content is required"));
    };

    let analysis = state
        .ai
        .analyze_resume(resume_content, req.target_role.as_deref())
        .await
        .map_err(|e| AppError::internal("Failed to analyze resume", e))?;
    Ok(Json(analysis))
}
