use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The client only ever sees the fixed `message`; `source` is logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    PayloadTooLarge(&'static str),

    #[error("{message}: {source:#}")]
    Internal {
        message: &'static str,
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn internal(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Internal {
            message,
            source: source.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, *msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, *msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, *msg),
            AppError::Internal { message, source } => {
                tracing::error!("{message}: {source:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, *message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let response = AppError::BadRequest("No file provided").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "No file provided"}));
    }

    #[tokio::test]
    async fn test_payload_too_large_status() {
        let response = AppError::PayloadTooLarge("File too large").into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await, json!({"error": "File too large"}));
    }

    #[tokio::test]
    async fn test_internal_hides_source() {
        let response = AppError::internal(
            "Failed to analyze resume",
            anyhow::anyhow!("connection reset by peer"),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Failed to analyze resume"})
        );
    }
}
