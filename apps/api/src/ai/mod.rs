//! AI service, the single entry point for provider-backed resume feedback.
//!
//! The service is built once at startup around the configured adapter and shared
//! through `AppState`. It holds no per-request state: every call is a fresh round
//! trip with no retries and no caching.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

pub mod handlers;
pub mod parse;
pub mod prompts;
pub mod providers;
pub mod schema;

use parse::{extract_bullets, parse_json_response, ParseOutcome};
use providers::{CompletionRequest, LlmProvider, ProviderError, ProviderKind};
use schema::{ContentSuggestion, KeywordAnalysis, ResumeAnalysis, Schema, SchemaError};

const KEYWORD_TEMPERATURE: f32 = 0.3;
const ANALYSIS_TEMPERATURE: f32 = 0.4;
const ACHIEVEMENT_TEMPERATURE: f32 = 0.6;
const DEFAULT_JSON_MAX_TOKENS: u32 = 2000;
const DEFAULT_ACHIEVEMENT_MAX_TOKENS: u32 = 1000;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MalformedResponse {
    #[error("response contained no parseable JSON object")]
    NotJson,

    #[error("response failed schema validation: {0}")]
    Schema(#[from] SchemaError),
}

/// Why an operation failed, independent of which operation it was.
#[derive(Debug, Error)]
pub enum AiFailure {
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderError),

    #[error("malformed provider response: {0}")]
    ResponseMalformed(#[from] MalformedResponse),
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("failed to generate content suggestions: {0}")]
    SuggestionGenerationFailed(#[source] AiFailure),

    #[error("failed to analyze keywords: {0}")]
    KeywordAnalysisFailed(#[source] AiFailure),

    #[error("failed to analyze resume: {0}")]
    ResumeAnalysisFailed(#[source] AiFailure),

    #[error("failed to format achievements: {0}")]
    AchievementFormattingFailed(#[source] AiFailure),
}

impl AiError {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn failure(&self) -> &AiFailure {
        match self {
            AiError::SuggestionGenerationFailed(f)
            | AiError::KeywordAnalysisFailed(f)
            | AiError::ResumeAnalysisFailed(f)
            | AiError::AchievementFormattingFailed(f) => f,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

/// Generation parameters that come from configuration rather than the operation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    /// Used by content suggestions; the analysis operations pin their own.
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl From<&Config> for GenerationSettings {
    fn from(config: &Config) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

pub struct AiService {
    provider: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
}

impl AiService {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Improves one section of a resume. `original` in the result is always `content`.
    pub async fn get_suggestions(
        &self,
        content: &str,
        section: &str,
    ) -> Result<ContentSuggestion, AiError> {
        let request = CompletionRequest {
            prompt: prompts::suggestion_prompt(content, section),
            system_instruction: Some(prompts::SUGGESTION_SYSTEM.to_string()),
            temperature: self.settings.temperature,
            max_tokens: self.json_max_tokens(),
            json_response: true,
        };

        let mut suggestion: ContentSuggestion = self
            .call_json("content_suggestion", &request)
            .await
            .map_err(AiError::SuggestionGenerationFailed)?;
        suggestion.original = content.to_string();
        Ok(suggestion)
    }

    pub async fn analyze_keywords(
        &self,
        resume_content: &str,
        job_description: &str,
    ) -> Result<KeywordAnalysis, AiError> {
        let request = CompletionRequest {
            prompt: prompts::keyword_prompt(resume_content, job_description),
            system_instruction: Some(prompts::KEYWORD_SYSTEM.to_string()),
            temperature: KEYWORD_TEMPERATURE,
            max_tokens: self.json_max_tokens(),
            json_response: true,
        };

        self.call_json("keyword_analysis", &request)
            .await
            .map_err(AiError::KeywordAnalysisFailed)
    }

    pub async fn analyze_resume(
        &self,
        resume_content: &str,
        target_role: Option<&str>,
    ) -> Result<ResumeAnalysis, AiError> {
        let request = CompletionRequest {
            prompt: prompts::analysis_prompt(resume_content, target_role),
            system_instruction: Some(prompts::ANALYSIS_SYSTEM.to_string()),
            temperature: ANALYSIS_TEMPERATURE,
            max_tokens: self.json_max_tokens(),
            json_response: true,
        };

        self.call_json("resume_analysis", &request)
            .await
            .map_err(AiError::ResumeAnalysisFailed)
    }

    /// Returns the bullet lines of the model's answer with their markers stripped.
    pub async fn format_achievements(&self, job_description: &str) -> Result<Vec<String>, AiError> {
        let request = CompletionRequest {
            prompt: prompts::achievement_prompt(job_description),
            system_instruction: Some(prompts::ACHIEVEMENT_SYSTEM.to_string()),
            temperature: ACHIEVEMENT_TEMPERATURE,
            max_tokens: self
                .settings
                .max_tokens
                .unwrap_or(DEFAULT_ACHIEVEMENT_MAX_TOKENS),
            json_response: false,
        };

        let completion = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| AiError::AchievementFormattingFailed(e.into()))?;

        let achievements = extract_bullets(&completion.raw_text);
        info!(
            provider = %self.provider.kind(),
            operation = "achievements",
            bullets = achievements.len(),
            "AI call completed"
        );
        Ok(achievements)
    }

    fn json_max_tokens(&self) -> u32 {
        self.settings.max_tokens.unwrap_or(DEFAULT_JSON_MAX_TOKENS)
    }

    /// Provider call → parse (strict or salvage) → schema validation.
    async fn call_json<T: Schema>(
        &self,
        operation: &'static str,
        request: &CompletionRequest,
    ) -> Result<T, AiFailure> {
        let completion = self.provider.complete(request).await?;

        let outcome = parse_json_response(&completion.raw_text);
        if let ParseOutcome::ExtractedFallback(_) = outcome {
            warn!(
                provider = %self.provider.kind(),
                operation,
                "provider response was not pure JSON; extracted embedded object"
            );
        }
        let mode = outcome.mode();

        let value = outcome
            .into_value()
            .ok_or(MalformedResponse::NotJson)?;
        let parsed = T::validate(&value).map_err(MalformedResponse::from)?;

        info!(
            provider = %self.provider.kind(),
            operation,
            parse_mode = mode,
            "AI call completed"
        );
        Ok(parsed)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::providers::RawCompletion;
    use super::schema::Priority;
    use super::*;

    /// Replays a fixed answer (or error) and records every request it receives.
    pub(crate) struct StubProvider {
        reply: Result<String, u16>,
        pub(crate) requests: Mutex<Vec<CompletionRequest>>,
    }

    impl StubProvider {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> CompletionRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAi
        }

        fn model(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<RawCompletion, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(RawCompletion {
                    raw_text: text.clone(),
                }),
                Err(status) => Err(ProviderError::Api {
                    status: *status,
                    message: "stubbed failure".to_string(),
                }),
            }
        }
    }

    pub(crate) fn service_with(provider: Arc<StubProvider>) -> AiService {
        AiService::new(
            provider,
            GenerationSettings {
                temperature: 0.7,
                max_tokens: None,
            },
        )
    }

    #[tokio::test]
    async fn test_suggestion_original_is_input_content() {
        let stub = Arc::new(StubProvider::replying(
            r#"{"original": "paraphrased by model", "improved": "Led 4 engineers", "explanation": "Active voice"}"#,
        ));
        let service = service_with(stub.clone());

        let result = service
            .get_suggestions("Was leader of team", "Experience")
            .await
            .unwrap();

        assert_eq!(result.original, "Was leader of team");
        assert_eq!(result.improved, "Led 4 engineers");

        let request = stub.last_request();
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 2000);
        assert!(request.json_response);
    }

    #[tokio::test]
    async fn test_keyword_analysis_uses_low_temperature() {
        let stub = Arc::new(StubProvider::replying(
            r#"{"keywords": ["agile"], "suggestions": []}"#,
        ));
        let service = service_with(stub.clone());

        let result = service.analyze_keywords("resume", "job").await.unwrap();
        assert_eq!(result.keywords, vec!["agile"]);
        assert!((stub.last_request().temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_resume_analysis_salvaged_from_prose() {
        let stub = Arc::new(StubProvider::replying(
            "Here you go:\n{\"overallScore\": 64, \"strengths\": [], \"weaknesses\": [\"No metrics\"], \
             \"improvementSuggestions\": [{\"section\": \"Experience\", \"suggestion\": \"Add numbers\", \"priority\": \"medium\"}]}",
        ));
        let service = service_with(stub.clone());

        let result = service
            .analyze_resume("resume text", Some("Data Engineer"))
            .await
            .unwrap();

        assert!(result.overall_score <= 100);
        assert_eq!(result.overall_score, 64);
        assert_eq!(result.improvement_suggestions[0].priority, Priority::Medium);

        let request = stub.last_request();
        assert!(request.prompt.contains("for a Data Engineer position"));
        assert!((request.temperature - 0.4).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_non_json_response_is_malformed() {
        let stub = Arc::new(StubProvider::replying("Sorry, I can't produce JSON today."));
        let service = service_with(stub);

        let err = service.analyze_keywords("resume", "job").await.unwrap_err();
        assert!(matches!(err, AiError::KeywordAnalysisFailed(_)));
        assert!(matches!(
            err.failure(),
            AiFailure::ResponseMalformed(MalformedResponse::NotJson)
        ));
    }

    #[tokio::test]
    async fn test_schema_violation_is_malformed() {
        let stub = Arc::new(StubProvider::replying(
            r#"{"overallScore": 140, "strengths": [], "weaknesses": [], "improvementSuggestions": []}"#,
        ));
        let service = service_with(stub);

        let err = service.analyze_resume("resume", None).await.unwrap_err();
        assert!(matches!(err, AiError::ResumeAnalysisFailed(_)));
        assert!(matches!(
            err.failure(),
            AiFailure::ResponseMalformed(MalformedResponse::Schema(_))
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let stub = Arc::new(StubProvider::failing(502));
        let service = service_with(stub);

        let err = service
            .get_suggestions("content", "Summary")
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::SuggestionGenerationFailed(_)));
        assert!(matches!(
            err.failure(),
            AiFailure::ProviderUnavailable(ProviderError::Api { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_achievements_keep_only_bullets() {
        let stub = Arc::new(StubProvider::replying(
            "Achievements:\n• Grew revenue 30%\n• Cut churn by 12%\nSome filler text\n• Hired 6 engineers",
        ));
        let service = service_with(stub.clone());

        let achievements = service.format_achievements("Managed sales").await.unwrap();
        assert_eq!(
            achievements,
            vec!["Grew revenue 30%", "Cut churn by 12%", "Hired 6 engineers"]
        );

        let request = stub.last_request();
        assert!(!request.json_response);
        assert_eq!(request.max_tokens, 1000);
        assert!((request.temperature - 0.6).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_configured_max_tokens_applies_to_all_operations() {
        let stub = Arc::new(StubProvider::replying("• one"));
        let service = AiService::new(
            stub.clone(),
            GenerationSettings {
                temperature: 0.9,
                max_tokens: Some(512),
            },
        );
        service.format_achievements("job").await.unwrap();
        assert_eq!(stub.last_request().max_tokens, 512);
    }

    #[tokio::test]
    async fn test_achievement_provider_failure() {
        let stub = Arc::new(StubProvider::failing(500));
        let service = service_with(stub);
        let err = service.format_achievements("job").await.unwrap_err();
        assert!(matches!(err, AiError::AchievementFormattingFailed(_)));
    }
}
