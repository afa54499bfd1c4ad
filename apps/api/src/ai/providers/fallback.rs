//! Degraded mode: substitutes canned payloads when the wrapped provider fails.
//!
//! Only installed when `AI_DEGRADED_MODE=true`. Every substitution is logged at
//! `warn` because the caller receives fabricated content instead of an error.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use super::{CompletionRequest, LlmProvider, ProviderError, ProviderKind, RawCompletion};
use crate::ai::prompts::{ACHIEVEMENT_MARKER, ANALYSIS_MARKER, KEYWORD_MARKER};

/// Which canned payload a prompt calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedPayload {
    ContentSuggestion,
    KeywordAnalysis,
    ResumeAnalysis,
    Achievements,
}

impl CannedPayload {
    /// Detected by the prompt's opening sentence; user text further in is ignored.
    pub fn for_prompt(prompt: &str) -> Self {
        if prompt.starts_with(ANALYSIS_MARKER) {
            CannedPayload::ResumeAnalysis
        } else if prompt.starts_with(KEYWORD_MARKER) {
            CannedPayload::KeywordAnalysis
        } else if prompt.starts_with(ACHIEVEMENT_MARKER) {
            CannedPayload::Achievements
        } else {
            CannedPayload::ContentSuggestion
        }
    }

    pub fn body(&self) -> String {
        match self {
            CannedPayload::ContentSuggestion => json!({
                "original": "Sample content",
                "improved": "Improved sample content with active verbs and quantifiable achievements",
                "explanation": "The improvement adds clarity, impact, and professionalism"
            })
            .to_string(),
            CannedPayload::KeywordAnalysis => json!({
                "keywords": ["project management", "agile", "collaboration"],
                "suggestions": [{
                    "section": "Summary",
                    "content": "Include terms like 'agile project management' and 'cross-functional teams'",
                    "reason": "These keywords appear in the job description but are missing from your resume"
                }]
            })
            .to_string(),
            CannedPayload::ResumeAnalysis => json!({
                "overallScore": 75,
                "strengths": ["Clear experience section", "Good education details", "Relevant skills"],
                "weaknesses": ["Summary could be stronger", "Missing quantifiable achievements"],
                "improvementSuggestions": [
                    {
                        "section": "Summary",
                        "suggestion": "Add a powerful opening statement that showcases your unique value proposition",
                        "priority": "high"
                    },
                    {
                        "section": "Experience",
                        "suggestion": "Include metrics and results for each role",
                        "priority": "medium"
                    }
                ]
            })
            .to_string(),
            CannedPayload::Achievements => [
                "• Increased team productivity by 25% through implementation of agile methodologies",
                "• Reduced project delivery time by 15% while maintaining quality standards",
                "• Managed $1.5M budget while delivering project under budget by 10%",
            ]
            .join("\n"),
        }
    }
}

/// Wraps a real provider and swallows its failures.
pub struct DegradedProvider {
    inner: Arc<dyn LlmProvider>,
}

impl DegradedProvider {
    pub fn new(inner: Arc<dyn LlmProvider>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LlmProvider for DegradedProvider {
    fn kind(&self) -> ProviderKind {
        self.inner.kind()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<RawCompletion, ProviderError> {
        match self.inner.complete(request).await {
            Ok(completion) => Ok(completion),
            Err(e) => {
                let payload = CannedPayload::for_prompt(&request.prompt);
                warn!(
                    provider = %self.inner.kind(),
                    error = %e,
                    payload = ?payload,
                    "provider call failed; returning canned payload (degraded mode)"
                );
                Ok(RawCompletion {
                    raw_text: payload.body(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompts;
    use crate::ai::schema::{ContentSuggestion, KeywordAnalysis, ResumeAnalysis, Schema};

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Google
        }

        fn model(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _: &CompletionRequest) -> Result<RawCompletion, ProviderError> {
            Err(ProviderError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    fn request(prompt: String) -> CompletionRequest {
        CompletionRequest {
            prompt,
            system_instruction: None,
            temperature: 0.4,
            max_tokens: 100,
            json_response: true,
        }
    }

    #[test]
    fn test_payload_detection() {
        assert_eq!(
            CannedPayload::for_prompt(&prompts::analysis_prompt("r", Some("PM"))),
            CannedPayload::ResumeAnalysis
        );
        assert_eq!(
            CannedPayload::for_prompt(&prompts::keyword_prompt("r", "j")),
            CannedPayload::KeywordAnalysis
        );
        assert_eq!(
            CannedPayload::for_prompt(&prompts::achievement_prompt("j")),
            CannedPayload::Achievements
        );
        assert_eq!(
            CannedPayload::for_prompt(&prompts::suggestion_prompt("c", "Summary")),
            CannedPayload::ContentSuggestion
        );
    }

    #[test]
    fn test_quoted_marker_in_user_text_is_ignored() {
        let content = format!("{ANALYSIS_MARKER} in my summary");
        assert_eq!(
            CannedPayload::for_prompt(&prompts::suggestion_prompt(&content, "Summary")),
            CannedPayload::ContentSuggestion
        );
        assert_eq!(
            CannedPayload::for_prompt(&prompts::keyword_prompt(ACHIEVEMENT_MARKER, "job")),
            CannedPayload::KeywordAnalysis
        );
    }

    #[tokio::test]
    async fn test_degraded_suggestion_passes_schema_despite_quoted_marker() {
        let provider = DegradedProvider::new(Arc::new(FailingProvider));
        let prompt = prompts::suggestion_prompt(&format!("{KEYWORD_MARKER}."), "Summary");
        let out = provider.complete(&request(prompt)).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out.raw_text).unwrap();
        assert!(ContentSuggestion::validate(&value).is_ok());
    }

    #[test]
    fn test_canned_json_payloads_pass_schema() {
        let parse = |p: CannedPayload| serde_json::from_str::<serde_json::Value>(&p.body()).unwrap();
        assert!(ContentSuggestion::validate(&parse(CannedPayload::ContentSuggestion)).is_ok());
        assert!(KeywordAnalysis::validate(&parse(CannedPayload::KeywordAnalysis)).is_ok());
        assert!(ResumeAnalysis::validate(&parse(CannedPayload::ResumeAnalysis)).is_ok());
    }

    #[tokio::test]
    async fn test_degraded_provider_substitutes_on_failure() {
        let provider = DegradedProvider::new(Arc::new(FailingProvider));
        let out = provider
            .complete(&request(prompts::keyword_prompt("resume", "job")))
            .await
            .unwrap();
        assert!(out.raw_text.contains("project management"));
        assert_eq!(provider.kind(), ProviderKind::Google);
    }

    #[tokio::test]
    async fn test_degraded_achievements_are_bullets() {
        let provider = DegradedProvider::new(Arc::new(FailingProvider));
        let out = provider
            .complete(&request(prompts::achievement_prompt("job")))
            .await
            .unwrap();
        assert_eq!(out.raw_text.lines().filter(|l| l.starts_with('•')).count(), 3);
    }
}
