//! Google generative-language adapter (`models/{model}:generateContent`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{api_error, CompletionRequest, LlmProvider, ProviderError, ProviderKind, RawCompletion};

const GOOGLE_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GOOGLE_DEFAULT_MODEL: &str = "gemini-pro";
const TOP_P: f32 = 0.8;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Clone)]
pub struct GoogleProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GoogleProvider {
    pub fn new(client: Client, api_key: String, model: Option<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| GOOGLE_DEFAULT_MODEL.to_string()),
        }
    }

    /// The system instruction, when present, travels as a leading part of the user turn.
    pub(crate) fn build_request<'a>(&self, request: &'a CompletionRequest) -> GenerateRequest<'a> {
        let mut parts = Vec::with_capacity(2);
        if let Some(system) = request.system_instruction.as_deref() {
            parts.push(Part { text: system });
        }
        parts.push(Part {
            text: &request.prompt,
        });

        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                top_p: TOP_P,
            },
        }
    }

    fn endpoint(&self) -> String {
        format!("{GOOGLE_API_URL}/models/{}:generateContent", self.model)
    }
}

/// Concatenates the text parts of the first candidate.
pub(crate) fn extract_text(response: GenerateResponse) -> Result<String, ProviderError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyContent);
    }
    Ok(text)
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<RawCompletion, ProviderError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let bytes = response.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes)?;
        let raw_text = extract_text(parsed)?;

        debug!(model = %self.model, chars = raw_text.len(), "google generation received");

        Ok(RawCompletion { raw_text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_parts_and_generation_config() {
        let p = GoogleProvider::new(Client::new(), "key".to_string(), None);
        let req = CompletionRequest {
            prompt: "Analyze".to_string(),
            system_instruction: Some("Be precise.".to_string()),
            temperature: 0.5,
            max_tokens: 2000,
            json_response: true,
        };
        let body = serde_json::to_value(p.build_request(&req)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"],
            json!([{"text": "Be precise."}, {"text": "Analyze"}])
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2000);
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
        assert!(body["generationConfig"]["topP"].is_number());
    }

    #[test]
    fn test_endpoint_embeds_model() {
        let p = GoogleProvider::new(Client::new(), "key".to_string(), Some("gemini-1.5-flash".into()));
        assert_eq!(
            p.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_extract_concatenates_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_blocked_candidate_is_empty() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(matches!(
            extract_text(response),
            Err(ProviderError::EmptyContent)
        ));
    }

    #[test]
    fn test_extract_missing_candidates() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(extract_text(response).is_err());
    }
}
