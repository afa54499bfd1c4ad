//! Anthropic text-completions adapter (`/v1/complete`).
//!
//! The whole exchange is one prompt string framed by the Human/Assistant turn
//! markers; the answer comes back in `completion`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{api_error, CompletionRequest, LlmProvider, ProviderError, ProviderKind, RawCompletion};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/complete";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-2.1";

const HUMAN_PROMPT: &str = "\n\nHuman:";
const AI_PROMPT: &str = "\n\nAssistant:";

#[derive(Debug, Serialize)]
pub(crate) struct CompleteRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens_to_sample: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteResponse {
    completion: String,
}

#[derive(Clone)]
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(client: Client, api_key: String, model: Option<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| ANTHROPIC_DEFAULT_MODEL.to_string()),
        }
    }

    pub(crate) fn build_request<'a>(&'a self, request: &CompletionRequest) -> CompleteRequest<'a> {
        let turn = match request.system_instruction.as_deref() {
            Some(system) => format!("{system}\n\n{}", request.prompt),
            None => request.prompt.clone(),
        };

        CompleteRequest {
            model: &self.model,
            prompt: format!("{HUMAN_PROMPT} {turn}{AI_PROMPT}"),
            max_tokens_to_sample: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

pub(crate) fn extract_text(response: CompleteResponse) -> Result<String, ProviderError> {
    if response.completion.trim().is_empty() {
        return Err(ProviderError::EmptyContent);
    }
    Ok(response.completion)
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<RawCompletion, ProviderError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let bytes = response.bytes().await?;
        let parsed: CompleteResponse = serde_json::from_slice(&bytes)?;
        let raw_text = extract_text(parsed)?;

        debug!(model = %self.model, chars = raw_text.len(), "anthropic completion received");

        Ok(RawCompletion { raw_text })
    }
}
