//! OpenAI-style chat-completions adapter.
//!
//! Also backs DeepSeek, which exposes the same wire format at a different base URL.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{api_error, CompletionRequest, LlmProvider, ProviderError, ProviderKind, RawCompletion};

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// Chat-completions client for any OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct ChatCompletionsProvider {
    client: Client,
    kind: ProviderKind,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsProvider {
    pub fn new(
        client: Client,
        kind: ProviderKind,
        base_url: impl Into<String>,
        api_key: String,
        model: String,
    ) -> Self {
        Self {
            client,
            kind,
            base_url: base_url.into(),
            api_key,
            model,
        }
    }

    pub fn openai(client: Client, api_key: String, model: Option<String>) -> Self {
        Self::new(
            client,
            ProviderKind::OpenAi,
            OPENAI_API_URL,
            api_key,
            model.unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
        )
    }

    pub(crate) fn build_request<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_instruction.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_response.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        }
    }
}

/// `choices[0].message.content`
pub(crate) fn extract_text(response: ChatResponse) -> Result<String, ProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ProviderError::EmptyContent)
}

#[async_trait]
impl LlmProvider for ChatCompletionsProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<RawCompletion, ProviderError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let bytes = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes)?;
        let raw_text = extract_text(parsed)?;

        debug!(
            provider = %self.kind,
            model = %self.model,
            chars = raw_text.len(),
            "chat completion received"
        );

        Ok(RawCompletion { raw_text })
    }
}
