//! Provider adapters: the only place vendor request/response shapes exist.
//!
//! Every adapter accepts a canonical [`CompletionRequest`] and returns a
//! [`RawCompletion`] holding the text the model produced. Nothing vendor-specific
//! crosses this boundary.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

pub mod anthropic;
pub mod deepseek;
pub mod fallback;
pub mod google;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use fallback::DegradedProvider;
pub use google::GoogleProvider;
pub use openai::ChatCompletionsProvider;

/// The four supported backends. Selected once at startup from `AI_PROVIDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
    DeepSeek,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::DeepSeek => "deepseek",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Google => "GOOGLE_AI_API_KEY",
            ProviderKind::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }

    pub fn model_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_MODEL",
            ProviderKind::Anthropic => "ANTHROPIC_MODEL",
            ProviderKind::Google => "GOOGLE_AI_MODEL",
            ProviderKind::DeepSeek => "DEEPSEEK_AI_MODEL",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "google" => Ok(ProviderKind::Google),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            other => Err(format!(
                "unsupported AI provider '{other}' (expected openai, anthropic, google or deepseek)"
            )),
        }
    }
}

/// Provider-agnostic generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the vendor for a JSON object where it supports that natively.
    pub json_response: bool,
}

/// Text extracted from a vendor envelope. May or may not be valid JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCompletion {
    pub raw_text: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("provider returned empty content")]
    EmptyContent,
}

/// A single vendor backend. Implementations hold their own HTTP client and credentials.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<RawCompletion, ProviderError>;
}

/// Builds the adapter for the configured provider, wrapped in degraded mode if enabled.
pub fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let api_key = config.api_key.clone();
    let model = config.model.clone();

    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::OpenAi => Arc::new(ChatCompletionsProvider::openai(client, api_key, model)),
        ProviderKind::DeepSeek => Arc::new(deepseek::provider(client, api_key, model)),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(client, api_key, model)),
        ProviderKind::Google => Arc::new(GoogleProvider::new(client, api_key, model)),
    };

    if config.degraded_mode {
        Ok(Arc::new(DegradedProvider::new(provider)))
    } else {
        Ok(provider)
    }
}

/// Reads a non-2xx response into `ProviderError::Api`, preferring the vendor's
/// `error.message` field when the body is JSON.
pub(crate) async fn api_error(response: reqwest::Response) -> ProviderError {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ErrorBody,
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    ProviderError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert_eq!("deepseek".parse::<ProviderKind>(), Ok(ProviderKind::DeepSeek));
        assert_eq!("Google".parse::<ProviderKind>(), Ok(ProviderKind::Google));
    }

    #[test]
    fn test_provider_kind_rejects_unknown() {
        let err = "mistral".parse::<ProviderKind>().unwrap_err();
        assert!(err.contains("mistral"));
    }

    #[test]
    fn test_provider_kind_env_vars() {
        assert_eq!(ProviderKind::Google.api_key_var(), "GOOGLE_AI_API_KEY");
        assert_eq!(ProviderKind::DeepSeek.model_var(), "DEEPSEEK_AI_MODEL");
    }

    #[test]
    fn test_provider_kind_display_matches_config_value() {
        for kind in [
            ProviderKind::OpenAi,
            ProviderKind::Anthropic,
            ProviderKind::Google,
            ProviderKind::DeepSeek,
        ] {
            assert_eq!(kind.to_string().parse::<ProviderKind>(), Ok(kind));
        }
    }
}
