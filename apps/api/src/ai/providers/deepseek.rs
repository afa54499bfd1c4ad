//! DeepSeek speaks the OpenAI chat-completions format; only the endpoint and model differ.

use reqwest::Client;

use super::{ChatCompletionsProvider, ProviderKind};

pub const DEEPSEEK_API_URL: &str = "https://api.deepseek.com/v1";
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";

pub fn provider(client: Client, api_key: String, model: Option<String>) -> ChatCompletionsProvider {
    ChatCompletionsProvider::new(
        client,
        ProviderKind::DeepSeek,
        DEEPSEEK_API_URL,
        api_key,
        model.unwrap_or_else(|| DEEPSEEK_DEFAULT_MODEL.to_string()),
    )
}
