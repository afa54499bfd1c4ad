use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::ai::providers::ProviderKind;

const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Application configuration loaded from environment variables.
/// Startup fails if the active provider's API key is missing or a value is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    /// API key of the active provider only.
    pub api_key: String,
    /// Model override for the active provider.
    pub model: Option<String>,
    pub temperature: f32,
    /// `None` lets each operation pick its own ceiling (2000 for JSON, 1000 for achievements).
    pub max_tokens: Option<u32>,
    pub degraded_mode: bool,
    pub request_timeout_secs: u64,
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let provider = match std::env::var("AI_PROVIDER") {
            Ok(raw) => ProviderKind::from_str(raw.trim())
                .map_err(|e| anyhow::anyhow!(e))
                .context("AI_PROVIDER is invalid")?,
            Err(_) => ProviderKind::OpenAi,
        };

        let temperature = parse_env("AI_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            bail!("AI_TEMPERATURE must be between 0 and 2, got {temperature}");
        }

        Ok(Config {
            provider,
            api_key: require_env(provider.api_key_var())?,
            model: optional_env(provider.model_var()),
            temperature,
            max_tokens: parse_env("MAX_TOKENS_PER_REQUEST")?,
            degraded_mode: parse_env("AI_DEGRADED_MODE")?.unwrap_or(false),
            request_timeout_secs: parse_env("AI_REQUEST_TIMEOUT_SECS")?.unwrap_or(120),
            data_dir: optional_env("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            port: parse_env("PORT")?.unwrap_or(8080),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank variables are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional_env(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("{key} has an invalid value '{raw}'"))
        })
        .transpose()
}
