//! LLM provider implementations

use crate::config::{ConfigError, LlmConfig, DEFAULT_API_KEY_ENV};

mod error;
mod groq;
mod openai_compat;
mod types;

pub use error::LlmError;
pub use groq::{GroqProvider, GROQ_API_URL, GROQ_DEFAULT_MODEL};
pub use openai_compat::{AuthMethod, OpenAiCompatConfig, OpenAiCompatProvider};
pub use types::*;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the model requests are sent to
    fn model(&self) -> &str;

    /// Send a chat completion request (non-streaming)
    ///
    /// Failures are `LlmError` values wrapped in `anyhow::Error`.
    async fn chat(&self, messages: &[Message], options: &CompletionOptions) -> Result<LlmResponse>;
}

/// Create an LLM provider from configuration
///
/// `api_key` is `None` only for gateways configured without a key variable;
/// Groq always requires one.
pub fn create_provider(
    config: &LlmConfig,
    api_key: Option<String>,
) -> Result<Box<dyn LlmProvider>> {
    let timeout = config.timeout_secs.map(Duration::from_secs);

    match config.provider.to_lowercase().as_str() {
        "groq" => {
            let Some(api_key) = api_key else {
                return Err(ConfigError::MissingApiKey(DEFAULT_API_KEY_ENV.to_string()).into());
            };
            let base_url = config.base_url.as_deref().unwrap_or(GROQ_API_URL);
            let p = GroqProvider::with_endpoint(api_key, base_url, timeout)?
                .with_model(&config.model)
                .with_max_tokens(config.max_tokens)
                .with_temperature(config.temperature);
            Ok(Box::new(p))
        }
        "openai_compat" | "openai-compat" | "openai" => {
            let Some(base_url) = config.base_url.as_deref() else {
                anyhow::bail!("llm.base_url is required for the openai_compat provider");
            };
            let auth = match api_key {
                Some(key) => AuthMethod::BearerToken(key),
                None => AuthMethod::None,
            };
            let mut cfg = OpenAiCompatConfig::new("openai_compat", base_url, auth)
                .with_model(&config.model)
                .with_max_tokens(config.max_tokens)
                .with_temperature(config.temperature);
            if let Some(timeout) = timeout {
                cfg = cfg.with_timeout(timeout);
            }
            Ok(Box::new(OpenAiCompatProvider::new(cfg)?))
        }
        _ => anyhow::bail!(
            "Unknown LLM provider: {}. Supported: groq, openai_compat",
            config.provider
        ),
    }
}
