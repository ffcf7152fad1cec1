//! Groq LLM provider implementation
//!
//! Groq serves open-weight models (Llama, Mixtral, Gemma) through an
//! OpenAI-compatible API with very low latency, which suits the one-word
//! classification replies the verdict service asks for.
//!
//! SECURITY: The GROQ_API_KEY is ONLY sent to the official Groq endpoint
//! unless an explicit base URL override is configured.

use super::{
    openai_compat::{AuthMethod, OpenAiCompatConfig, OpenAiCompatProvider},
    CompletionOptions, LlmProvider, LlmResponse, Message,
};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Official Groq chat completions endpoint
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default Groq model
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Groq provider using the common OpenAI-compatible layer
pub struct GroqProvider {
    inner: OpenAiCompatProvider,
}

impl GroqProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(api_key, GROQ_API_URL, None)
    }

    /// Create a provider against a specific endpoint (self-hosted proxies, tests)
    pub fn with_endpoint(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut config = OpenAiCompatConfig::new(
            "groq",
            base_url,
            AuthMethod::BearerToken(api_key.into()),
        )
        .with_model(GROQ_DEFAULT_MODEL)
        .with_max_tokens(5)
        .with_temperature(0.0);

        if let Some(timeout) = timeout {
            config = config.with_timeout(timeout);
        }

        Ok(Self {
            inner: OpenAiCompatProvider::new(config)?,
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.inner = self.inner.with_model(model);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.inner = self.inner.with_max_tokens(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.inner = self.inner.with_temperature(temperature);
        self
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn chat(&self, messages: &[Message], options: &CompletionOptions) -> Result<LlmResponse> {
        self.inner.chat(messages, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let provider = GroqProvider::new("gsk_test").unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.model(), GROQ_DEFAULT_MODEL);
    }

    #[test]
    fn test_with_model() {
        let provider = GroqProvider::new("gsk_test")
            .unwrap()
            .with_model("llama-3.3-70b-versatile");
        assert_eq!(provider.model(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_sampling_overrides_keep_model() {
        let provider = GroqProvider::new("gsk_test")
            .unwrap()
            .with_max_tokens(16)
            .with_temperature(0.3);
        assert_eq!(provider.model(), GROQ_DEFAULT_MODEL);
    }
}
