//! Generic OpenAI-compatible LLM provider
//!
//! Reusable provider for any API that follows the OpenAI chat completions
//! format (Groq, OpenAI, OpenRouter, local gateways).
//!
//! SECURITY: Credentials are only sent to the configured endpoint.

use super::{CompletionOptions, LlmError, LlmProvider, LlmResponse, Message, TokenUsage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Configuration Types
// ============================================================================

/// Authentication method for the API
#[derive(Clone)]
pub enum AuthMethod {
    /// Bearer token in Authorization header
    BearerToken(String),
    /// No authentication (local gateways)
    None,
}

// Keys must never end up in logs through a stray `{:?}`
impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::BearerToken(_) => f.write_str("BearerToken(***)"),
            AuthMethod::None => f.write_str("None"),
        }
    }
}

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    /// Provider name (e.g., "groq", "openai")
    pub name: String,
    /// Full URL of the chat completions endpoint
    pub base_url: String,
    /// Authentication method
    pub auth: AuthMethod,
    /// Default model to use
    pub default_model: String,
    /// Maximum output tokens when the request does not override it
    pub max_tokens: usize,
    /// Sampling temperature when the request does not override it
    pub temperature: Option<f32>,
    /// Client-side request timeout; `None` leaves reqwest's default (no timeout)
    pub timeout: Option<Duration>,
}

impl OpenAiCompatConfig {
    /// Create a new configuration with minimal required fields
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, auth: AuthMethod) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            auth,
            default_model: String::new(),
            max_tokens: 1024,
            temperature: None,
            timeout: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic OpenAI-compatible provider
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    config: OpenAiCompatConfig,
    model: String,
}

impl OpenAiCompatProvider {
    /// Create a new provider with the given configuration
    pub fn new(config: OpenAiCompatConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .with_context(|| format!("Failed to build HTTP client for {}", config.name))?;

        Ok(Self {
            client,
            model: config.default_model.clone(),
            config,
        })
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Default completion cap when a request does not set one
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Default sampling temperature when a request does not set one
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Get the current model
    pub fn model(&self) -> &str {
        &self.model
    }

    fn convert_messages(&self, messages: &[Message]) -> Vec<OpenAiMessage> {
        messages
            .iter()
            .map(|msg| OpenAiMessage {
                role: "user".to_string(),
                content: msg.content.clone(),
            })
            .collect()
    }

    /// Build the request body (Chat Completions format)
    fn build_request(&self, messages: &[Message], options: &CompletionOptions) -> OpenAiRequest {
        OpenAiRequest {
            model: self.model.clone(),
            messages: self.convert_messages(messages),
            temperature: options.temperature.or(self.config.temperature),
            max_tokens: Some(options.max_tokens.unwrap_or(self.config.max_tokens)),
        }
    }

    /// Build request with authorization headers
    fn build_http_request(&self, body: &OpenAiRequest) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .post(&self.config.base_url)
            .header("Content-Type", "application/json");

        match &self.config.auth {
            AuthMethod::BearerToken(token) => {
                req = req.header("Authorization", format!("Bearer {}", token));
            }
            AuthMethod::None => {}
        }

        req.json(body)
    }

    /// Extract the first choice's content
    ///
    /// A body without choices, or whose first choice has no content, is not a
    /// reply at all and is reported as `Malformed`. An empty string is a reply.
    fn parse_response(&self, response: OpenAiResponse) -> Result<LlmResponse, LlmError> {
        let usage = response.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            LlmError::Malformed(format!("{} API returned no choices", self.config.name))
        })?;
        let text = choice.message.content.ok_or_else(|| {
            LlmError::Malformed(format!(
                "{} API returned null content in first choice",
                self.config.name
            ))
        })?;

        Ok(LlmResponse { text, usage })
    }

    async fn chat_impl(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<LlmResponse, LlmError> {
        tracing::debug!(
            target: "llm",
            provider = %self.config.name,
            model = %self.model,
            messages = messages.len(),
            "Sending chat request"
        );

        let request = self.build_request(messages, options);
        let response = self
            .build_http_request(&request)
            .send()
            .await
            .map_err(LlmError::from_network_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_http_status(status, error_text));
        }

        let body = response
            .bytes()
            .await
            .map_err(LlmError::from_network_error)?;
        let api_response: OpenAiResponse = serde_json::from_slice(&body).map_err(|e| {
            LlmError::Malformed(format!("{} API returned unexpected body: {}", self.config.name, e))
        })?;

        self.parse_response(api_response)
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[Message], options: &CompletionOptions) -> Result<LlmResponse> {
        Ok(self.chat_impl(messages, options).await?)
    }
}

// ============================================================================
// OpenAI API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> OpenAiCompatProvider {
        OpenAiCompatProvider::new(
            OpenAiCompatConfig::new(
                "test",
                "https://api.example.com/v1/chat/completions",
                AuthMethod::BearerToken("key".into()),
            )
            .with_model("llama-3.1-8b-instant")
            .with_max_tokens(64),
        )
        .unwrap()
    }

    #[test]
    fn test_config_builder() {
        let config = OpenAiCompatConfig::new(
            "test",
            "https://api.example.com/v1/chat/completions",
            AuthMethod::BearerToken("test-key".into()),
        )
        .with_model("gpt-4o-mini")
        .with_max_tokens(5)
        .with_temperature(0.0)
        .with_timeout(Duration::from_secs(10));

        assert_eq!(config.name, "test");
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 5);
        assert_eq!(config.temperature, Some(0.0));
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_auth_debug_hides_key() {
        let auth = AuthMethod::BearerToken("gsk_secret".into());
        assert!(!format!("{:?}", auth).contains("gsk_secret"));
        assert_eq!(format!("{:?}", AuthMethod::None), "None");
    }

    #[test]
    fn test_build_request_uses_options() {
        let provider = test_provider();
        let request = provider.build_request(
            &[Message::user("classify this")],
            &CompletionOptions {
                temperature: Some(0.0),
                max_tokens: Some(5),
            },
        );

        assert_eq!(request.model, "llama-3.1-8b-instant");
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.max_tokens, Some(5));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["max_tokens"], 5);
    }

    #[test]
    fn test_build_request_falls_back_to_config() {
        let provider = test_provider();
        let request = provider.build_request(&[Message::user("hi")], &CompletionOptions::default());

        assert_eq!(request.max_tokens, Some(64));
        assert_eq!(request.temperature, None);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_provider_sampling_defaults() {
        let provider = test_provider().with_max_tokens(9).with_temperature(0.2);
        let request = provider.build_request(&[Message::user("hi")], &CompletionOptions::default());

        assert_eq!(request.max_tokens, Some(9));
        assert_eq!(request.temperature, Some(0.2));
    }

    #[test]
    fn test_parse_response() {
        let provider = test_provider();
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "ALLOWED"}}],
            "usage": {"prompt_tokens": 180, "completion_tokens": 2, "total_tokens": 182}
        }"#;
        let parsed: OpenAiResponse = serde_json::from_str(raw).unwrap();
        let response = provider.parse_response(parsed).unwrap();

        assert_eq!(response.text, "ALLOWED");
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(182));
    }

    #[test]
    fn test_parse_response_without_choices() {
        let provider = test_provider();
        let parsed: OpenAiResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = provider.parse_response(parsed).unwrap_err();

        assert!(matches!(err, LlmError::Malformed(_)));
        assert!(err.to_string().contains("no choices"));
    }

    #[test]
    fn test_parse_response_null_content() {
        let provider = test_provider();
        let parsed: OpenAiResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        let err = provider.parse_response(parsed).unwrap_err();

        assert!(matches!(err, LlmError::Malformed(_)));
        assert!(err.to_string().contains("null content"));
    }

    #[test]
    fn test_parse_response_empty_content_is_a_reply() {
        let provider = test_provider();
        let parsed: OpenAiResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": ""}}]}"#).unwrap();
        let response = provider.parse_response(parsed).unwrap();

        assert_eq!(response.text, "");
    }
}
