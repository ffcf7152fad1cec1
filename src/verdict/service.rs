//! The verdict service: prompt, classify, normalize, fail open

use super::{build_prompt, ClassificationRequest, Decision, Verdict};
use crate::llm::{CompletionOptions, LlmProvider, Message};
use std::sync::Arc;
use std::time::Instant;

/// Token the classifier must produce for a page to be allowed
const ALLOW_TOKEN: &str = "ALLOWED";

/// Sampling settings for classification calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierOptions {
    pub temperature: f32,
    /// Enough for either token plus a little formatting noise
    pub max_tokens: usize,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 5,
        }
    }
}

impl From<ClassifierOptions> for CompletionOptions {
    fn from(opts: ClassifierOptions) -> Self {
        CompletionOptions {
            temperature: Some(opts.temperature),
            max_tokens: Some(opts.max_tokens),
        }
    }
}

/// Map a model reply onto a decision
///
/// The reply is trimmed and uppercased; anything containing `ALLOWED` is
/// allowed, everything else is blocked. This is substring containment, so
/// "NOT ALLOWED" is allowed too.
pub fn normalize(reply: &str) -> (Decision, String) {
    let raw = reply.trim().to_uppercase();
    let decision = if raw.contains(ALLOW_TOKEN) {
        Decision::Allowed
    } else {
        Decision::Blocked
    };
    (decision, raw)
}

/// Classifies pages against a goal using a shared LLM provider
#[derive(Clone)]
pub struct VerdictService {
    provider: Arc<dyn LlmProvider>,
    options: ClassifierOptions,
}

impl VerdictService {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            options: ClassifierOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ClassifierOptions) -> Self {
        self.options = options;
        self
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    pub fn options(&self) -> ClassifierOptions {
        self.options
    }

    /// Classify a request. Never fails: upstream errors yield an `Allowed`
    /// verdict carrying the error text.
    pub async fn verify(&self, request: &ClassificationRequest) -> Verdict {
        let prompt = build_prompt(request);
        let messages = [Message::user(prompt)];
        let options = CompletionOptions::from(self.options);
        let started = Instant::now();

        match self.provider.chat(&messages, &options).await {
            Ok(response) => {
                if let Some(usage) = response.usage {
                    tracing::debug!(
                        input_tokens = usage.input_tokens,
                        output_tokens = usage.output_tokens,
                        "Classifier token usage"
                    );
                }

                let (decision, raw) = normalize(&response.text);
                tracing::info!(
                    decision = %decision,
                    raw = %raw,
                    url = %request.url,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Page classified"
                );
                Verdict::classified(decision, raw)
            }
            Err(e) => {
                let mut description = e.to_string();
                if description.is_empty() {
                    description = "classifier request failed".to_string();
                }
                tracing::error!(
                    provider = self.provider.name(),
                    url = %request.url,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Classifier failed, allowing page: {}",
                    description
                );
                Verdict::fail_open(description)
            }
        }
    }
}
