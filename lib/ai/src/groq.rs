//! Groq chat-completions client.
//!
//! Groq exposes an OpenAI-compatible `/chat/completions` endpoint. Each
//! tutoring turn sends one system message and one user message and reads
//! back the first choice.

use crate::backend::{Completion, CompletionProvider, CompletionRequest, TokenUsage};
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Default chat model.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default reply length cap.
pub const DEFAULT_MAX_TOKENS: u32 = 300;
/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "groq";

/// Configuration for [`GroqClient`].
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl GroqConfig {
    /// Creates a configuration with default endpoint, model and limits.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Completion provider backed by the Groq API.
#[derive(Debug, Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    endpoint: String,
    config: GroqConfig,
}

impl GroqClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::InvalidConfig`] if the API key is blank or the
    /// HTTP client cannot be built.
    pub fn new(config: GroqConfig) -> lingo_tutor_core::Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::InvalidConfig {
                reason: "API key is empty".to_string(),
            }
            .into());
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                reason: e.to_string(),
            })?;

        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));

        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    fn wire_request<'a>(&'a self, request: &'a CompletionRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.message,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: 1.0,
            stream: false,
        }
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.wire_request(request))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, endpoint = %self.endpoint, "completion request failed");
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::ProviderUnavailable {
                        provider: PROVIDER.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "completion endpoint returned error");
            return Err(status_error(status, &body, retry_after_secs));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "failed to parse completion response");
            LlmError::ResponseParseFailed {
                reason: e.to_string(),
            }
        })?;

        let completion = body.into_completion(&self.config.model)?;
        debug!(
            tokens = completion.usage.total(),
            chars = completion.content.len(),
            "completion received"
        );
        Ok(completion)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn status_error(status: StatusCode, body: &str, retry_after_secs: Option<u64>) -> LlmError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        LlmError::RateLimited { retry_after_secs }
    } else {
        LlmError::RequestFailed {
            reason: format!("HTTP {status}: {body}"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

impl ChatCompletionResponse {
    fn into_completion(self, requested_model: &str) -> Result<Completion, LlmError> {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::ResponseParseFailed {
                reason: "response contained no message content".to_string(),
            })?;

        let usage = self
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(Completion {
            content: content.trim().to_string(),
            usage,
            model: self.model.unwrap_or_else(|| requested_model.to_string()),
        })
    }
}
