//! Deepgram text-to-speech client.

use crate::error::SpeechError;
use crate::speech::{SpeechProvider, clean_for_speech};
use async_trait::async_trait;
use lingo_tutor_core::voice_model_for;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.deepgram.com/v1";
/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`DeepgramClient`].
#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    /// API key sent as `Authorization: Token <key>`.
    pub api_key: String,
    /// Base URL, without the `/speak` suffix.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl DeepgramConfig {
    /// Creates a configuration with the default endpoint and timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Speech provider backed by the Deepgram `speak` API.
#[derive(Debug, Clone)]
pub struct DeepgramClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
}

impl DeepgramClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::InvalidConfig`] if the API key is blank or the
    /// HTTP client cannot be built.
    pub fn new(config: DeepgramConfig) -> lingo_tutor_core::Result<Self, SpeechError> {
        if config.api_key.trim().is_empty() {
            return Err(SpeechError::InvalidConfig {
                reason: "API key is empty".to_string(),
            }
            .into());
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SpeechError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: format!("{}/speak", config.base_url.trim_end_matches('/')),
            api_key: config.api_key,
        })
    }

    /// Synthesizes already-cleaned text with the given voice model.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, timeout, or a non-success status.
    pub async fn speak(&self, text: &str, model: &str) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("model", model)])
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.api_key))
            .json(&SpeakRequest { text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpeechError::Timeout
                } else {
                    SpeechError::RequestFailed {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::RequestFailed {
                reason: format!("HTTP {status}: {body}"),
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::RequestFailed {
                reason: e.to_string(),
            })?;
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl SpeechProvider for DeepgramClient {
    #[instrument(skip(self, text))]
    async fn synthesize(&self, text: &str, language: &str) -> Option<Vec<u8>> {
        let cleaned = clean_for_speech(text);
        if cleaned.is_empty() {
            return None;
        }

        let model = voice_model_for(language);
        match self.speak(&cleaned, model).await {
            Ok(audio) => {
                debug!(model, bytes = audio.len(), "speech synthesized");
                Some(audio)
            }
            Err(e) => {
                warn!(error = %e, model, "speech synthesis failed");
                None
            }
        }
    }
}
