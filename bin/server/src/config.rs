//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables. Nested keys
//! use `__` as the separator, e.g. `SESSION__TTL_SECONDS`.

use lingo_tutor_ai::{deepgram, groq};
use lingo_tutor_core::{DEFAULT_LANGUAGE, Proficiency};
use serde::Deserialize;

/// Server configuration composed from provider and session configs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Completion provider credential. Required at start-up.
    #[serde(default)]
    pub groq_api_key: Option<String>,

    /// Speech provider credential. Speech is disabled without it.
    #[serde(default)]
    pub deepgram_api_key: Option<String>,

    /// Completion provider settings.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Speech provider settings.
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Completion provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,

    #[serde(default = "default_completion_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Speech provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Age in seconds after which a session is swept.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,

    /// Interval between session cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Language used when a request omits one.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Proficiency used when a request omits one.
    #[serde(default)]
    pub default_proficiency: Proficiency,
}

fn default_bind_address() -> String {
    "127.0.0.1:5001".to_string()
}

fn default_completion_base_url() -> String {
    groq::DEFAULT_BASE_URL.to_string()
}

fn default_completion_model() -> String {
    groq::DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    groq::DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    groq::DEFAULT_MAX_TOKENS
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_speech_base_url() -> String {
    deepgram::DEFAULT_BASE_URL.to_string()
}

fn default_ttl_seconds() -> i64 {
    7200
}

fn default_cleanup_interval_seconds() -> u64 {
    3600
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_completion_base_url(),
            model: default_completion_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: default_speech_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            default_language: default_language(),
            default_proficiency: Proficiency::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present value cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    /// Loads configuration from the given environment source.
    ///
    /// # Errors
    ///
    /// Returns an error if a present value cannot be parsed.
    pub fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> ServerConfig {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_environment(config::Environment::default().source(Some(source)))
            .expect("configuration should load")
    }

    #[test]
    fn session_config_has_correct_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.ttl_seconds, 7200);
        assert_eq!(config.cleanup_interval_seconds, 3600);
        assert_eq!(config.default_language, "English");
        assert_eq!(config.default_proficiency, Proficiency::Beginner);
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]);
        assert_eq!(config.bind_address, "127.0.0.1:5001");
        assert_eq!(config.groq_api_key, None);
        assert_eq!(config.deepgram_api_key, None);
        assert_eq!(config.completion.model, "llama-3.1-8b-instant");
        assert_eq!(config.completion.max_tokens, 300);
        assert_eq!(config.completion.timeout_seconds, 30);
        assert_eq!(config.speech.base_url, "https://api.deepgram.com/v1");
    }

    #[test]
    fn nested_keys_override_defaults() {
        let config = load(&[
            ("GROQ_API_KEY", "gsk-test"),
            ("BIND_ADDRESS", "0.0.0.0:8080"),
            ("COMPLETION__MODEL", "llama-3.3-70b-versatile"),
            ("COMPLETION__TIMEOUT_SECONDS", "5"),
            ("SESSION__TTL_SECONDS", "60"),
            ("SESSION__DEFAULT_LANGUAGE", "Spanish"),
            ("SESSION__DEFAULT_PROFICIENCY", "advanced"),
        ]);
        assert_eq!(config.groq_api_key.as_deref(), Some("gsk-test"));
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.completion.model, "llama-3.3-70b-versatile");
        assert_eq!(config.completion.timeout_seconds, 5);
        assert_eq!(config.session.ttl_seconds, 60);
        assert_eq!(config.session.default_language, "Spanish");
        assert_eq!(config.session.default_proficiency, Proficiency::Advanced);
    }
}
