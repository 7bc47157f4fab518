//! Error types for the AI crate.
//!
//! - `LlmError`: completion provider failures
//! - `SpeechError`: speech provider failures
//!
//! Neither error reaches the learner as a failed turn: completion errors
//! become a fallback reply and speech errors become a reply without audio.

use std::fmt;

/// Errors from completion provider operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Provider could not be reached.
    ProviderUnavailable { provider: String, reason: String },
    /// Provider answered with a non-success status.
    RequestFailed { reason: String },
    /// Response parsing failed.
    ResponseParseFailed { reason: String },
    /// Timeout waiting for response.
    Timeout,
    /// Rate limit exceeded.
    RateLimited { retry_after_secs: Option<u64> },
    /// Invalid configuration.
    InvalidConfig { reason: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderUnavailable { provider, reason } => {
                write!(f, "LLM provider '{provider}' unavailable: {reason}")
            }
            Self::RequestFailed { reason } => {
                write!(f, "LLM request failed: {reason}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse LLM response: {reason}")
            }
            Self::Timeout => write!(f, "LLM request timed out"),
            Self::RateLimited { retry_after_secs } => {
                if let Some(secs) = retry_after_secs {
                    write!(f, "rate limited, retry after {secs}s")
                } else {
                    write!(f, "rate limited")
                }
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid LLM configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for LlmError {}

/// Errors from speech provider operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// Provider could not be reached or answered with an error.
    RequestFailed { reason: String },
    /// Timeout waiting for audio.
    Timeout,
    /// Invalid configuration.
    InvalidConfig { reason: String },
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { reason } => write!(f, "speech request failed: {reason}"),
            Self::Timeout => write!(f, "speech request timed out"),
            Self::InvalidConfig { reason } => {
                write!(f, "invalid speech configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for SpeechError {}
