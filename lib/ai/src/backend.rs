//! Completion provider abstraction.
//!
//! A completion provider takes a system instruction and one learner message
//! and returns the model's reply. Any failure surfaces as a single
//! [`LlmError`]; deciding what to do about it is the caller's business.

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A request to a completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System instruction.
    pub system: String,
    /// The learner's message.
    pub message: String,
}

impl CompletionRequest {
    /// Creates a request from a system instruction and a user message.
    #[must_use]
    pub fn new(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            message: message.into(),
        }
    }
}

/// A reply from a completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// The generated reply text.
    pub content: String,
    /// Token usage statistics.
    pub usage: TokenUsage,
    /// Model that generated the reply.
    pub model: String,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens.
    pub input_tokens: u32,
    /// Number of output tokens.
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Returns the total number of tokens.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Trait for completion providers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generates a reply for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails for any reason.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;

    /// Returns the model name.
    fn model(&self) -> &str;
}
