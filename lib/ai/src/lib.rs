//! AI provider primitives for the lingo-tutor backend.
//!
//! This crate provides the two external collaborators a tutoring turn uses:
//!
//! - **Completion Provider**: system prompt + learner message in, reply text out
//! - **Speech Provider**: reply text in, audio bytes out (or nothing)
//!
//! along with HTTP clients for Groq chat completions and Deepgram speech,
//! and the text-cleaning pass applied before synthesis.

pub mod backend;
pub mod deepgram;
pub mod error;
pub mod groq;
pub mod speech;

pub use backend::{Completion, CompletionProvider, CompletionRequest, TokenUsage};
pub use deepgram::{DeepgramClient, DeepgramConfig};
pub use error::{LlmError, SpeechError};
pub use groq::{GroqClient, GroqConfig};
pub use speech::{MAX_SPEECH_CHARS, SpeechProvider, clean_for_speech};
