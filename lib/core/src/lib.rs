//! Core domain types and utilities for the lingo-tutor backend.
//!
//! This crate provides the foundational types, error handling, and the
//! static language table shared by the conversation, AI, and server crates.

pub mod error;
pub mod id;
pub mod language;

pub use error::Result;
pub use id::SessionId;
pub use language::{
    DEFAULT_LANGUAGE, DEFAULT_VOICE_MODEL, LanguageInfo, ParseProficiencyError, Proficiency,
    SUPPORTED_LANGUAGES, find_language, voice_model_for,
};
