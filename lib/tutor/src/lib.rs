//! Tutoring turns for the lingo-tutor backend.
//!
//! This crate provides:
//!
//! - **Prompt Assembler**: the tutor system instruction built from session state
//! - **Turn Orchestrator**: prompt → completion → memory → optional speech
//! - **Tutor Service**: the operations exposed to HTTP handlers

pub mod error;
pub mod prompt;
pub mod service;
pub mod turn;

pub use error::TutorError;
pub use prompt::{CONVERSATION_START, PromptTemplate, build_system_prompt, welcome_message};
pub use service::{
    NewSessionRequest, NewSessionResponse, ResetRequest, ResolveSessionRequest,
    ResolveSessionResponse, SweepReport, TurnRequest, TurnResponse, TutorService,
};
pub use turn::{TurnOrchestrator, TurnOutcome, fallback_reply};
