//! Conversation state for the lingo-tutor backend.
//!
//! This crate provides:
//!
//! - **Conversation Memory**: bounded sliding window of exchanges
//! - **Session Entry**: one learner's memory plus tutoring settings
//! - **Session Store**: process-wide registry with expiry sweeps

pub mod error;
pub mod memory;
pub mod session;
pub mod store;

pub use error::SessionError;
pub use memory::{ConversationMemory, Exchange, MEMORY_CAPACITY, RECENT_CONTEXT_LEN};
pub use session::{SessionEntry, SessionSettings};
pub use store::{DEFAULT_SESSION_TTL_SECS, ResolvedSession, SessionHandle, SessionStore};
