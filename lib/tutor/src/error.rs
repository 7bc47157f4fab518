//! Error types for tutoring operations.
//!
//! Only caller mistakes are errors here. Provider failures are absorbed by
//! the turn orchestrator and never surface through this type.

use lingo_tutor_conversation::SessionError;
use std::fmt;

/// Errors reported to the caller of the tutoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TutorError {
    /// The learner message was blank.
    EmptyMessage,
    /// The referenced session was never created or has expired.
    SessionNotFound { id: String },
}

impl fmt::Display for TutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "no message provided"),
            Self::SessionNotFound { id } => write!(f, "session not found: {id}"),
        }
    }
}

impl std::error::Error for TutorError {}

impl From<SessionError> for TutorError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound { id } => Self::SessionNotFound { id: id.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_converts_to_not_found() {
        let err: TutorError = SessionError::NotFound {
            id: "abc".parse().expect("should parse"),
        }
        .into();
        assert_eq!(
            err,
            TutorError::SessionNotFound {
                id: "abc".to_string()
            }
        );
    }

    #[test]
    fn empty_message_display() {
        assert_eq!(TutorError::EmptyMessage.to_string(), "no message provided");
    }
}
