//! Error types for the conversation crate.

use lingo_tutor_core::SessionId;
use std::fmt;

/// Errors from session store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session was never created or has already expired.
    NotFound { id: SessionId },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "session not found: {id}"),
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_display() {
        let id: SessionId = "sess-1".parse().expect("should parse");
        let err = SessionError::NotFound { id };
        assert_eq!(err.to_string(), "session not found: sess-1");
    }
}
