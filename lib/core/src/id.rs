//! Session identifiers.
//!
//! A session identifier is an opaque token. The system generates UUIDv4
//! strings, but callers may also choose their own identifier on the first
//! turn; any non-blank string is accepted and kept verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Unique identifier for a tutoring session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new identifier from a random UUIDv4.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Interprets an optional caller-supplied identifier.
    ///
    /// Blank or missing values yield `None`, meaning "no session yet".
    #[must_use]
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|s| s.parse().ok())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                id_type: "SessionId",
                reason: "identifier is blank".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_uuid_shaped() {
        let id = SessionId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn generated_ids_are_unique() {
        use std::collections::HashSet;

        let ids: HashSet<SessionId> = (0..100).map(|_| SessionId::generate()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn caller_chosen_id_is_kept() {
        let id: SessionId = "my-session".parse().expect("should parse");
        assert_eq!(id.as_str(), "my-session");
    }

    #[test]
    fn blank_id_is_rejected() {
        let result: Result<SessionId, _> = "   ".parse();
        let err = result.unwrap_err();
        assert_eq!(err.id_type, "SessionId");
    }

    #[test]
    fn from_optional_treats_blank_as_absent() {
        assert_eq!(SessionId::from_optional(None), None);
        assert_eq!(SessionId::from_optional(Some("")), None);
        assert_eq!(
            SessionId::from_optional(Some("abc")),
            Some("abc".parse().expect("should parse"))
        );
    }

    #[test]
    fn id_serde_is_transparent() {
        let id: SessionId = "abc".parse().expect("should parse");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"abc\"");
    }
}
