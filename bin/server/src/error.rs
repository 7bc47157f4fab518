//! Error types for the HTTP layer and server start-up.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lingo_tutor_tutor::TutorError;
use serde_json::json;
use std::fmt;

/// Errors returned from API handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The learner message was blank.
    EmptyMessage,
    /// The referenced session does not exist.
    SessionNotFound { id: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "No message provided"),
            Self::SessionNotFound { .. } => write!(f, "Session not found"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TutorError> for ApiError {
    fn from(err: TutorError) -> Self {
        match err {
            TutorError::EmptyMessage => Self::EmptyMessage,
            TutorError::SessionNotFound { id } => Self::SessionNotFound { id },
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::EmptyMessage => StatusCode::BAD_REQUEST,
            Self::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::SessionNotFound { id } = &self {
            tracing::debug!(session_id = %id, "session not found");
        }
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Errors that abort server start-up.
#[derive(Debug)]
pub enum StartupError {
    /// A required configuration value is absent or blank.
    ConfigurationMissing { key: &'static str },
    /// A configuration value is present but unusable.
    InvalidConfiguration { key: &'static str, reason: String },
    /// A provider client could not be constructed.
    ProviderInit {
        provider: &'static str,
        details: String,
    },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationMissing { key } => {
                write!(f, "required configuration '{key}' is missing")
            }
            Self::InvalidConfiguration { key, reason } => {
                write!(f, "invalid configuration '{key}': {reason}")
            }
            Self::ProviderInit { provider, details } => {
                write!(f, "failed to initialize {provider} client: {details}")
            }
        }
    }
}

impl std::error::Error for StartupError {}
