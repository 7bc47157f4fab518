//! Tutoring service facade.
//!
//! `TutorService` is constructed once at start-up and shared by every
//! request handler. It owns the session store and the turn orchestrator and
//! exposes the operations the HTTP layer maps onto routes.

use crate::error::TutorError;
use crate::prompt::welcome_message;
use crate::turn::TurnOrchestrator;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Duration, Utc};
use lingo_tutor_conversation::{DEFAULT_SESSION_TTL_SECS, SessionSettings, SessionStore};
use lingo_tutor_core::{LanguageInfo, Proficiency, SUPPORTED_LANGUAGES, SessionId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Input for resolving (or creating) a session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub proficiency: Option<Proficiency>,
}

/// Output of resolving a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveSessionResponse {
    pub session_id: SessionId,
    pub is_new: bool,
}

/// Input for explicitly starting a new session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSessionRequest {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub proficiency: Option<Proficiency>,
}

/// Output of starting a new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSessionResponse {
    pub session_id: SessionId,
    pub welcome_message: String,
    pub language: String,
    pub proficiency: Proficiency,
}

/// Input for one chat turn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub proficiency: Option<Proficiency>,
    #[serde(default)]
    pub use_voice: bool,
}

/// Output of one chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnResponse {
    pub session_id: SessionId,
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
    pub language: String,
    pub proficiency: Proficiency,
}

/// Input for resetting a conversation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Output of a maintenance sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub removed_count: usize,
}

/// The tutoring backend's operations.
#[derive(Clone)]
pub struct TutorService {
    store: SessionStore,
    orchestrator: TurnOrchestrator,
    defaults: SessionSettings,
    ttl: Duration,
}

impl TutorService {
    /// Creates a service with an empty store, default settings and a two-hour TTL.
    #[must_use]
    pub fn new(orchestrator: TurnOrchestrator) -> Self {
        Self {
            store: SessionStore::new(),
            orchestrator,
            defaults: SessionSettings::default(),
            ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
        }
    }

    /// Sets the settings used when a request omits language or proficiency.
    #[must_use]
    pub fn with_defaults(mut self, defaults: SessionSettings) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the session time-to-live used by sweeps.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the session store.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns whether spoken replies can be produced.
    #[must_use]
    pub fn speech_enabled(&self) -> bool {
        self.orchestrator.speech_enabled()
    }

    fn settings_from(
        &self,
        language: Option<String>,
        proficiency: Option<Proficiency>,
    ) -> SessionSettings {
        let language = language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.defaults.language.clone());
        SessionSettings::new(language, proficiency.unwrap_or(self.defaults.proficiency))
    }

    /// Returns the session for the request, creating it when absent or unknown.
    pub async fn resolve_session(&self, request: ResolveSessionRequest) -> ResolveSessionResponse {
        let settings = self.settings_from(request.language, request.proficiency);
        let resolved = self
            .store
            .get_or_create(SessionId::from_optional(request.session_id.as_deref()), settings)
            .await;
        ResolveSessionResponse {
            session_id: resolved.id,
            is_new: resolved.is_new,
        }
    }

    /// Starts a session under a fresh identifier and greets the learner.
    pub async fn new_session(&self, request: NewSessionRequest) -> NewSessionResponse {
        let settings = self.settings_from(request.language, request.proficiency);
        let resolved = self.store.create(settings.clone()).await;
        info!(
            session_id = %resolved.id,
            language = %settings.language,
            proficiency = %settings.proficiency,
            "started new session"
        );
        NewSessionResponse {
            session_id: resolved.id,
            welcome_message: welcome_message(&settings.language, settings.proficiency),
            language: settings.language,
            proficiency: settings.proficiency,
        }
    }

    /// Runs one chat turn.
    ///
    /// # Errors
    ///
    /// Returns [`TutorError::EmptyMessage`] for a blank message, before any
    /// session is created or touched.
    pub async fn submit_turn(&self, request: TurnRequest) -> Result<TurnResponse, TutorError> {
        if request.message.trim().is_empty() {
            return Err(TutorError::EmptyMessage);
        }

        let settings = self.settings_from(request.language, request.proficiency);
        let resolved = self
            .store
            .get_or_create(SessionId::from_optional(request.session_id.as_deref()), settings)
            .await;

        // Held for the whole turn so same-session turns run one at a time.
        let mut entry = resolved.handle.lock().await;
        let outcome = self
            .orchestrator
            .handle_turn(&mut entry, &request.message, request.use_voice)
            .await?;

        debug!(
            session_id = %resolved.id,
            is_new = resolved.is_new,
            voice = outcome.audio.is_some(),
            "turn complete"
        );

        Ok(TurnResponse {
            session_id: resolved.id,
            reply: outcome.reply,
            audio_base64: outcome.audio.map(|audio| STANDARD.encode(audio)),
            language: entry.language().to_string(),
            proficiency: entry.proficiency(),
        })
    }

    /// Clears a session's conversation memory.
    ///
    /// # Errors
    ///
    /// Returns [`TutorError::SessionNotFound`] if the session is unknown.
    pub async fn reset(&self, request: ResetRequest) -> Result<(), TutorError> {
        let raw = request.session_id.unwrap_or_default();
        let id = SessionId::from_optional(Some(raw.as_str()))
            .ok_or(TutorError::SessionNotFound { id: raw })?;
        self.store.reset(&id).await?;
        info!(session_id = %id, "conversation reset");
        Ok(())
    }

    /// Removes a session. Returns whether it existed.
    pub async fn end_session(&self, session_id: &str) -> bool {
        match SessionId::from_optional(Some(session_id)) {
            Some(id) => self.store.delete(&id).await,
            None => false,
        }
    }

    /// Returns the supported-language table.
    #[must_use]
    pub fn languages(&self) -> &'static [LanguageInfo] {
        SUPPORTED_LANGUAGES
    }

    /// Removes sessions older than the configured TTL.
    pub async fn sweep_expired(&self) -> SweepReport {
        self.sweep_expired_at(Utc::now()).await
    }

    /// Removes sessions older than the configured TTL as of `now`.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> SweepReport {
        SweepReport {
            removed_count: self.store.sweep_expired(now, self.ttl).await,
        }
    }
}
