//! Tutoring session entries.
//!
//! An entry couples one learner's conversation memory with the settings the
//! session was created with. Settings are fixed at creation time. The
//! creation timestamp lives in the store, next to the entry's lock.

use crate::memory::{ConversationMemory, Exchange};
use lingo_tutor_core::{DEFAULT_LANGUAGE, Proficiency, SessionId};
use serde::{Deserialize, Serialize};

/// Language and level a session tutors at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Target language display name (e.g. "Spanish").
    pub language: String,
    /// Learner proficiency.
    pub proficiency: Proficiency,
}

impl SessionSettings {
    /// Creates settings for a language and level.
    #[must_use]
    pub fn new(language: impl Into<String>, proficiency: Proficiency) -> Self {
        Self {
            language: language.into(),
            proficiency,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE, Proficiency::default())
    }
}

/// A single learner's conversation state.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    id: SessionId,
    settings: SessionSettings,
    memory: ConversationMemory,
}

impl SessionEntry {
    /// Creates a new entry with empty memory.
    #[must_use]
    pub fn new(id: SessionId, settings: SessionSettings) -> Self {
        Self {
            id,
            settings,
            memory: ConversationMemory::new(),
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the target language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.settings.language
    }

    /// Returns the learner proficiency.
    #[must_use]
    pub fn proficiency(&self) -> Proficiency {
        self.settings.proficiency
    }

    /// Returns the conversation memory.
    #[must_use]
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Records a completed exchange, evicting the oldest if memory is full.
    pub fn record_exchange(&mut self, exchange: Exchange) {
        self.memory.append(exchange);
    }

    /// Clears the memory, keeping identity and settings.
    pub fn reset(&mut self) {
        self.memory.clear();
    }
}
