//! Process-wide session store.
//!
//! The store owns every [`SessionEntry`]. Map-level changes (insert, lookup,
//! delete, sweep) go through an async `RwLock`; each entry sits behind its
//! own `Mutex` so that at most one turn mutates a given session at a time
//! while turns for other sessions proceed concurrently.
//!
//! Nothing is persisted. A restart loses all sessions.

use crate::error::SessionError;
use crate::session::{SessionEntry, SessionSettings};
use chrono::{DateTime, Duration, Utc};
use lingo_tutor_core::SessionId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Sessions older than this are removed by a sweep (two hours).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7200;

/// Shared, exclusively-locked access to one session entry.
pub type SessionHandle = Arc<Mutex<SessionEntry>>;

/// Map slot; the creation time is copied out so sweeps never wait on an
/// entry lock held by an in-flight turn.
#[derive(Debug)]
struct SessionSlot {
    created_at: DateTime<Utc>,
    entry: SessionHandle,
}

/// The outcome of resolving a session identifier.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    /// Identifier of the resolved session.
    pub id: SessionId,
    /// Handle to the entry.
    pub handle: SessionHandle,
    /// Whether the entry was created by this call.
    pub is_new: bool,
}

/// Keyed registry of session entries.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionSlot>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating it if absent or unknown.
    ///
    /// An existing session is returned unchanged: `settings` only apply to
    /// sessions created by this call.
    pub async fn get_or_create(
        &self,
        id: Option<SessionId>,
        settings: SessionSettings,
    ) -> ResolvedSession {
        self.get_or_create_at(id, settings, Utc::now()).await
    }

    /// Like [`get_or_create`](Self::get_or_create) with an explicit creation time.
    pub async fn get_or_create_at(
        &self,
        id: Option<SessionId>,
        settings: SessionSettings,
        now: DateTime<Utc>,
    ) -> ResolvedSession {
        let id = id.unwrap_or_else(SessionId::generate);

        if let Some(handle) = self.get(&id).await {
            return ResolvedSession {
                id,
                handle,
                is_new: false,
            };
        }

        let mut sessions = self.sessions.write().await;
        match sessions.entry(id.clone()) {
            // Another turn created it between our read and write locks.
            Entry::Occupied(slot) => ResolvedSession {
                id,
                handle: Arc::clone(&slot.get().entry),
                is_new: false,
            },
            Entry::Vacant(vacant) => {
                let handle = Arc::new(Mutex::new(SessionEntry::new(id.clone(), settings)));
                vacant.insert(SessionSlot {
                    created_at: now,
                    entry: Arc::clone(&handle),
                });
                debug!(session_id = %id, "created session");
                ResolvedSession {
                    id,
                    handle,
                    is_new: true,
                }
            }
        }
    }

    /// Creates a session under a freshly generated identifier.
    pub async fn create(&self, settings: SessionSettings) -> ResolvedSession {
        self.get_or_create(None, settings).await
    }

    /// Looks up a session.
    pub async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(id).map(|slot| Arc::clone(&slot.entry))
    }

    /// Clears a session's memory, keeping its identity and settings.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if `id` is unknown.
    pub async fn reset(&self, id: &SessionId) -> Result<(), SessionError> {
        let handle = self
            .get(id)
            .await
            .ok_or_else(|| SessionError::NotFound { id: id.clone() })?;
        handle.lock().await.reset();
        debug!(session_id = %id, "reset session memory");
        Ok(())
    }

    /// Removes a session. Returns whether it existed.
    pub async fn delete(&self, id: &SessionId) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(id).is_some();
        if removed {
            debug!(session_id = %id, "deleted session");
        }
        removed
    }

    /// Removes every session whose age exceeds `ttl`, returning the count removed.
    pub async fn sweep_expired(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| now - slot.created_at <= ttl);
        let removed = before - sessions.len();
        if removed > 0 {
            info!(removed, remaining = sessions.len(), "swept expired sessions");
        }
        removed
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
