//! Concurrent session storage keyed by user

use super::{PlaylistUrlMatcher, Session, Stage, Transition};
use crate::types::{FlowKind, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Map of user → [`Session`]
///
/// Cloneable; clones share the same map. Every operation takes the lock once
/// and never holds it across an await of anything else, so sessions of
/// different users never wait on each other's extraction or pacing.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<UserId, Session>>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a user's session, if one exists
    pub async fn get(&self, user: UserId) -> Option<Session> {
        self.sessions.lock().await.get(&user).cloned()
    }

    /// Stage of a user's session ([`Stage::Idle`] when there is none)
    pub async fn stage(&self, user: UserId) -> Stage {
        self.sessions
            .lock()
            .await
            .get(&user)
            .map(Session::stage)
            .unwrap_or_default()
    }

    /// Begin a collection flow, replacing any unfinished one
    ///
    /// Returns `false` (and changes nothing) while the user's extraction is
    /// still running.
    pub async fn start_flow(&self, user: UserId, kind: FlowKind) -> bool {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(&user).map(Session::stage) == Some(Stage::Extracting) {
            return false;
        }
        sessions.insert(user, Session::start(kind));
        tracing::debug!(user = %user, kind = ?kind, "collection flow started");
        true
    }

    /// Apply a text reply to the user's session
    pub async fn apply(
        &self,
        user: UserId,
        text: &str,
        urls: &PlaylistUrlMatcher,
        default_batch_size: u32,
    ) -> Transition {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(user).or_default();
        let from = session.stage();
        let transition = session.advance(text, urls, default_batch_size);
        let to = session.stage();

        if to == Stage::Idle {
            // Idle sessions carry no data
            sessions.remove(&user);
        }
        if from != to {
            tracing::debug!(user = %user, from = ?from, to = ?to, "stage transition");
        }
        transition
    }

    /// Discard the user's session, returning it to Idle
    pub async fn clear(&self, user: UserId) -> Option<Session> {
        self.sessions.lock().await.remove(&user)
    }

    /// Discard the user's session without waiting for the lock
    ///
    /// Returns `false` when the store is locked by another task and nothing
    /// was changed. Usable from synchronous contexts such as `Drop`.
    pub fn try_clear(&self, user: UserId) -> bool {
        match self.sessions.try_lock() {
            Ok(mut sessions) => {
                sessions.remove(&user);
                true
            }
            Err(_) => false,
        }
    }

    /// Number of users with a non-idle session
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether no user has a session
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
