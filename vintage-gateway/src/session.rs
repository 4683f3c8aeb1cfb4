//! In-memory conversation session store.
//!
//! Process-wide map from caller-supplied session id to ordered turn
//! history. Entries are created lazily on first reference and removed
//! only by an explicit clear. Each session sits behind its own lock so
//! requests for different ids never block each other, while
//! append-and-read for the same id is serialized.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::chat::history::ChatMessage;

/// Ordered turn history for one session.
#[derive(Debug, Default)]
pub struct Session {
    turns: Vec<ChatMessage>,
}

impl Session {
    pub fn history(&self) -> &[ChatMessage] {
        &self.turns
    }

    /// Append a turn, dropping the oldest turns beyond `cap`.
    pub fn append(&mut self, turn: ChatMessage, cap: usize) {
        self.turns.push(turn);
        if self.turns.len() > cap {
            let excess = self.turns.len() - cap;
            self.turns.drain(..excess);
        }
    }
}

/// Process-wide session map.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Mutex<Session>>>>,
    max_history_turns: usize,
}

impl SessionStore {
    pub fn new(max_history_turns: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_history_turns,
        }
    }

    /// Turns kept per session before the oldest are dropped.
    pub fn max_history_turns(&self) -> usize {
        self.max_history_turns
    }

    /// Existing session handle, or a fresh empty one. The outer map
    /// lock is held only for the lookup.
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<Session>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id, "created session");
                Arc::new(Mutex::new(Session::default()))
            })
            .clone()
    }

    /// Remove a session entirely. Returns false when the id is
    /// unknown - reported as not-found, not an error.
    pub async fn clear(&self, session_id: &str) -> bool {
        self.sessions.lock().await.remove(session_id).is_some()
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.lock().await.contains_key(session_id)
    }
}
