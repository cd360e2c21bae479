//! SessionStore - per-agent conversation continuity
//!
//! One store per agent. Sessions are created lazily on first use of a
//! session id and live for the lifetime of the process; nothing evicts them.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::debug;

use crate::llm::Message;

/// Conversation state for one (agent, session id) pair
#[derive(Debug)]
pub struct Session {
    pub session_id: String,
    pub agent_name: String,
    pub created_at: DateTime<Utc>,
    history: Mutex<Vec<Message>>,
    turn: Mutex<()>,
}

impl Session {
    fn new(agent_name: &str, session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            agent_name: agent_name.to_string(),
            created_at: Utc::now(),
            history: Mutex::new(Vec::new()),
            turn: Mutex::new(()),
        }
    }

    /// Hold for the duration of one model call; a second caller on the same
    /// session waits until the first turn is recorded
    pub async fn begin_turn(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }

    /// Snapshot of prior turns
    pub async fn history(&self) -> Vec<Message> {
        self.history.lock().await.clone()
    }

    /// Append a completed user/assistant exchange
    pub async fn record_turn(&self, user: impl Into<String>, assistant: impl Into<String>) {
        let mut history = self.history.lock().await;
        history.push(Message::user(user));
        history.push(Message::assistant(assistant));
        debug!(session_id = %self.session_id, turns = history.len() / 2, "Session::record_turn: recorded");
    }

    /// Number of completed exchanges
    pub async fn turn_count(&self) -> usize {
        self.history.lock().await.len() / 2
    }
}

/// Maps session ids to sessions for a single agent
#[derive(Debug)]
pub struct SessionStore {
    agent_name: String,
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionStore {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Return the session for `session_id`, creating it on first use
    ///
    /// Concurrent callers racing on the same new id all observe the single
    /// session inserted by whichever acquired the write lock first.
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Session> {
        if let Some(session) = self.sessions.read().await.get(session_id) {
            debug!(agent = %self.agent_name, %session_id, "get_or_create: existing session");
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!(agent = %self.agent_name, %session_id, "get_or_create: creating session");
            Arc::new(Session::new(&self.agent_name, session_id))
        });
        Arc::clone(session)
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_returns_same_session() {
        let store = SessionStore::new("budget_agent");
        let a = store.get_or_create("s1").await;
        let b = store.get_or_create("s1").await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.agent_name, "budget_agent");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_ids_get_distinct_sessions() {
        let store = SessionStore::new("weather_agent");
        let a = store.get_or_create("s1").await;
        let b = store.get_or_create("s2").await;
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(store.contains("s2").await);
        assert!(!store.contains("s3").await);
    }

    #[tokio::test]
    async fn test_history_persists_across_lookups() {
        let store = SessionStore::new("itinerary_agent");
        store.get_or_create("s1").await.record_turn("plan", "{}").await;
        let session = store.get_or_create("s1").await;
        assert_eq!(session.turn_count().await, 1);
        assert_eq!(session.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_begin_turn_is_exclusive() {
        let store = SessionStore::new("weather_agent");
        let session = store.get_or_create("s1").await;
        let guard = session.begin_turn().await;
        assert!(session.turn.try_lock().is_err());
        drop(guard);
        assert!(session.turn.try_lock().is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_first_creator_wins() {
        let store = Arc::new(SessionStore::new("restaurant_agent"));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.get_or_create("race").await })
            })
            .collect();

        let mut sessions = Vec::new();
        for handle in handles {
            sessions.push(handle.await.unwrap());
        }

        assert_eq!(store.len().await, 1);
        assert!(sessions.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
