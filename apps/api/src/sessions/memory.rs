use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::dialogue::state::{ChatMessage, DialogueState};
use crate::models::session::SessionSummary;
use crate::sessions::{SessionStore, StoreError};

type Key = (String, String);

/// In-process store for tests. States are kept as JSON so tests can plant
/// records that fail to decode.
#[derive(Default)]
pub struct MemorySessionStore {
    states: RwLock<HashMap<Key, serde_json::Value>>,
    messages: RwLock<HashMap<Key, Vec<ChatMessage>>>,
    unavailable: AtomicBool,
}

fn key(user_id: &str, session_id: &str) -> Key {
    (user_id.to_string(), session_id.to_string())
}

impl MemorySessionStore {
    pub async fn insert_raw(&self, user_id: &str, session_id: &str, raw: serde_json::Value) {
        self.states.write().await.insert(key(user_id, session_id), raw);
    }

    /// Makes every later commit fail as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<DialogueState>, StoreError> {
        self.states
            .read()
            .await
            .get(&key(user_id, session_id))
            .cloned()
            .map(|raw| serde_json::from_value(raw).map_err(|e| StoreError::Corrupt(e.to_string())))
            .transpose()
    }

    async fn commit_turn(
        &self,
        user_id: &str,
        session_id: &str,
        state: &DialogueState,
        new_messages: &[ChatMessage],
    ) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let raw = serde_json::to_value(state).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let k = key(user_id, session_id);
        let mut states = self.states.write().await;
        let mut messages = self.messages.write().await;
        states.insert(k.clone(), raw);
        messages
            .entry(k)
            .or_default()
            .extend_from_slice(new_messages);
        Ok(())
    }

    async fn history(
        &self,
        user_id: &str,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.read().await;
        let all = messages
            .get(&key(user_id, session_id))
            .map(Vec::as_slice)
            .unwrap_or_default();
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(all[all.len().saturating_sub(limit)..].to_vec())
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, StoreError> {
        let messages = self.messages.read().await;
        let mut sessions: Vec<SessionSummary> = messages
            .iter()
            .filter(|((user, _), msgs)| user == user_id && !msgs.is_empty())
            .filter_map(|((_, session), msgs)| {
                msgs.iter().map(|m| m.timestamp).max().map(|last| SessionSummary {
                    session_id: session.clone(),
                    last_message_at: last,
                    message_count: msgs.len() as i64,
                })
            })
            .collect();
        sessions.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        Ok(sessions)
    }

    async fn delete_session(&self, user_id: &str, session_id: &str) -> Result<bool, StoreError> {
        let k = key(user_id, session_id);
        let had_state = self.states.write().await.remove(&k).is_some();
        let had_messages = self.messages.write().await.remove(&k).is_some();
        Ok(had_state || had_messages)
    }
}
