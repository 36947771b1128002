//! Session Store: durable (user, session) → dialogue state, plus chat history.
//!
//! `AppState` holds an `Arc<dyn SessionStore>`; production uses PostgreSQL.
//! Turns for one session are serialized with `SessionLocks` because a turn
//! is a read-modify-write of the whole state record.

pub mod handlers;
pub mod locks;
#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::dialogue::state::{ChatMessage, DialogueState};
use crate::models::session::SessionSummary;

pub use locks::SessionLocks;
pub use postgres::PgSessionStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed. Propagated to the caller unchanged.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored record could not be decoded into its expected shape.
    #[error("Corrupt session record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<DialogueState>, StoreError>;

    /// Stores the new state and appends the turn's messages to the history
    /// as one unit. On error neither write is visible.
    async fn commit_turn(
        &self,
        user_id: &str,
        session_id: &str,
        state: &DialogueState,
        new_messages: &[ChatMessage],
    ) -> Result<(), StoreError>;

    /// The most recent `limit` messages, oldest first.
    async fn history(
        &self,
        user_id: &str,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, StoreError>;

    /// Sessions with at least one message, most recently active first.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, StoreError>;

    /// Removes the state record and the history. Returns false if neither existed.
    async fn delete_session(&self, user_id: &str, session_id: &str) -> Result<bool, StoreError>;
}
