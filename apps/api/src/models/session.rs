use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ChatMessageRow {
    pub id: Uuid,
    pub user_id: String,
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One line of the "your conversations" list.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SessionSummary {
    pub session_id: String,
    pub last_message_at: DateTime<Utc>,
    pub message_count: i64,
}
