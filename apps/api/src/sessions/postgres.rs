use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::dialogue::state::{ChatMessage, DialogueState, Role};
use crate::models::session::{ChatMessageRow, SessionSummary};
use crate::sessions::{SessionStore, StoreError};

const MAX_LISTED_SESSIONS: i64 = 100;

pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn role_str(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

impl TryFrom<ChatMessageRow> for ChatMessage {
    type Error = StoreError;

    fn try_from(row: ChatMessageRow) -> Result<Self, Self::Error> {
        let role = match row.role.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            other => {
                return Err(StoreError::Corrupt(format!(
                    "message {} in {}/{} has unknown role '{other}'",
                    row.id, row.user_id, row.session_id
                )))
            }
        };
        Ok(ChatMessage {
            role,
            content: row.content,
            timestamp: row.created_at,
        })
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn load(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<DialogueState>, StoreError> {
        let raw: Option<serde_json::Value> = sqlx::query_scalar(
            "SELECT state FROM conversation_states WHERE user_id = $1 AND session_id = $2",
        )
        .bind(user_id)
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        raw.map(|value| {
            serde_json::from_value(value).map_err(|e| {
                StoreError::Corrupt(format!("state for session {session_id}: {e}"))
            })
        })
        .transpose()
    }

    async fn commit_turn(
        &self,
        user_id: &str,
        session_id: &str,
        state: &DialogueState,
        new_messages: &[ChatMessage],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO conversation_states (user_id, session_id, state, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_id, session_id)
            DO UPDATE SET state = EXCLUDED.state, updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(session_id)
        .bind(Json(state))
        .execute(&mut *tx)
        .await?;

        for message in new_messages {
            sqlx::query(
                r#"
                INSERT INTO chat_messages (id, user_id, session_id, role, content, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(session_id)
            .bind(role_str(message.role))
            .bind(&message.content)
            .bind(message.timestamp)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(
            "Committed turn for session {session_id} ({} new messages)",
            new_messages.len()
        );
        Ok(())
    }

    async fn history(
        &self,
        user_id: &str,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            SELECT * FROM chat_messages
            WHERE user_id = $1 AND session_id = $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().rev().map(ChatMessage::try_from).collect()
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, StoreError> {
        Ok(sqlx::query_as::<_, SessionSummary>(
            r#"
            SELECT session_id,
                   MAX(created_at) AS last_message_at,
                   COUNT(*)        AS message_count
            FROM chat_messages
            WHERE user_id = $1
            GROUP BY session_id
            ORDER BY last_message_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(MAX_LISTED_SESSIONS)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_session(&self, user_id: &str, session_id: &str) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        let messages = sqlx::query("DELETE FROM chat_messages WHERE user_id = $1 AND session_id = $2")
            .bind(user_id)
            .bind(session_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let states =
            sqlx::query("DELETE FROM conversation_states WHERE user_id = $1 AND session_id = $2")
                .bind(user_id)
                .bind(session_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        tx.commit().await?;

        info!("Deleted session {session_id} for user {user_id} ({messages} messages)");
        Ok(messages + states > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn row(role: &str) -> ChatMessageRow {
        ChatMessageRow {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            session_id: "s1".to_string(),
            role: role.to_string(),
            content: "hello".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_message() {
        let message = ChatMessage::try_from(row("assistant")).unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "hello");
    }

    #[test]
    fn test_unknown_role_is_corrupt() {
        assert!(matches!(
            ChatMessage::try_from(row("system")),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_role_str_round_trips_through_row() {
        for role in [Role::User, Role::Assistant] {
            let message = ChatMessage::try_from(row(role_str(role))).unwrap();
            assert_eq!(message.role, role);
        }
    }
}
