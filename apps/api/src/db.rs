use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the chat tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS conversation_states (
            user_id     TEXT        NOT NULL,
            session_id  TEXT        NOT NULL,
            state       JSONB       NOT NULL,
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (user_id, session_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS chat_messages (
            id          UUID        PRIMARY KEY,
            user_id     TEXT        NOT NULL,
            session_id  TEXT        NOT NULL,
            role        TEXT        NOT NULL,
            content     TEXT        NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS chat_messages_session_idx
            ON chat_messages (user_id, session_id, created_at DESC)
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Chat schema ready");
    Ok(())
}
