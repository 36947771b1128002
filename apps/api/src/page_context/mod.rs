//! Page context: what the user's browser tab is currently showing.
//!
//! The frontend pushes the visible question(s) here so the help tutor can
//! refer to "question 3" without the user pasting it. Stored per user in
//! Redis with a TTL so it works across API replicas.

pub mod handlers;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContext {
    pub question: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    /// "MCQ" or "Mock" as reported by the page.
    pub page_type: Option<String>,
    pub full_text: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub all_questions: Vec<PageQuestion>,
    pub captured_at: DateTime<Utc>,
}

#[async_trait]
pub trait PageContextStore: Send + Sync {
    async fn put(&self, user_id: &str, context: &PageContext) -> Result<(), AppError>;
    async fn get(&self, user_id: &str) -> Result<Option<PageContext>, AppError>;
}

pub struct RedisPageContextStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisPageContextStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

fn page_key(user_id: &str) -> String {
    format!("page_context:{user_id}")
}

#[async_trait]
impl PageContextStore for RedisPageContextStore {
    async fn put(&self, user_id: &str, context: &PageContext) -> Result<(), AppError> {
        let payload = serde_json::to_string(context).map_err(|e| AppError::Internal(e.into()))?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(page_key(user_id), payload, self.ttl_secs)
            .await?;
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Option<PageContext>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(page_key(user_id)).await?;
        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(|e| AppError::Internal(e.into()))
    }
}
