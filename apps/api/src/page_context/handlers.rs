//! Axum route handlers for page context capture.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::page_context::{PageContext, PageQuestion};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageContextUpdate {
    pub user_id: String,
    pub question: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    pub page_type: Option<String>,
    pub full_text: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub all_questions: Vec<PageQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

/// POST /api/v1/page-context
pub async fn handle_update_page_context(
    State(app): State<AppState>,
    Json(update): Json<PageContextUpdate>,
) -> Result<StatusCode, AppError> {
    if update.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }
    let context = PageContext {
        question: update.question,
        options: update.options,
        page_type: update.page_type,
        full_text: update.full_text,
        url: update.url,
        all_questions: update.all_questions,
        captured_at: Utc::now(),
    };
    app.page_contexts.put(update.user_id.trim(), &context).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/page-context
pub async fn handle_get_page_context(
    State(app): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<PageContext>, AppError> {
    app.page_contexts
        .get(query.user_id.trim())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No page context captured".to_string()))
}
