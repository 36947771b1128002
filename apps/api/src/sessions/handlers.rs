//! Axum route handlers for chat history and session management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::dialogue::state::ChatMessage;
use crate::errors::AppError;
use crate::models::session::SessionSummary;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<ChatMessage>,
}

/// GET /api/v1/chat/sessions/:user_id
pub async fn handle_list_sessions(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    Ok(Json(app.sessions.list_sessions(user_id.trim()).await?))
}

/// GET /api/v1/chat/history/:user_id/:session_id
pub async fn handle_history(
    State(app): State<AppState>,
    Path((user_id, session_id)): Path<(String, String)>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_HISTORY_LIMIT}"
        )));
    }
    let messages = app
        .sessions
        .history(user_id.trim(), session_id.trim(), limit)
        .await?;
    Ok(Json(HistoryResponse { messages }))
}

/// DELETE /api/v1/chat/sessions/:user_id/:session_id
///
/// Holds the session lock so an in-flight turn cannot resurrect the record.
pub async fn handle_delete_session(
    State(app): State<AppState>,
    Path((user_id, session_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let (user_id, session_id) = (user_id.trim(), session_id.trim());
    let _turn = app.session_locks.acquire(user_id, session_id).await;
    if app.sessions.delete_session(user_id, session_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}
