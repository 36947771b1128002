//! Axum route handler for the chat endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dialogue::engine::TurnContext;
use crate::dialogue::params::InterviewParameters;
use crate::dialogue::state::{ChatMessage, DialogueState};
use crate::dialogue::DialogueError;
use crate::errors::AppError;
use crate::sessions::StoreError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub session_id: Option<String>,
    pub message: String,
    #[serde(default)]
    pub in_interview: bool,
    pub current_question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub interview_params: Option<InterviewParameters>,
    pub should_launch_interview: bool,
}

impl ChatResponse {
    fn from_state(session_id: String, state: DialogueState) -> Self {
        let should_launch_interview = state.launch_signal().is_some();
        Self {
            session_id,
            interview_params: state.committed_params,
            messages: state.messages,
            should_launch_interview,
        }
    }
}

/// POST /api/v1/chat
///
/// Runs one dialogue turn for (user, session) and persists the result.
/// A session id is minted when the client does not send one.
pub async fn handle_chat(
    State(app): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }
    if message.chars().count() > app.config.max_message_chars {
        return Err(AppError::Validation(format!(
            "Message too long. Maximum {} characters.",
            app.config.max_message_chars
        )));
    }
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }

    let session_id = request
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let _turn = app.session_locks.acquire(user_id, &session_id).await;

    let page = match app.page_contexts.get(user_id).await {
        Ok(page) => page,
        Err(e) => {
            warn!("Page context unavailable for user {user_id}: {e}");
            None
        }
    };
    let ctx = TurnContext {
        in_interview: request.in_interview,
        current_question: request.current_question.clone(),
        page,
    };

    let loaded = match app.sessions.load(user_id, &session_id).await {
        Ok(found) => found.unwrap_or_default(),
        Err(StoreError::Corrupt(reason)) => {
            warn!("Resetting session {session_id}: {reason}");
            return reset_session(&app, user_id, session_id, Vec::new(), message).await;
        }
        Err(e) => return Err(e.into()),
    };

    let before_turn = loaded.clone();
    let before = before_turn.messages.len();

    let next = match app.engine.process_turn(loaded, message, &ctx).await {
        Ok(next) => next,
        Err(DialogueError::Integrity(reason)) => {
            warn!("Resetting session {session_id}: {reason}");
            return reset_session(&app, user_id, session_id, before_turn.messages, message).await;
        }
        Err(DialogueError::Collaborator(e)) => {
            keep_user_message(&app, user_id, &session_id, before_turn, message).await;
            return Err(e);
        }
    };

    app.sessions
        .commit_turn(user_id, &session_id, &next, &next.messages[before..])
        .await?;

    let response = ChatResponse::from_state(session_id, next);
    info!(
        "Chat turn for session {}: launch={}",
        response.session_id, response.should_launch_interview
    );
    Ok(Json(response))
}

/// Forces the session back to idle with a restart notice, keeping whatever
/// transcript survived.
async fn reset_session(
    app: &AppState,
    user_id: &str,
    session_id: String,
    previous_messages: Vec<ChatMessage>,
    message: &str,
) -> Result<Json<ChatResponse>, AppError> {
    let mut state = DialogueState {
        messages: previous_messages,
        ..DialogueState::new()
    };
    let before = state.messages.len();
    state.messages.push(ChatMessage::user(message));
    state.reset_after_failure();

    app.sessions
        .commit_turn(user_id, &session_id, &state, &state.messages[before..])
        .await?;

    Ok(Json(ChatResponse::from_state(session_id, state)))
}

/// Records the user's message when no reply could be produced, so it stays
/// in the history. The state is otherwise left as it was before the turn.
async fn keep_user_message(
    app: &AppState,
    user_id: &str,
    session_id: &str,
    mut state: DialogueState,
    message: &str,
) {
    let user_message = ChatMessage::user(message);
    state.messages.push(user_message.clone());
    if let Err(e) = app
        .sessions
        .commit_turn(user_id, session_id, &state, &[user_message])
        .await
    {
        warn!("Could not record message for session {session_id}: {e}");
    }
}
