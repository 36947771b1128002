pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::dialogue::handlers::handle_chat;
use crate::page_context::handlers::{handle_get_page_context, handle_update_page_context};
use crate::sessions::handlers::{handle_delete_session, handle_history, handle_list_sessions};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Chat API
        .route("/api/v1/chat", post(handle_chat))
        .route("/api/v1/chat/sessions/:user_id", get(handle_list_sessions))
        .route(
            "/api/v1/chat/sessions/:user_id/:session_id",
            delete(handle_delete_session),
        )
        .route(
            "/api/v1/chat/history/:user_id/:session_id",
            get(handle_history),
        )
        // Page context API
        .route(
            "/api/v1/page-context",
            post(handle_update_page_context).get(handle_get_page_context),
        )
        .with_state(state)
}
