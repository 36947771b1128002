use std::sync::Arc;

use crate::config::Config;
use crate::dialogue::engine::ChatEngine;
use crate::page_context::PageContextStore;
use crate::sessions::{SessionLocks, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator is constructed once in `main` and swapped for fakes in tests.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub session_locks: SessionLocks,
    pub page_contexts: Arc<dyn PageContextStore>,
    pub engine: ChatEngine,
    pub config: Config,
}
