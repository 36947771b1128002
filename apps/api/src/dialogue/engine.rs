//! One chat turn: check the loaded state, record the user message, route it,
//! and let the setup controller or a responder produce the reply.

use std::sync::Arc;

use tracing::debug;

use crate::dialogue::responders::Responder;
use crate::dialogue::router::route;
use crate::dialogue::setup::SetupController;
use crate::dialogue::state::{ChatMessage, DialogueState, Mode};
use crate::dialogue::DialogueError;
use crate::page_context::PageContext;

/// Request-scoped facts that are not part of the persisted state.
#[derive(Debug, Clone, Default)]
pub struct TurnContext {
    pub in_interview: bool,
    pub current_question: Option<String>,
    pub page: Option<PageContext>,
}

/// Built once at start-up and shared through `AppState`.
#[derive(Clone)]
pub struct ChatEngine {
    setup: SetupController,
    help: Arc<dyn Responder>,
    normal: Arc<dyn Responder>,
}

impl ChatEngine {
    pub fn new(
        setup: SetupController,
        help: Arc<dyn Responder>,
        normal: Arc<dyn Responder>,
    ) -> Self {
        Self {
            setup,
            help,
            normal,
        }
    }

    /// Maps (old state, message) to the new state. The caller persists it.
    ///
    /// A structurally invalid `state` is rejected with
    /// `DialogueError::Integrity` before anything is appended.
    pub async fn process_turn(
        &self,
        mut state: DialogueState,
        message: &str,
        ctx: &TurnContext,
    ) -> Result<DialogueState, DialogueError> {
        state.check_integrity(self.setup.flow())?;

        let message = message.trim();
        state.messages.push(ChatMessage::user(message));

        let mode = route(&state, message, ctx.in_interview);
        debug!(
            "Routed message to {:?} (step {:?})",
            mode,
            state.current_step.map(|s| s.as_str())
        );

        if mode == Mode::Setup {
            self.setup.advance(&mut state, message)?;
            return Ok(state);
        }

        let responder = match mode {
            Mode::Help => &self.help,
            _ => &self.normal,
        };
        state.mode = mode;
        let reply = responder.respond(&state, ctx).await?;
        state.push_assistant(reply);
        state.mode = Mode::Idle;

        Ok(state)
    }
}
