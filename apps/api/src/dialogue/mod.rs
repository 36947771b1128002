// Interview-setup chatbot.
// Routes each message to the setup flow, the in-interview help tutor, or general chat.
// The setup flow is pure; only the help and normal responders call the LLM.

pub mod engine;
pub mod handlers;
pub mod matchers;
pub mod params;
pub mod prompts;
pub mod responders;
pub mod router;
pub mod setup;
pub mod state;
pub mod steps;

use thiserror::Error;

use crate::errors::AppError;

#[derive(Debug, Error)]
pub enum DialogueError {
    /// The stored state could not have been produced by any sequence of turns.
    /// The caller resets the session instead of repairing it.
    #[error("Dialogue state integrity violation: {0}")]
    Integrity(String),

    #[error(transparent)]
    Collaborator(#[from] AppError),
}
