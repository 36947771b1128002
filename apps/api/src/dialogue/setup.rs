//! Setup Dialogue Controller: collects interview parameters one step at a time,
//! asks for confirmation, then commits or discards them.

use std::sync::Arc;

use tracing::{debug, info};

use crate::dialogue::matchers::{AnswerMatcher, ConfirmationReply};
use crate::dialogue::params::{InterviewDraft, InterviewParameters};
use crate::dialogue::state::{DialogueState, Mode, SetupStep};
use crate::dialogue::steps::{
    confirmation_prompt, launch_message, next_step, prompt_for, retry_hint, SetupFlow, CANCEL_ACK,
    SETUP_INTRO,
};
use crate::dialogue::DialogueError;

#[derive(Clone)]
pub struct SetupController {
    matcher: Arc<dyn AnswerMatcher>,
    flow: SetupFlow,
}

impl SetupController {
    pub fn new(matcher: Arc<dyn AnswerMatcher>, flow: SetupFlow) -> Self {
        Self { matcher, flow }
    }

    pub fn flow(&self) -> &SetupFlow {
        &self.flow
    }

    /// Applies one user message to the setup flow and appends exactly one
    /// assistant message. Invalid answers re-ask the same step.
    pub fn advance(&self, state: &mut DialogueState, message: &str) -> Result<(), DialogueError> {
        match state.current_step {
            None => {
                self.begin(state);
                Ok(())
            }
            Some(SetupStep::Confirmation) => self.confirm(state, message),
            Some(step) => self.collect(state, step, message),
        }
    }

    fn begin(&self, state: &mut DialogueState) {
        state.draft_params.clear();
        state.committed_params = None;
        state.current_step = Some(SetupStep::InterviewFormat);
        state.awaiting_confirmation = false;
        state.mode = Mode::Setup;

        debug!("Setup started");
        let first = prompt_for(SetupStep::InterviewFormat, &state.draft_params);
        state.push_assistant(format!("{SETUP_INTRO}\n\n{first}"));
    }

    fn collect(
        &self,
        state: &mut DialogueState,
        step: SetupStep,
        message: &str,
    ) -> Result<(), DialogueError> {
        let answer = match self.matcher.match_answer(step, message) {
            Some(answer) if answer.step() == step => answer,
            _ => {
                debug!("Invalid answer for step '{}', re-asking", step.as_str());
                let prompt = prompt_for(step, &state.draft_params);
                state.push_assistant(format!("{}\n\n{prompt}", retry_hint(step)));
                return Ok(());
            }
        };

        let mut draft = state.draft_params.clone();
        draft.store(answer);
        let next = next_step(step, &draft, &self.flow);

        let prompt = if next == SetupStep::Confirmation {
            confirmation_prompt(&self.completed(&draft)?)
        } else {
            prompt_for(next, &draft)
        };

        debug!("Step '{}' accepted, next '{}'", step.as_str(), next.as_str());
        state.draft_params = draft;
        state.current_step = Some(next);
        state.awaiting_confirmation = next == SetupStep::Confirmation;
        state.push_assistant(prompt);
        Ok(())
    }

    fn confirm(&self, state: &mut DialogueState, message: &str) -> Result<(), DialogueError> {
        let params = self.completed(&state.draft_params)?;

        match self.matcher.match_confirmation(message) {
            Some(ConfirmationReply::Commit) => {
                info!(
                    "Interview setup committed: {} / {} / {} questions",
                    params.interview_format, params.interview_type, params.num_questions
                );
                let launch = launch_message(&params);
                state.committed_params = Some(params);
                self.finish(state);
                state.push_assistant(launch);
            }
            Some(ConfirmationReply::Cancel) => {
                info!("Interview setup cancelled");
                state.committed_params = None;
                self.finish(state);
                state.push_assistant(CANCEL_ACK);
            }
            None => {
                let hint = retry_hint(SetupStep::Confirmation);
                state.push_assistant(format!("{hint}\n\n{}", confirmation_prompt(&params)));
            }
        }
        Ok(())
    }

    fn finish(&self, state: &mut DialogueState) {
        state.draft_params.clear();
        state.current_step = None;
        state.awaiting_confirmation = false;
        state.mode = Mode::Idle;
    }

    fn completed(&self, draft: &InterviewDraft) -> Result<InterviewParameters, DialogueError> {
        draft.complete(&self.flow).ok_or_else(|| {
            DialogueError::Integrity("confirmation reached with incomplete parameters".to_string())
        })
    }
}
