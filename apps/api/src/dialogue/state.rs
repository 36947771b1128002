use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dialogue::params::{InterviewDraft, InterviewParameters};
use crate::dialogue::steps::{next_step, SetupFlow};
use crate::dialogue::DialogueError;

/// Shown when a turn cannot be applied and the setup has been reset.
pub const RESTART_NOTICE: &str =
    "Something went wrong on our side. Please restart the interview setup.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    Setup,
    Help,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupStep {
    InterviewFormat,
    InterviewType,
    Role,
    Difficulty,
    NumQuestions,
    TargetCompanies,
    JobDescription,
    Confirmation,
}

impl SetupStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetupStep::InterviewFormat => "interview_format",
            SetupStep::InterviewType => "interview_type",
            SetupStep::Role => "role",
            SetupStep::Difficulty => "difficulty",
            SetupStep::NumQuestions => "num_questions",
            SetupStep::TargetCompanies => "target_companies",
            SetupStep::JobDescription => "job_description",
            SetupStep::Confirmation => "confirmation",
        }
    }
}

/// Per-session conversation record. Persisted whole after every turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueState {
    pub messages: Vec<ChatMessage>,
    pub mode: Mode,
    pub current_step: Option<SetupStep>,
    pub draft_params: InterviewDraft,
    pub committed_params: Option<InterviewParameters>,
    pub awaiting_confirmation: bool,
}

impl DialogueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// The committed parameters, but only when they are safe to launch:
    /// mode is idle, no confirmation is pending, and a complete set exists.
    pub fn launch_signal(&self) -> Option<&InterviewParameters> {
        if self.mode == Mode::Idle && !self.awaiting_confirmation {
            self.committed_params.as_ref()
        } else {
            None
        }
    }

    /// Drops any setup progress and tells the user to start over.
    pub fn reset_after_failure(&mut self) {
        self.mode = Mode::Idle;
        self.current_step = None;
        self.awaiting_confirmation = false;
        self.draft_params.clear();
        self.committed_params = None;
        self.push_assistant(RESTART_NOTICE);
    }

    /// Rejects records that no sequence of turns could have produced.
    pub fn check_integrity(&self, flow: &SetupFlow) -> Result<(), DialogueError> {
        let in_setup = self.current_step.is_some() || self.awaiting_confirmation;
        if (self.mode == Mode::Setup) != in_setup {
            return Err(DialogueError::Integrity(format!(
                "mode {:?} inconsistent with step {:?} / awaiting_confirmation {}",
                self.mode, self.current_step, self.awaiting_confirmation
            )));
        }

        if self.awaiting_confirmation != (self.current_step == Some(SetupStep::Confirmation)) {
            return Err(DialogueError::Integrity(
                "awaiting_confirmation set outside the confirmation step".to_string(),
            ));
        }

        match self.current_step {
            None if !self.draft_params.is_empty() => Err(DialogueError::Integrity(
                "draft parameters present with no setup in progress".to_string(),
            )),
            None => Ok(()),
            Some(step) => self.check_draft_reaches(step, flow),
        }
    }

    /// Walks the backbone from the first step and requires every field
    /// before `target` to be filled.
    fn check_draft_reaches(&self, target: SetupStep, flow: &SetupFlow) -> Result<(), DialogueError> {
        let draft = &self.draft_params;
        let mut step = SetupStep::InterviewFormat;
        loop {
            if step == target {
                return Ok(());
            }
            if step == SetupStep::Confirmation {
                return Err(DialogueError::Integrity(format!(
                    "step '{}' is not reachable for the collected format",
                    target.as_str()
                )));
            }
            if !draft.has(step) {
                return Err(DialogueError::Integrity(format!(
                    "field '{}' missing before step '{}'",
                    step.as_str(),
                    target.as_str()
                )));
            }
            step = next_step(step, draft, flow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::params::{Difficulty, InterviewFormat, InterviewType};

    fn in_setup(step: SetupStep) -> DialogueState {
        DialogueState {
            mode: Mode::Setup,
            current_step: Some(step),
            awaiting_confirmation: step == SetupStep::Confirmation,
            ..DialogueState::new()
        }
    }

    #[test]
    fn test_new_state_is_idle_and_sound() {
        let state = DialogueState::new();
        assert_eq!(state.mode, Mode::Idle);
        assert!(state.check_integrity(&SetupFlow::default()).is_ok());
        assert!(state.launch_signal().is_none());
    }

    #[test]
    fn test_unknown_step_fails_to_deserialize() {
        let json = r#"{
            "messages": [], "mode": "setup", "current_step": "favourite_colour",
            "draft_params": {}, "committed_params": null, "awaiting_confirmation": false
        }"#;
        assert!(serde_json::from_str::<DialogueState>(json).is_err());
    }

    #[test]
    fn test_setup_mode_without_step_is_rejected() {
        let state = DialogueState {
            mode: Mode::Setup,
            ..DialogueState::new()
        };
        assert!(matches!(
            state.check_integrity(&SetupFlow::default()),
            Err(DialogueError::Integrity(_))
        ));
    }

    #[test]
    fn test_awaiting_outside_confirmation_is_rejected() {
        let mut state = in_setup(SetupStep::InterviewFormat);
        state.awaiting_confirmation = true;
        assert!(state.check_integrity(&SetupFlow::default()).is_err());
    }

    #[test]
    fn test_step_ahead_of_draft_is_rejected() {
        let state = in_setup(SetupStep::Difficulty);
        assert!(state.check_integrity(&SetupFlow::default()).is_err());
    }

    #[test]
    fn test_target_companies_unreachable_for_mock() {
        let mut state = in_setup(SetupStep::TargetCompanies);
        state.draft_params.interview_format = Some(InterviewFormat::Mock);
        state.draft_params.interview_type = Some(InterviewType::Coding);
        state.draft_params.role = Some("SRE".to_string());
        state.draft_params.difficulty = Some(Difficulty::Easy);
        state.draft_params.num_questions = Some(3);
        assert!(state.check_integrity(&SetupFlow::default()).is_err());
    }

    #[test]
    fn test_consistent_mid_setup_state_passes() {
        let mut state = in_setup(SetupStep::Role);
        state.draft_params.interview_format = Some(InterviewFormat::Mcq);
        state.draft_params.interview_type = Some(InterviewType::Technical);
        assert!(state.check_integrity(&SetupFlow::default()).is_ok());
    }

    #[test]
    fn test_reset_after_failure_forces_idle() {
        let mut state = in_setup(SetupStep::Role);
        state.draft_params.interview_format = Some(InterviewFormat::Mcq);
        state.reset_after_failure();
        assert_eq!(state.mode, Mode::Idle);
        assert_eq!(state.current_step, None);
        assert!(state.draft_params.is_empty());
        assert_eq!(state.messages.last().unwrap().content, RESTART_NOTICE);
    }
}
