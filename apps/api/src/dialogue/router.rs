use crate::dialogue::matchers::{is_help_request, is_setup_request};
use crate::dialogue::state::{DialogueState, Mode};

/// Picks the mode that handles `message`.
///
/// A setup in progress owns every message until it commits or is cancelled,
/// the confirmation step included. Help keywords only count while the user
/// is inside an interview.
pub fn route(state: &DialogueState, message: &str, in_interview: bool) -> Mode {
    if state.mode == Mode::Setup && !state.awaiting_confirmation {
        return Mode::Setup;
    }
    if state.current_step.is_some() {
        return Mode::Setup;
    }

    let lower = message.to_lowercase();
    if in_interview && is_help_request(&lower) {
        Mode::Help
    } else if is_setup_request(&lower) {
        Mode::Setup
    } else {
        Mode::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::state::SetupStep;

    fn at_step(step: SetupStep) -> DialogueState {
        DialogueState {
            mode: Mode::Setup,
            current_step: Some(step),
            awaiting_confirmation: step == SetupStep::Confirmation,
            ..DialogueState::new()
        }
    }

    #[test]
    fn test_active_setup_swallows_everything() {
        let state = at_step(SetupStep::Role);
        assert_eq!(route(&state, "what is the weather", false), Mode::Setup);
        assert_eq!(route(&state, "explain this", true), Mode::Setup);
    }

    #[test]
    fn test_confirmation_stays_in_setup() {
        let state = at_step(SetupStep::Confirmation);
        assert_eq!(route(&state, "yes", false), Mode::Setup);
        assert_eq!(route(&state, "hint please", true), Mode::Setup);
    }

    #[test]
    fn test_setup_keywords_start_setup() {
        let state = DialogueState::new();
        assert_eq!(route(&state, "Start Interview", false), Mode::Setup);
        assert_eq!(route(&state, "I want to practice", false), Mode::Setup);
    }

    #[test]
    fn test_help_only_while_in_interview() {
        let state = DialogueState::new();
        assert_eq!(route(&state, "explain question 3", true), Mode::Help);
        assert_eq!(route(&state, "explain question 3", false), Mode::Normal);
    }

    #[test]
    fn test_help_wins_over_setup_keywords() {
        let state = DialogueState::new();
        assert_eq!(route(&state, "help me with this test", true), Mode::Help);
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(route(&DialogueState::new(), "hello!", false), Mode::Normal);
    }
}
