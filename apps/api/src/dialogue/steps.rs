//! The setup backbone as data: an ordered step table, one branch function,
//! and the text shown at each step.

use crate::dialogue::params::{InterviewDraft, InterviewFormat, InterviewParameters};
use crate::dialogue::state::SetupStep;

pub const SETUP_INTRO: &str = "**Let's set up your interview!**";
pub const CANCEL_ACK: &str = "No problem! Let me know when you'd like to start again.";

/// Field steps in collection order. `Confirmation` follows the last one
/// that applies to the chosen format.
pub const FIELD_STEPS: [SetupStep; 7] = [
    SetupStep::InterviewFormat,
    SetupStep::InterviewType,
    SetupStep::Role,
    SetupStep::Difficulty,
    SetupStep::NumQuestions,
    SetupStep::TargetCompanies,
    SetupStep::JobDescription,
];

/// Deployment-level shape of the backbone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupFlow {
    /// MCQ sessions ask for a focus/job description after target companies.
    pub mcq_asks_job_description: bool,
}

impl Default for SetupFlow {
    fn default() -> Self {
        Self {
            mcq_asks_job_description: true,
        }
    }
}

/// Step that follows `step` once its answer is stored in `draft`.
pub fn next_step(step: SetupStep, draft: &InterviewDraft, flow: &SetupFlow) -> SetupStep {
    match step {
        SetupStep::NumQuestions => match draft.interview_format {
            Some(InterviewFormat::Mcq) => SetupStep::TargetCompanies,
            _ => SetupStep::JobDescription,
        },
        SetupStep::TargetCompanies if !flow.mcq_asks_job_description => SetupStep::Confirmation,
        _ => FIELD_STEPS
            .iter()
            .position(|s| *s == step)
            .and_then(|i| FIELD_STEPS.get(i + 1))
            .copied()
            .unwrap_or(SetupStep::Confirmation),
    }
}

/// Question asked at a field step. Confirmation is rendered by `confirmation_prompt`.
pub fn prompt_for(step: SetupStep, draft: &InterviewDraft) -> String {
    match step {
        SetupStep::InterviewFormat => "Would you like to take an **MCQ Test** or a **Mock Interview**? \
             Please reply with 'MCQ' or 'Mock'."
            .to_string(),
        SetupStep::InterviewType => "What type of interview?\n\nOptions:\n• Technical\n• Behavioral\n\
             • Case Study\n• Coding\n• Aptitude\n• Reasoning\n\nPlease choose one:"
            .to_string(),
        SetupStep::Role => "What role/position are you preparing for?\n\n\
             (e.g., Software Engineer, Data Analyst, Product Manager)"
            .to_string(),
        SetupStep::Difficulty => {
            "What difficulty level?\n\nOptions:\n• Easy\n• Medium\n• Hard\n\nPlease choose one:"
                .to_string()
        }
        SetupStep::NumQuestions => {
            "How many questions would you like?\n\n(e.g., 5, 10, 15, 20)".to_string()
        }
        SetupStep::TargetCompanies => "**Which companies are you targeting?**\n\n\
             (e.g., FAANG, Google, Microsoft, Amazon)"
            .to_string(),
        SetupStep::JobDescription => match draft.interview_format {
            Some(InterviewFormat::Mock) => "**Please paste the full job description here:**".to_string(),
            _ => "**Brief job description or key skills to focus on?**\n\n\
                 (e.g., Backend development with Django and APIs)"
                .to_string(),
        },
        SetupStep::Confirmation => "**Ready to start?** (Reply with 'Yes' or 'No')".to_string(),
    }
}

pub fn confirmation_prompt(params: &InterviewParameters) -> String {
    format!(
        "**Great! Let me confirm your setup:**\n\n{}\n\n{}",
        params.summary_lines().join("\n"),
        prompt_for(SetupStep::Confirmation, &InterviewDraft::default())
    )
}

pub fn launch_message(params: &InterviewParameters) -> String {
    let label = match params.interview_format {
        InterviewFormat::Mcq => "MCQ test",
        InterviewFormat::Mock => "mock interview",
    };
    format!(
        "**Perfect!** Launching your {label}...\n\n\
         **Click the 'Start Interview' button below to begin!**"
    )
}

/// Correction prepended to the re-asked question after an invalid answer.
pub fn retry_hint(step: SetupStep) -> &'static str {
    match step {
        SetupStep::InterviewFormat => "Please choose either 'MCQ' or 'Mock'.",
        SetupStep::InterviewType => {
            "Please choose a valid interview type: Technical, Behavioral, Case Study, \
             Coding, Aptitude, or Reasoning."
        }
        SetupStep::Role => "Please enter a valid role name.",
        SetupStep::Difficulty => "Please choose: Easy, Medium, or Hard.",
        SetupStep::NumQuestions => "Please enter a valid number between 1 and 50.",
        SetupStep::TargetCompanies | SetupStep::JobDescription => {
            "Please type a short answer so the questions can be tailored."
        }
        SetupStep::Confirmation => "Please reply with 'Yes' to confirm or 'No' to cancel.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with(format: InterviewFormat) -> InterviewDraft {
        InterviewDraft {
            interview_format: Some(format),
            ..InterviewDraft::default()
        }
    }

    #[test]
    fn test_linear_backbone() {
        let draft = InterviewDraft::default();
        let flow = SetupFlow::default();
        assert_eq!(
            next_step(SetupStep::InterviewFormat, &draft, &flow),
            SetupStep::InterviewType
        );
        assert_eq!(next_step(SetupStep::InterviewType, &draft, &flow), SetupStep::Role);
        assert_eq!(next_step(SetupStep::Role, &draft, &flow), SetupStep::Difficulty);
        assert_eq!(
            next_step(SetupStep::Difficulty, &draft, &flow),
            SetupStep::NumQuestions
        );
        assert_eq!(
            next_step(SetupStep::JobDescription, &draft, &flow),
            SetupStep::Confirmation
        );
    }

    #[test]
    fn test_mcq_branches_to_target_companies() {
        let draft = draft_with(InterviewFormat::Mcq);
        assert_eq!(
            next_step(SetupStep::NumQuestions, &draft, &SetupFlow::default()),
            SetupStep::TargetCompanies
        );
    }

    #[test]
    fn test_mock_branches_to_job_description() {
        let draft = draft_with(InterviewFormat::Mock);
        assert_eq!(
            next_step(SetupStep::NumQuestions, &draft, &SetupFlow::default()),
            SetupStep::JobDescription
        );
    }

    #[test]
    fn test_short_mcq_flow_skips_job_description() {
        let draft = draft_with(InterviewFormat::Mcq);
        let short = SetupFlow {
            mcq_asks_job_description: false,
        };
        assert_eq!(
            next_step(SetupStep::TargetCompanies, &draft, &short),
            SetupStep::Confirmation
        );
        assert_eq!(
            next_step(SetupStep::TargetCompanies, &draft, &SetupFlow::default()),
            SetupStep::JobDescription
        );
    }

    #[test]
    fn test_job_description_prompt_depends_on_format() {
        let mock = prompt_for(SetupStep::JobDescription, &draft_with(InterviewFormat::Mock));
        let mcq = prompt_for(SetupStep::JobDescription, &draft_with(InterviewFormat::Mcq));
        assert!(mock.contains("full job description"));
        assert!(mcq.contains("key skills"));
    }
}
