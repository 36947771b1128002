//! Keyword rules that turn free-text replies into typed answers.
//!
//! The controller only sees `AnswerMatcher`, so a stricter slot-filling parser
//! can replace `KeywordMatcher` without touching the step sequencing.

use crate::dialogue::params::{Answer, Difficulty, InterviewFormat, InterviewType};
use crate::dialogue::state::SetupStep;

pub const MIN_QUESTIONS: u32 = 1;
pub const MAX_QUESTIONS: u32 = 50;

const AFFIRMATIVE: &[&str] = &["yes", "y", "start", "go", "confirm", "proceed", "ok"];
const NEGATIVE: &[&str] = &["no", "n", "cancel", "restart"];

pub const SETUP_KEYWORDS: &[&str] = &[
    "start",
    "begin",
    "interview",
    "test",
    "mock",
    "setup",
    "configure",
    "create",
    "new interview",
    "want to",
    "need to",
];

pub const HELP_KEYWORDS: &[&str] = &[
    "explain",
    "what is",
    "don't understand",
    "help",
    "clarify",
    "tell me about",
    "how does",
    "hint",
    "clue",
    "question",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationReply {
    Commit,
    Cancel,
}

pub trait AnswerMatcher: Send + Sync {
    /// Parses a reply to a field step. `None` means the reply is invalid
    /// and the step must be asked again.
    fn match_answer(&self, step: SetupStep, message: &str) -> Option<Answer>;

    fn match_confirmation(&self, message: &str) -> Option<ConfirmationReply>;
}

/// Case-insensitive substring rules. First keyword in declaration order wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordMatcher;

impl AnswerMatcher for KeywordMatcher {
    fn match_answer(&self, step: SetupStep, message: &str) -> Option<Answer> {
        let trimmed = message.trim();
        let lower = trimmed.to_lowercase();

        match step {
            SetupStep::InterviewFormat => {
                if lower.contains("mcq") || lower.contains("test") {
                    Some(Answer::Format(InterviewFormat::Mcq))
                } else if lower.contains("mock") || lower.contains("interview") {
                    Some(Answer::Format(InterviewFormat::Mock))
                } else {
                    None
                }
            }
            SetupStep::InterviewType => InterviewType::ALL
                .into_iter()
                .find(|t| lower.contains(t.keyword()))
                .map(Answer::Type),
            SetupStep::Role => {
                (trimmed.chars().count() > 2).then(|| Answer::Role(trimmed.to_string()))
            }
            SetupStep::Difficulty => Difficulty::ALL
                .into_iter()
                .find(|d| lower.contains(d.keyword()))
                .map(Answer::Difficulty),
            SetupStep::NumQuestions => first_integer(trimmed)
                .filter(|n| (MIN_QUESTIONS..=MAX_QUESTIONS).contains(n))
                .map(Answer::NumQuestions),
            SetupStep::TargetCompanies => {
                (!trimmed.is_empty()).then(|| Answer::TargetCompanies(trimmed.to_string()))
            }
            SetupStep::JobDescription => {
                (!trimmed.is_empty()).then(|| Answer::JobDescription(trimmed.to_string()))
            }
            SetupStep::Confirmation => None,
        }
    }

    fn match_confirmation(&self, message: &str) -> Option<ConfirmationReply> {
        let token = message.trim().to_lowercase();
        if AFFIRMATIVE.contains(&token.as_str()) {
            Some(ConfirmationReply::Commit)
        } else if NEGATIVE.contains(&token.as_str()) {
            Some(ConfirmationReply::Cancel)
        } else {
            None
        }
    }
}

/// First run of ASCII digits in `text`. A run too large for `u32` yields `None`.
fn first_integer(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

pub fn is_setup_request(lower_message: &str) -> bool {
    SETUP_KEYWORDS.iter().any(|k| lower_message.contains(k))
}

pub fn is_help_request(lower_message: &str) -> bool {
    HELP_KEYWORDS.iter().any(|k| lower_message.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(step: SetupStep, message: &str) -> Option<Answer> {
        KeywordMatcher.match_answer(step, message)
    }

    #[test]
    fn test_format_keywords() {
        assert_eq!(
            answer(SetupStep::InterviewFormat, "MCQ please"),
            Some(Answer::Format(InterviewFormat::Mcq))
        );
        assert_eq!(
            answer(SetupStep::InterviewFormat, "a quick test"),
            Some(Answer::Format(InterviewFormat::Mcq))
        );
        assert_eq!(
            answer(SetupStep::InterviewFormat, "Mock"),
            Some(Answer::Format(InterviewFormat::Mock))
        );
        assert_eq!(
            answer(SetupStep::InterviewFormat, "a real interview"),
            Some(Answer::Format(InterviewFormat::Mock))
        );
        assert_eq!(answer(SetupStep::InterviewFormat, "banana"), None);
    }

    #[test]
    fn test_format_mcq_checked_before_mock() {
        assert_eq!(
            answer(SetupStep::InterviewFormat, "mock test"),
            Some(Answer::Format(InterviewFormat::Mcq))
        );
    }

    #[test]
    fn test_interview_type_is_title_cased() {
        assert_eq!(
            answer(SetupStep::InterviewType, "I'd like CASE STUDY"),
            Some(Answer::Type(InterviewType::CaseStudy))
        );
        assert_eq!(answer(SetupStep::InterviewType, "trivia"), None);
    }

    #[test]
    fn test_interview_type_first_declared_wins() {
        assert_eq!(
            answer(SetupStep::InterviewType, "coding or technical"),
            Some(Answer::Type(InterviewType::Technical))
        );
    }

    #[test]
    fn test_role_requires_more_than_two_chars() {
        assert_eq!(answer(SetupStep::Role, "  QA  "), None);
        assert_eq!(
            answer(SetupStep::Role, "  SRE "),
            Some(Answer::Role("SRE".to_string()))
        );
    }

    #[test]
    fn test_difficulty() {
        assert_eq!(
            answer(SetupStep::Difficulty, "Medium"),
            Some(Answer::Difficulty(Difficulty::Medium))
        );
        assert_eq!(answer(SetupStep::Difficulty, "banana"), None);
    }

    #[test]
    fn test_num_questions_range() {
        assert_eq!(
            answer(SetupStep::NumQuestions, "10"),
            Some(Answer::NumQuestions(10))
        );
        assert_eq!(
            answer(SetupStep::NumQuestions, "give me 25 questions"),
            Some(Answer::NumQuestions(25))
        );
        assert_eq!(answer(SetupStep::NumQuestions, "1"), Some(Answer::NumQuestions(1)));
        assert_eq!(answer(SetupStep::NumQuestions, "50"), Some(Answer::NumQuestions(50)));
        assert_eq!(answer(SetupStep::NumQuestions, "0"), None);
        assert_eq!(answer(SetupStep::NumQuestions, "51"), None);
        assert_eq!(answer(SetupStep::NumQuestions, "ten"), None);
        assert_eq!(answer(SetupStep::NumQuestions, "99999999999999999999"), None);
    }

    #[test]
    fn test_free_text_steps_accept_anything_non_empty() {
        assert_eq!(
            answer(SetupStep::TargetCompanies, "Google, Meta"),
            Some(Answer::TargetCompanies("Google, Meta".to_string()))
        );
        assert_eq!(answer(SetupStep::JobDescription, "   "), None);
    }

    #[test]
    fn test_confirmation_tokens() {
        for token in ["yes", "Y", " ok ", "Proceed", "go"] {
            assert_eq!(
                KeywordMatcher.match_confirmation(token),
                Some(ConfirmationReply::Commit),
                "{token}"
            );
        }
        for token in ["no", "N", "cancel", "restart"] {
            assert_eq!(
                KeywordMatcher.match_confirmation(token),
                Some(ConfirmationReply::Cancel),
                "{token}"
            );
        }
        assert_eq!(KeywordMatcher.match_confirmation("yes please"), None);
        assert_eq!(KeywordMatcher.match_confirmation("maybe"), None);
    }

    #[test]
    fn test_intent_keywords() {
        assert!(is_setup_request("i want to start a mock"));
        assert!(!is_setup_request("hello there"));
        assert!(is_help_request("can you explain question 2"));
        assert!(!is_help_request("thanks"));
    }
}
