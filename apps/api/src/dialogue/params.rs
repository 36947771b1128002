//! Interview parameters collected by the setup dialogue.
//!
//! `InterviewDraft` is the partially filled record carried between turns.
//! `InterviewParameters` is the complete record handed to question generation;
//! the only way to build one is `InterviewDraft::complete`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dialogue::state::SetupStep;
use crate::dialogue::steps::SetupFlow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewFormat {
    #[serde(rename = "MCQ")]
    Mcq,
    Mock,
}

impl fmt::Display for InterviewFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterviewFormat::Mcq => f.write_str("MCQ"),
            InterviewFormat::Mock => f.write_str("Mock"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewType {
    Technical,
    Behavioral,
    #[serde(rename = "Case Study")]
    CaseStudy,
    Coding,
    Aptitude,
    Reasoning,
}

impl InterviewType {
    /// Declaration order is also keyword match priority.
    pub const ALL: [InterviewType; 6] = [
        InterviewType::Technical,
        InterviewType::Behavioral,
        InterviewType::CaseStudy,
        InterviewType::Coding,
        InterviewType::Aptitude,
        InterviewType::Reasoning,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::CaseStudy => "case study",
            InterviewType::Coding => "coding",
            InterviewType::Aptitude => "aptitude",
            InterviewType::Reasoning => "reasoning",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InterviewType::Technical => "Technical",
            InterviewType::Behavioral => "Behavioral",
            InterviewType::CaseStudy => "Case Study",
            InterviewType::Coding => "Coding",
            InterviewType::Aptitude => "Aptitude",
            InterviewType::Reasoning => "Reasoning",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn keyword(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

/// A validated answer for one field step.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Format(InterviewFormat),
    Type(InterviewType),
    Role(String),
    Difficulty(Difficulty),
    NumQuestions(u32),
    TargetCompanies(String),
    JobDescription(String),
}

impl Answer {
    /// The step this answer fills.
    pub fn step(&self) -> SetupStep {
        match self {
            Answer::Format(_) => SetupStep::InterviewFormat,
            Answer::Type(_) => SetupStep::InterviewType,
            Answer::Role(_) => SetupStep::Role,
            Answer::Difficulty(_) => SetupStep::Difficulty,
            Answer::NumQuestions(_) => SetupStep::NumQuestions,
            Answer::TargetCompanies(_) => SetupStep::TargetCompanies,
            Answer::JobDescription(_) => SetupStep::JobDescription,
        }
    }
}

/// Fields collected so far. Exists only while a setup is in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_format: Option<InterviewFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_type: Option<InterviewType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_companies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

impl InterviewDraft {
    pub fn is_empty(&self) -> bool {
        *self == InterviewDraft::default()
    }

    pub fn clear(&mut self) {
        *self = InterviewDraft::default();
    }

    /// Whether the field collected at `step` is present.
    pub fn has(&self, step: SetupStep) -> bool {
        match step {
            SetupStep::InterviewFormat => self.interview_format.is_some(),
            SetupStep::InterviewType => self.interview_type.is_some(),
            SetupStep::Role => self.role.is_some(),
            SetupStep::Difficulty => self.difficulty.is_some(),
            SetupStep::NumQuestions => self.num_questions.is_some(),
            SetupStep::TargetCompanies => self.target_companies.is_some(),
            SetupStep::JobDescription => self.job_description.is_some(),
            SetupStep::Confirmation => false,
        }
    }

    pub fn store(&mut self, answer: Answer) {
        match answer {
            Answer::Format(v) => self.interview_format = Some(v),
            Answer::Type(v) => self.interview_type = Some(v),
            Answer::Role(v) => self.role = Some(v),
            Answer::Difficulty(v) => self.difficulty = Some(v),
            Answer::NumQuestions(v) => self.num_questions = Some(v),
            Answer::TargetCompanies(v) => self.target_companies = Some(v),
            Answer::JobDescription(v) => self.job_description = Some(v),
        }
    }

    /// Builds the complete parameter set, or `None` if any field required by
    /// the chosen format is missing. Fields the format does not ask for are dropped.
    pub fn complete(&self, flow: &SetupFlow) -> Option<InterviewParameters> {
        let interview_format = self.interview_format?;
        let (target_companies, job_description) = match interview_format {
            InterviewFormat::Mcq => {
                let companies = self.target_companies.clone()?;
                let description = if flow.mcq_asks_job_description {
                    Some(self.job_description.clone()?)
                } else {
                    None
                };
                (Some(companies), description)
            }
            InterviewFormat::Mock => (None, Some(self.job_description.clone()?)),
        };

        Some(InterviewParameters {
            interview_format,
            interview_type: self.interview_type?,
            role: self.role.clone()?,
            difficulty: self.difficulty?,
            num_questions: self.num_questions?,
            target_companies,
            job_description,
        })
    }
}

/// A fully validated, confirmed parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewParameters {
    pub interview_format: InterviewFormat,
    pub interview_type: InterviewType,
    pub role: String,
    pub difficulty: Difficulty,
    pub num_questions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_companies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

impl InterviewParameters {
    /// Labelled fields in collection order, for the confirmation summary.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("• **Interview Format**: {}", self.interview_format),
            format!("• **Interview Type**: {}", self.interview_type),
            format!("• **Role**: {}", self.role),
            format!("• **Difficulty**: {}", self.difficulty),
            format!("• **Num Questions**: {}", self.num_questions),
        ];
        if let Some(companies) = &self.target_companies {
            lines.push(format!("• **Target Companies**: {companies}"));
        }
        if let Some(description) = &self.job_description {
            lines.push(format!("• **Job Description**: {description}"));
        }
        lines
    }
}
