//! LLM-backed replies for messages that are not part of the setup flow.

use async_trait::async_trait;

use crate::dialogue::engine::TurnContext;
use crate::dialogue::prompts::{help_system, normal_chat_system};
use crate::dialogue::state::{ChatMessage, DialogueState, Role};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::page_context::PageQuestion;

const NORMAL_HISTORY_WINDOW: usize = 5;
const HELP_HISTORY_WINDOW: usize = 3;
const PAGE_TEXT_LIMIT: usize = 1500;

/// Produces the assistant reply for a routed message. The message being
/// answered is the last entry of `state.messages`.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, state: &DialogueState, ctx: &TurnContext) -> Result<String, AppError>;
}

pub struct NormalChatResponder {
    llm: LlmClient,
}

impl NormalChatResponder {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Responder for NormalChatResponder {
    async fn respond(&self, state: &DialogueState, ctx: &TurnContext) -> Result<String, AppError> {
        let message = current_message(state)?;
        let history = conversation_history(&state.messages, NORMAL_HISTORY_WINDOW);
        let page = ctx
            .page
            .as_ref()
            .and_then(|p| p.full_text.as_deref())
            .map(|text| truncate_chars(text, PAGE_TEXT_LIMIT))
            .unwrap_or_default();

        let system = normal_chat_system(&history, &page);
        self.llm
            .complete_text(message, &system)
            .await
            .map_err(|e| AppError::Llm(format!("Chat reply failed: {e}")))
    }
}

pub struct HelpResponder {
    llm: LlmClient,
}

impl HelpResponder {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Responder for HelpResponder {
    async fn respond(&self, state: &DialogueState, ctx: &TurnContext) -> Result<String, AppError> {
        let message = current_message(state)?;
        let history = conversation_history(&state.messages, HELP_HISTORY_WINDOW);
        let questions = ctx
            .page
            .as_ref()
            .map(|p| p.all_questions.as_slice())
            .unwrap_or_default();
        let fallback = ctx
            .current_question
            .as_deref()
            .or_else(|| ctx.page.as_ref().and_then(|p| p.question.as_deref()));

        let question_context =
            build_question_context(questions, requested_question_number(message), fallback);
        let system = help_system(&history, &question_context);

        let hint = self
            .llm
            .complete_text(message, &system)
            .await
            .map_err(|e| AppError::Llm(format!("Help reply failed: {e}")))?;

        Ok(format_hint(&hint, questions.len()))
    }
}

fn current_message(state: &DialogueState) -> Result<&str, AppError> {
    state
        .messages
        .last()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("no user message to answer")))
}

/// Up to `window` messages preceding the current one, oldest first.
pub fn conversation_history(messages: &[ChatMessage], window: usize) -> String {
    let prior = &messages[..messages.len().saturating_sub(1)];
    let start = prior.len().saturating_sub(window);
    prior[start..]
        .iter()
        .map(|m| {
            let speaker = match m.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{speaker}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 1-based question number from phrases like "question 3", "q 2", "Q#5".
pub fn requested_question_number(message: &str) -> Option<usize> {
    let lower = message.to_lowercase();
    for (idx, _) in lower.match_indices('q') {
        if lower[..idx]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            continue;
        }
        let rest = &lower[idx..];
        let Some(rest) = rest.strip_prefix("question").or_else(|| rest.strip_prefix('q')) else {
            continue;
        };
        let rest = rest.trim_start();
        let rest = rest.strip_prefix('#').unwrap_or(rest).trim_start();
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }
        if rest[digits.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            continue;
        }
        return digits.parse().ok();
    }
    None
}

/// The question block given to the tutor: one question in full if the user
/// named a valid number, otherwise a digest of every question on the page.
pub fn build_question_context(
    questions: &[PageQuestion],
    requested: Option<usize>,
    fallback: Option<&str>,
) -> String {
    if questions.is_empty() {
        return match fallback {
            Some(q) if !q.trim().is_empty() => format!("Current Question: {q}"),
            _ => "No question context available".to_string(),
        };
    }

    let total = questions.len();
    if let Some(n) = requested.filter(|n| (1..=total).contains(n)) {
        let q = &questions[n - 1];
        let mut out = format!("**Question {n}:** {}\n", q.question);
        if !q.options.is_empty() {
            out.push_str("\nOptions:\n");
            out.push_str(&lettered(&q.options, usize::MAX).join("\n"));
        }
        out.push_str(&format!(
            "\n\n_This is question {n} out of {total} total questions._"
        ));
        return out;
    }

    let mut out = format!("**All Questions on This Page ({total} total):**\n\n");
    for (i, q) in questions.iter().enumerate() {
        out.push_str(&format!("**Q{}:** {}\n", i + 1, truncate_chars(&q.question, 100)));
        if !q.options.is_empty() {
            let preview: Vec<_> = q.options.iter().take(2).cloned().collect();
            out.push_str(&format!("   {}\n", lettered(&preview, 50).join(" | ")));
        }
        out.push('\n');
    }
    out.push_str("_You can ask about any specific question by number (e.g., 'explain question 3')_");
    out
}

fn lettered(options: &[String], limit: usize) -> Vec<String> {
    options
        .iter()
        .zip('A'..='Z')
        .map(|(opt, letter)| format!("{letter}) {}", truncate_chars(opt, limit)))
        .collect()
}

fn format_hint(hint: &str, question_count: usize) -> String {
    let mut out = format!("**Here's a hint:**\n\n{hint}");
    if question_count > 0 {
        out.push_str(&format!(
            "\n\n_I can see all {question_count} questions. Ask about any of them by number!_"
        ));
    }
    out
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
