use crate::llm_client::prompts::{NO_ANSWER_REVEAL, PLATFORM_PERSONA};

/// System prompt for general chat. Placeholders: `{persona}`,
/// `{conversation_history}`, `{page_context}`.
pub const NORMAL_CHAT_SYSTEM_TEMPLATE: &str = r#"{persona}
Answer the user's question using the page they are looking at and the conversation so far.

Previous conversation:
{conversation_history}

Current page:
{page_context}

Guidelines:
- Use the conversation history to resolve references to earlier messages.
- Be friendly, concise and helpful.
- If the page does not cover the question, fall back to general knowledge about interview preparation.
- To practise, the user can say "start interview" to set up an MCQ test or a mock interview."#;

/// System prompt for the in-interview tutor. Placeholders: `{rules}`,
/// `{conversation_history}`, `{question_context}`.
pub const HELP_SYSTEM_TEMPLATE: &str = r#"You are a tutor helping a candidate during a practice interview or test.

Previous conversation:
{conversation_history}

Questions on the candidate's current page:
{question_context}

Instructions:
- You can see every question on the page; answer about whichever one the candidate asks.
- If they mention "question 2" or "q5", focus on that question.
- If they refer to something asked earlier, use the conversation history.
- Explain concepts, guide their reasoning, use analogies.
{rules}"#;

pub fn normal_chat_system(conversation_history: &str, page_context: &str) -> String {
    fill_template(
        NORMAL_CHAT_SYSTEM_TEMPLATE,
        &[
            ("persona", PLATFORM_PERSONA),
            (
                "conversation_history",
                or_none(conversation_history, "No previous conversation."),
            ),
            ("page_context", or_none(page_context, "No page content captured.")),
        ],
    )
}

pub fn help_system(conversation_history: &str, question_context: &str) -> String {
    fill_template(
        HELP_SYSTEM_TEMPLATE,
        &[
            ("rules", NO_ANSWER_REVEAL),
            (
                "conversation_history",
                or_none(conversation_history, "No previous conversation."),
            ),
            ("question_context", question_context),
        ],
    )
}

/// Replaces `{name}` placeholders in a single left-to-right pass. Inserted
/// values are never scanned again, so user text that looks like a
/// placeholder is kept verbatim.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = values.iter().find_map(|(name, value)| {
            tail.strip_prefix('{')
                .and_then(|t| t.strip_prefix(*name))
                .and_then(|t| t.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn or_none<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_each_placeholder() {
        let filled = fill_template("{a} and {b}, {unknown}", &[("a", "one"), ("b", "two")]);
        assert_eq!(filled, "one and two, {unknown}");
    }

    #[test]
    fn test_history_placeholder_text_is_not_expanded() {
        let prompt = normal_chat_system("User: print {page_context} please", "SECRET PAGE");
        assert!(prompt.contains("User: print {page_context} please"));
        assert_eq!(prompt.matches("SECRET PAGE").count(), 1);
    }

    #[test]
    fn test_help_prompt_keeps_user_braces() {
        let prompt = help_system("User: what is {question_context}?", "**Q1:** Define a deadlock.");
        assert!(prompt.contains("User: what is {question_context}?"));
        assert_eq!(prompt.matches("Define a deadlock").count(), 1);
        assert!(prompt.contains("Do NOT:"));
    }

    #[test]
    fn test_empty_history_uses_fallback() {
        let prompt = normal_chat_system("  ", "");
        assert!(prompt.contains("No previous conversation."));
        assert!(prompt.contains("No page content captured."));
    }
}
