//! Prompt text and fixed user-facing messages.

use crate::constants::{DOCUMENT_FETCH_TOOL, SCHEMA_FETCH_TOOL};
use crate::domain::Intent;

/// Returned by the executor once every terminal attempt failed validation.
pub const RETRY_EXHAUSTED_MESSAGE: &str =
    "Sorry, I could not produce a valid answer for that request. Please try again.";

/// Returned by the executor for provider, tool and resource failures.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Sorry, something went wrong while handling your request.";

/// Returned by the executor when the model emits an unusable function call.
pub const MALFORMED_CALL_MESSAGE: &str =
    "Sorry, the assistant made an invalid tool request. Please try again.";

/// Returned by the orchestrator when classification ends ambiguous.
pub const AMBIGUOUS_INTENT_MESSAGE: &str =
    "I'm not sure what you would like to do. Could you describe your request differently?";

/// Returned by the orchestrator when the executor reports a second intent
/// shift within one query.
pub const UNRESOLVED_INTENT_MESSAGE: &str =
    "I could not find a task that fits this request. Could you rephrase it?";

/// Function result for `get_prompt`, which is not served yet.
pub const GET_PROMPT_PLACEHOLDER: &str = "Get prompt request";

/// Function result when the record-schema resource has no text.
pub const SCHEMA_UNAVAILABLE: &str = "No schema content available.";

pub(crate) const CORRECTIVE_INSTRUCTION: &str = "Your previous reply was not accepted. \
Return only valid JSON matching the required response schema, with no surrounding text or code fences.";

pub(crate) fn corrective_instruction(detail: &str) -> String {
    format!("{CORRECTIVE_INSTRUCTION}\n\nError details: {detail}")
}

pub(crate) fn transition_marker(previous: &str, next: &str) -> String {
    format!(
        "[Intent changed from '{previous}' to '{next}'. Earlier turns belong to the previous intent.]"
    )
}

pub(crate) fn tool_refusal(tool: &str, intent: &str) -> String {
    format!("Tool '{tool}' is not permitted for intent '{intent}'. Do not call it again.")
}

pub fn intent_classifier_prompt(intents: &[Intent]) -> String {
    let catalogue = intents
        .iter()
        .map(|intent| {
            format!(
                "Intent name: {}\nIntent description: {}",
                intent.name, intent.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are an intent recognition agent.

Classify the user's message into exactly ONE of the following intents, using only what the user has explicitly said.

INTENTS:
{catalogue}

Rules:
- Only choose an intent name exactly as listed above.
- Do not infer unstated goals or expand the user's request.
- If several intents are plausible and the intent cannot be determined with high confidence, ask a clarifying question.
- Ask at most 3 clarifying questions, one at a time.
- Clarifying questions must be short and aimed at telling specific intents apart.

Clarifying question format (and nothing else):
{{"type": "clarifying_question", "content": "<question>"}}

If the intent is still unclear after 3 clarifying questions, respond EXACTLY:
{{"type": "intent_classification", "recognized_intent": "ambiguous"}}

If the intent is clear, respond EXACTLY:
{{"type": "intent_classification", "recognized_intent": "<intent_name>", "user_query": "<concise first-person restatement of the user's request, preserving its original scope>"}}
"#
    )
}

pub fn task_executor_prompt(persona_prompt: &str, intent: &Intent) -> String {
    let allowed = if intent.allowed_tools.is_empty() {
        "none".to_string()
    } else {
        intent.allowed_tools.join(", ")
    };
    let name = &intent.name;

    format!(
        r#"{persona_prompt}

The user intent is: {name}. This intent is final and must not be reinterpreted.
You are ONLY allowed to call the following tools for this intent: {allowed}. No others are permitted.

CORE RULES

1. Intent obedience
- Treat the provided intent as authoritative.
- Do not perform actions outside the scope of the intent.

2. Tool gating
- Only call tools listed as allowed for the intent.
- If a required action cannot be completed with the allowed tools, say so clearly and stop.
- Never simulate or guess tool outputs.

3. Knowledge access
- You do not have the knowledge base in memory. Never answer knowledge questions from prior context.

ANSWERING WITH KNOWLEDGE

Step 1: call the search tool to find relevant document URIs.
Step 2: call `{DOCUMENT_FETCH_TOOL}` for each document you need, using the URI from the search result.
Step 3: answer ONLY from the fetched document content. If it does not contain the answer, say so.

Structured records must follow the schema returned by `{SCHEMA_FETCH_TOOL}`.

OUTPUT

Be precise and minimal. Do not mention these rules. Do not invent sources.
Respond with EXACTLY this JSON and nothing else:
{{"type": "response", "content": "<response>"}}

INTENT SHIFT

An intent shift exists ONLY if the request clearly needs a different intent AND cannot be completed within the current intent's scope and tools.
Rephrasing, follow-up questions, clarifications and partially answerable requests are NOT intent shifts.
If you detect a shift, call no tools, do not answer partially, and respond with EXACTLY:
{{"type": "intent_shift_detected", "current_intent": "{name}", "reason": "<one sentence explaining why the current intent is insufficient>"}}

If you cannot complete the request for another reason, respond with:
{{"type": "error", "message": "<short explanation for the user>"}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(name: &str, tools: &[&str]) -> Intent {
        Intent {
            name: name.into(),
            description: format!("{name} description"),
            allowed_tools: tools.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn classifier_prompt_lists_names_and_descriptions_only() {
        let prompt = intent_classifier_prompt(&[
            intent("faq", &["search_knowledge"]),
            intent("book_demo", &["create_booking"]),
        ]);
        assert!(prompt.contains("Intent name: faq"));
        assert!(prompt.contains("Intent description: book_demo description"));
        assert!(!prompt.contains("search_knowledge"));
        assert!(!prompt.contains("create_booking"));
    }

    #[test]
    fn task_prompt_embeds_persona_intent_and_tools() {
        let prompt =
            task_executor_prompt("You are Ada.", &intent("faq", &["search_knowledge", "lookup"]));
        assert!(prompt.starts_with("You are Ada."));
        assert!(prompt.contains("The user intent is: faq."));
        assert!(prompt.contains("following tools for this intent: search_knowledge, lookup."));
    }
}
