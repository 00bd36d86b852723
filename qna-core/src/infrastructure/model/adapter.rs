//! Message adapters - convert conversation turns to provider wire formats

use super::types::FunctionDeclaration;
use crate::domain::{ConversationTurn, Part};
use serde_json::{Value, json};

/// Adapter for converting conversations to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert turns to Gemini `contents`
    /// Returns: [{"role": "user"|"model", "parts": [...]}]
    pub fn to_gemini_contents(turns: &[ConversationTurn]) -> Vec<Value> {
        turns
            .iter()
            .map(|turn| {
                let parts: Vec<Value> = turn.parts.iter().map(Self::to_gemini_part).collect();
                json!({
                    "role": turn.role.as_str(),
                    "parts": parts,
                })
            })
            .collect()
    }

    fn to_gemini_part(part: &Part) -> Value {
        match part {
            Part::Text(text) => json!({ "text": text }),
            Part::FunctionCall { id, name, args } => json!({
                "functionCall": {
                    "id": id,
                    "name": name,
                    "args": args,
                }
            }),
            Part::FunctionResponse { id, name, result } => json!({
                "functionResponse": {
                    "id": id,
                    "name": name,
                    "response": { "result": result },
                }
            }),
        }
    }

    /// Convert declarations to Gemini `tools`; `None` when nothing is declared
    pub fn to_gemini_tools(declarations: &[FunctionDeclaration]) -> Option<Value> {
        if declarations.is_empty() {
            return None;
        }
        Some(json!([{ "functionDeclarations": declarations }]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn function_traffic_uses_gemini_part_names() {
        let mut args = Map::new();
        args.insert("query".into(), json!("refunds"));
        let turns = vec![
            ConversationTurn::user("What is the refund policy?"),
            ConversationTurn::function_call("call-1", "search_knowledge", args),
            ConversationTurn::function_response("call-1", "search_knowledge", "refunds.md"),
        ];

        let contents = MessageAdapter::to_gemini_contents(&turns);

        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "What is the refund policy?");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["functionCall"]["name"], "search_knowledge");
        assert_eq!(contents[1]["parts"][0]["functionCall"]["args"]["query"], "refunds");
        assert_eq!(contents[2]["parts"][0]["functionResponse"]["id"], "call-1");
        assert_eq!(
            contents[2]["parts"][0]["functionResponse"]["response"]["result"],
            "refunds.md"
        );
    }

    #[test]
    fn no_tools_means_no_tools_field() {
        assert!(MessageAdapter::to_gemini_tools(&[]).is_none());

        let tools = MessageAdapter::to_gemini_tools(&[FunctionDeclaration {
            name: "get_record_schema".into(),
            description: None,
            parameters: None,
        }])
        .expect("tools present");
        assert_eq!(tools[0]["functionDeclarations"][0]["name"], "get_record_schema");
        assert!(tools[0]["functionDeclarations"][0].get("parameters").is_none());
    }
}
