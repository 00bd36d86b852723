use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One piece of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text(String),
    FunctionCall {
        id: String,
        name: String,
        args: Map<String, Value>,
    },
    FunctionResponse {
        id: String,
        name: String,
        result: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn function_call(
        id: impl Into<String>,
        name: impl Into<String>,
        args: Map<String, Value>,
    ) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::FunctionCall {
                id: id.into(),
                name: name.into(),
                args,
            }],
        }
    }

    pub fn function_response(
        id: impl Into<String>,
        name: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::FunctionResponse {
                id: id.into(),
                name: name.into(),
                result: result.into(),
            }],
        }
    }

    /// Concatenated text parts, ignoring function traffic.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Append-only turn log owned by a single agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Drops every turn. Only agents that own a scratch context call this.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.turns.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_skips_function_parts() {
        let turn = ConversationTurn {
            role: Role::Model,
            parts: vec![
                Part::Text("first ".into()),
                Part::FunctionCall {
                    id: "1".into(),
                    name: "search".into(),
                    args: Map::new(),
                },
                Part::Text("second".into()),
            ],
        };
        assert_eq!(turn.text(), "first second");
    }

    #[test]
    fn history_is_ordered_and_clearable() {
        let mut history = ConversationHistory::new();
        history.push(ConversationTurn::user("hi"));
        history.push(ConversationTurn::model("hello"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(history.last().map(ConversationTurn::text), Some("hello".into()));

        history.clear();
        assert!(history.is_empty());
    }
}
