//! Conversation-related types.
//!
//! The conversation history is owned by the caller. The agent only reads
//! it, and every turn it produces while answering one message is dropped
//! once the answer is returned.

use persona_agent_model::{ModelMessage, ToolCallResult};
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model.
    System,
    /// The visitor.
    User,
    /// The agent.
    Assistant,
    /// The output of a tool call.
    #[serde(rename = "tool")]
    ToolResult,
}

/// One role-tagged message in a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// The author of this turn.
    pub role: Role,
    /// The text of this turn.
    pub content: String,
    /// The tool call this turn answers, only meaningful for
    /// [`Role::ToolResult`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ConversationTurn {
    /// Creates a system turn.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user turn.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant turn.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Creates a tool result turn answering the call `id`.
    #[inline]
    pub fn tool_result<I: Into<String>, S: Into<String>>(
        id: I,
        content: S,
    ) -> Self {
        Self {
            role: Role::ToolResult,
            content: content.into(),
            tool_call_id: Some(id.into()),
        }
    }

    #[inline]
    fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub(crate) fn to_model_message(&self) -> ModelMessage {
        match self.role {
            Role::System => ModelMessage::System(self.content.clone()),
            Role::User => ModelMessage::User(self.content.clone()),
            Role::Assistant => ModelMessage::Assistant(self.content.clone()),
            Role::ToolResult => ModelMessage::Tool(ToolCallResult {
                id: self.tool_call_id.clone().unwrap_or_default(),
                content: self.content.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialize_turns() {
        let turns = vec![
            ConversationTurn::user("Hi"),
            ConversationTurn::tool_result("call_1", "{}"),
        ];
        assert_eq!(
            serde_json::to_value(&turns).unwrap(),
            json!([
                { "role": "user", "content": "Hi" },
                { "role": "tool", "content": "{}", "tool_call_id": "call_1" }
            ])
        );
    }

    #[test]
    fn test_deserialize_chat_widget_history() {
        let history: Vec<ConversationTurn> = serde_json::from_value(json!([
            { "role": "user", "content": "Who are you?" },
            { "role": "assistant", "content": "I'm Ada." }
        ]))
        .unwrap();
        assert_eq!(history[1], ConversationTurn::assistant("I'm Ada."));
    }

    #[test]
    fn test_to_model_message() {
        assert_eq!(
            ConversationTurn::tool_result("call_1", "done").to_model_message(),
            ModelMessage::Tool(ToolCallResult {
                id: "call_1".to_owned(),
                content: "done".to_owned(),
            })
        );
        assert_eq!(
            ConversationTurn::system("Be nice").to_model_message(),
            ModelMessage::System("Be nice".to_owned())
        );
    }
}
