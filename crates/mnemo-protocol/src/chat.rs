//! Chat message types exchanged with completion backends.

use serde::{Deserialize, Serialize};

/// Role attached to a chat message sent downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// System framing for the completion call.
    System,
    /// Message authored by the user.
    User,
    /// Message authored by the assistant.
    Assistant,
}

impl ChatRole {
    /// Wire name for the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: ChatRole,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, ChatRole};
    use pretty_assertions::assert_eq;

    #[test]
    fn roles_serialize_under_their_wire_names() {
        for role in [ChatRole::System, ChatRole::User, ChatRole::Assistant] {
            let encoded = serde_json::to_string(&role).expect("encode");
            assert_eq!(encoded, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn constructors_set_the_matching_role() {
        assert_eq!(ChatMessage::system("s").role, ChatRole::System);
        assert_eq!(ChatMessage::user("u").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("a").role, ChatRole::Assistant);
    }
}
