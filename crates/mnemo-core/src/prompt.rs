//! Completion prompt construction.

use mnemo_protocol::ChatMessage;
use mnemo_storage::{Role, Turn};

/// Build the message list handed to the completion backend.
///
/// The system message frames the current question and marks the context
/// window as reference material. Each context turn follows as a numbered
/// `[history N]` message under its original role, and the question itself
/// closes the list as the final user message.
pub fn build_messages(context: &[Turn], question: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(context.len() + 2);
    messages.push(ChatMessage::system(format!(
        "Below are relevant historical dialogue records followed by the current question.\n\
         The current question is: {question}\n\
         The historical records are for reference only; answer the current question directly."
    )));
    for (index, turn) in context.iter().enumerate() {
        let content = format!("[history {}] {}", index + 1, turn.content);
        messages.push(match turn.role {
            Role::User => ChatMessage::user(content),
            Role::Assistant => ChatMessage::assistant(content),
        });
    }
    messages.push(ChatMessage::user(question.to_string()));
    messages
}

#[cfg(test)]
mod tests {
    use super::build_messages;
    use chrono::Utc;
    use mnemo_protocol::ChatRole;
    use mnemo_storage::{Role, Turn};
    use pretty_assertions::assert_eq;

    fn turn(role: Role, content: &str) -> Turn {
        Turn {
            id: 1,
            user_id: 1,
            role,
            content: content.to_string(),
            segmented_content: None,
            timestamp: Utc::now(),
            memory_id: None,
        }
    }

    #[test]
    fn empty_context_yields_system_and_question_only() {
        let messages = build_messages(&[], "what now?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert!(messages[0].content.contains("what now?"));
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "what now?");
    }

    #[test]
    fn context_turns_are_labeled_in_order_under_their_roles() {
        let context = vec![
            turn(Role::User, "first question"),
            turn(Role::Assistant, "first answer"),
        ];
        let messages = build_messages(&context, "follow-up");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "[history 1] first question");
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert_eq!(messages[2].content, "[history 2] first answer");
        assert_eq!(messages[3].content, "follow-up");
    }
}
