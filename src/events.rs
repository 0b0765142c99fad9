use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message in the conversation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    /// Typed by the person at the keyboard
    User,
    /// Returned by the inference endpoint (or synthesized on failure)
    Assistant,
    /// Local status line (help text, model switch confirmations)
    Notice,
}

/// A single message in the conversation. Immutable once appended;
/// append order is display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    /// Model that produced this message. Only set on assistant messages.
    pub model: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content, None)
    }

    pub fn assistant(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content, Some(model.into()))
    }

    pub fn notice(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Notice, content, None)
    }

    fn new(role: ChatRole, content: impl Into<String>, model: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            model,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_role_and_model() {
        let user = ChatMessage::user("hi");
        assert_eq!(user.role, ChatRole::User);
        assert!(user.model.is_none());

        let assistant = ChatMessage::assistant("hola", "llama3.2");
        assert_eq!(assistant.role, ChatRole::Assistant);
        assert_eq!(assistant.model.as_deref(), Some("llama3.2"));

        let notice = ChatMessage::notice("switched model");
        assert_eq!(notice.role, ChatRole::Notice);
        assert!(notice.model.is_none());
    }
}
