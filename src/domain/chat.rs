//! Chat history for the Digital Brain assistant.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Greeting shown as the first model turn of every conversation.
pub const WELCOME_MESSAGE: &str = "Bonjour ! Je suis le Cerveau Numérique de Yann's Note. Je suis connecté à vos documents et au web pour vous donner des réponses précises et vérifiables. Comment puis-je vous aider aujourd'hui ?";

/// Who authored a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        let timestamp = Utc::now().timestamp_millis();
        Self {
            id: timestamp.to_string(),
            role,
            text: text.into(),
            timestamp,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Model, text)
    }

    /// The opening model turn
    pub fn welcome() -> Self {
        let mut msg = Self::model(WELCOME_MESSAGE);
        msg.id = "welcome".to_string();
        msg
    }
}
