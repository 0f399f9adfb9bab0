use crate::ExtractionResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Ordered message sequence sent to the chat-completion endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Persona as the system message, then one user message embedding the
    /// parameter and the successful records as a JSON array. Failure records
    /// are skipped.
    pub fn for_feedback(persona: &str, parameter: &str, records: &[ExtractionResult]) -> Self {
        let successes: Vec<&ExtractionResult> =
            records.iter().filter(|r| r.is_success()).collect();
        // Serializing plain string fields cannot fail.
        let data = serde_json::to_string(&successes).unwrap_or_else(|_| "[]".to_string());

        Self::new(vec![
            ChatMessage::system(persona),
            ChatMessage::user(format!(
                "Analyze the following stream data and provide feedback based on the parameter '{parameter}': {data}"
            )),
        ])
    }
}
