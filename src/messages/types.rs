use crate::api::InputSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MessageContent {
    /// Plain transcript text
    Text(String),

    /// A generated contract body, rendered as a rich card with a
    /// download affordance
    Contract {
        contract_type: String,
        text: String,
    },
}

impl MessageContent {
    pub fn text(&self) -> &str {
        match self {
            MessageContent::Text(text) => text,
            MessageContent::Contract { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Which input path produced this entry, when it came from the user
    pub source: Option<InputSource>,

    /// Set on failure notices so the UI can style them
    pub is_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub speaker: Speaker,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
    pub metadata: MessageMetadata,
}

impl Message {
    pub fn new(speaker: Speaker, content: MessageContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            speaker,
            content,
            timestamp: Utc::now(),
            metadata: MessageMetadata::default(),
        }
    }

    /// A plain user entry
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, MessageContent::Text(text.into()))
    }

    /// A plain assistant entry
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, MessageContent::Text(text.into()))
    }

    /// An assistant failure notice
    pub fn failure(text: impl Into<String>) -> Self {
        Self::assistant(text).with_error()
    }

    /// A rich contract entry
    pub fn contract(contract_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            Speaker::Assistant,
            MessageContent::Contract {
                contract_type: contract_type.into(),
                text: text.into(),
            },
        )
    }

    pub fn with_source(mut self, source: InputSource) -> Self {
        self.metadata.source = Some(source);
        self
    }

    pub fn with_error(mut self) -> Self {
        self.metadata.is_error = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::user("hello").with_source(InputSource::Voice);
        assert_eq!(msg.speaker, Speaker::User);
        assert_eq!(msg.content.text(), "hello");
        assert_eq!(msg.metadata.source, Some(InputSource::Voice));
        assert!(!msg.metadata.is_error);

        let fail = Message::failure("nope");
        assert_eq!(fail.speaker, Speaker::Assistant);
        assert!(fail.metadata.is_error);
    }

    #[test]
    fn test_contract_content_text() {
        let msg = Message::contract("Lease", "LEASE AGREEMENT");
        assert_eq!(msg.content.text(), "LEASE AGREEMENT");
    }
}
