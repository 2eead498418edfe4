use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The author of a single conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Butler,
}

/// A single message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who produced this entry.
    pub speaker: Speaker,
    /// The text content of the message.
    pub text: String,
    /// When the message was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only history of one conversation.
///
/// Owned exclusively by its engine; grows by exactly one exchange (user
/// message + butler reply) per processed utterance and is emptied on the
/// explicit "clear" command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier for the conversation (UUID).
    pub id: String,
    messages: Vec<ChatMessage>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
        }
    }

    /// Appends one full exchange: the user's utterance followed by the reply.
    pub fn push_exchange(&mut self, utterance: &str, reply: &str) {
        self.messages.push(ChatMessage::new(Speaker::User, utterance));
        self.messages.push(ChatMessage::new(Speaker::Butler, reply));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// The category of a finished response, mirroring the matched intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseCategory {
    Location,
    Safety,
    Prize,
    Frustration,
    Default,
}

impl ResponseCategory {
    /// Returns a human-readable label for the category.
    pub fn label(&self) -> &'static str {
        match self {
            ResponseCategory::Location => "location",
            ResponseCategory::Safety => "safety",
            ResponseCategory::Prize => "prize",
            ResponseCategory::Frustration => "frustration",
            ResponseCategory::Default => "default",
        }
    }
}

/// Style tag attached to a response so the display layer can render tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Mission-brief delivery for location intel.
    Tactical,
    /// Calm, supportive delivery for safety concerns.
    Reassuring,
    /// Anticipation-building delivery for prize questions.
    Fomo,
    /// Light, humorous delivery for frustrated users.
    Playful,
    /// Plain delivery for everything else.
    Neutral,
}

/// The finished payload handed to the display layer: exactly one per utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub category: ResponseCategory,
    pub text: String,
    pub tone: Tone,
}
