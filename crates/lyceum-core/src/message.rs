use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single message in an assistant conversation.
///
/// Messages are immutable once stored: there is no update-in-place, only
/// explicit deletion or eviction by the pruner. The `id` is caller-supplied
/// and globally unique across all conversations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    /// Conversation this message belongs to. Every message is owned by
    /// exactly one conversation.
    pub conversation_id: String,
    /// When the message was produced. ISO-8601 on the wire.
    pub timestamp: DateTime<Utc>,
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(
        id: impl Into<String>,
        conversation_id: impl Into<String>,
        role: MessageRole,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            conversation_id: conversation_id.into(),
            timestamp,
            role,
            content: content.into(),
        }
    }

    /// Convenience constructor for a user-authored message.
    pub fn user(
        id: impl Into<String>,
        conversation_id: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(id, conversation_id, MessageRole::User, content, timestamp)
    }

    /// Convenience constructor for an assistant-authored message.
    pub fn assistant(
        id: impl Into<String>,
        conversation_id: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(id, conversation_id, MessageRole::Assistant, content, timestamp)
    }
}

/// Metadata record for one conversation.
///
/// `message_count` is derived from the stored messages and `updated_at`
/// stamped from the clock; both are rewritten on every mutation and never
/// read back as authoritative input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
}
