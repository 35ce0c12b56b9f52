use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use lyceum_core::{
    ChatMessage, Clock, Conversation, DurableStore, LyceumError, SystemClock, CONVERSATIONS_KEY,
    MAX_MESSAGES_PER_CONVERSATION, MESSAGES_KEY, SCHEMA_KEY, SCHEMA_VERSION,
};

use crate::prune_conversation;

/// Store-backed, partitioned chat message collection.
///
/// All messages live flat under one key and every conversation's record
/// carries a `message_count`/`updated_at` pair, rewritten on each
/// mutation. Appends are idempotent on message id, and every append runs
/// the pruner so no conversation ever holds more than the configured
/// maximum.
pub struct ChatHistory {
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn Clock>,
    max_messages: usize,
}

impl ChatHistory {
    /// Open the history over the given store, on the system clock.
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Open the history with an injected clock for conversation
    /// timestamps.
    ///
    /// Checks the schema marker first: data written under a different
    /// version is discarded and the marker reseeded, since there is no
    /// migration format to interpret it with.
    pub fn with_clock(store: Arc<dyn DurableStore>, clock: Arc<dyn Clock>) -> Self {
        let history = Self {
            store,
            clock,
            max_messages: MAX_MESSAGES_PER_CONVERSATION,
        };
        history.ensure_schema();
        history
    }

    /// Override the per-conversation message cap.
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages;
        self
    }

    fn ensure_schema(&self) {
        match self.store.read(SCHEMA_KEY) {
            Ok(Some(version)) if version == SCHEMA_VERSION => {}
            Ok(stored) => {
                if let Some(version) = stored {
                    tracing::warn!("discarding chat data written under schema {version:?}");
                    let _ = self.store.remove(MESSAGES_KEY);
                    let _ = self.store.remove(CONVERSATIONS_KEY);
                }
                if let Err(e) = self.store.write(SCHEMA_KEY, SCHEMA_VERSION) {
                    tracing::warn!("failed to seed schema marker: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to read schema marker: {e}"),
        }
    }

    /// Create a new conversation owned by `owner_id`.
    pub fn create_conversation(&self, owner_id: &str) -> Result<Conversation, LyceumError> {
        let now = self.clock.now();
        let conversation = Conversation {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
            message_count: 0,
        };

        let mut conversations = self.load_conversations()?;
        conversations.push(conversation.clone());
        self.save_conversations(&conversations)?;
        Ok(conversation)
    }

    /// Look up one conversation's record.
    pub fn conversation(&self, id: &str) -> Result<Option<Conversation>, LyceumError> {
        Ok(self.load_conversations()?.into_iter().find(|c| c.id == id))
    }

    /// All conversations, oldest-created first.
    pub fn conversations(&self) -> Result<Vec<Conversation>, LyceumError> {
        let mut conversations = self.load_conversations()?;
        conversations.sort_by_key(|c| c.created_at);
        Ok(conversations)
    }

    /// Append a message to its conversation.
    ///
    /// A message id already present anywhere in the collection is the
    /// retry of an at-least-once caller: it is suppressed with a warning
    /// and nothing is mutated. The owning conversation must already exist;
    /// a missing one is a usage error, not a retriable fault.
    ///
    /// On success the conversation's `message_count` reflects the
    /// post-prune count and `updated_at` moves to the clock's current
    /// instant.
    pub fn append(&self, message: ChatMessage) -> Result<(), LyceumError> {
        let mut messages = self.load_messages()?;
        if messages.iter().any(|m| m.id == message.id) {
            tracing::warn!("suppressing duplicate message {}", message.id);
            return Ok(());
        }

        let mut conversations = self.load_conversations()?;
        let Some(position) = conversations
            .iter()
            .position(|c| c.id == message.conversation_id)
        else {
            return Err(LyceumError::ConversationNotFound(
                message.conversation_id.clone(),
            ));
        };

        let conversation_id = message.conversation_id.clone();
        messages.push(message);
        let messages = prune_conversation(&conversation_id, messages, self.max_messages);
        self.save_messages(&messages)?;

        let conversation = &mut conversations[position];
        conversation.message_count = messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .count();
        conversation.updated_at = self.clock.now();
        self.save_conversations(&conversations)
    }

    /// Messages for one conversation, oldest first.
    pub fn list(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, LyceumError> {
        let mut messages: Vec<ChatMessage> = self
            .load_messages()?
            .into_iter()
            .filter(|m| m.conversation_id == conversation_id)
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    /// Delete a conversation and every message it owns.
    ///
    /// Child messages go first, then the parent record: a failure in
    /// between leaves orphaned messages, never a conversation pointing at
    /// messages that do not exist.
    pub fn delete_conversation(&self, id: &str) -> Result<(), LyceumError> {
        let messages: Vec<ChatMessage> = self
            .load_messages()?
            .into_iter()
            .filter(|m| m.conversation_id != id)
            .collect();
        self.save_messages(&messages)?;

        let mut conversations = self.load_conversations()?;
        conversations.retain(|c| c.id != id);
        self.save_conversations(&conversations)
    }

    /// Re-apply the per-conversation cap across the whole collection.
    ///
    /// Administrative sweep for when global usage crosses the high-water
    /// mark. Returns how many messages were evicted; running it again with
    /// no intervening appends removes zero and writes nothing.
    pub fn purge_oldest(&self) -> Result<usize, LyceumError> {
        let mut conversations = self.load_conversations()?;
        let mut messages = self.load_messages()?;

        let before = messages.len();
        for conversation in &conversations {
            messages = prune_conversation(&conversation.id, messages, self.max_messages);
        }
        let removed = before - messages.len();
        if removed == 0 {
            return Ok(0);
        }
        self.save_messages(&messages)?;

        for conversation in &mut conversations {
            conversation.message_count = messages
                .iter()
                .filter(|m| m.conversation_id == conversation.id)
                .count();
        }
        self.save_conversations(&conversations)?;
        Ok(removed)
    }

    fn load_messages(&self) -> Result<Vec<ChatMessage>, LyceumError> {
        self.load_collection(MESSAGES_KEY)
    }

    fn save_messages(&self, messages: &[ChatMessage]) -> Result<(), LyceumError> {
        self.save_collection(MESSAGES_KEY, messages)
    }

    fn load_conversations(&self) -> Result<Vec<Conversation>, LyceumError> {
        self.load_collection(CONVERSATIONS_KEY)
    }

    fn save_conversations(&self, conversations: &[Conversation]) -> Result<(), LyceumError> {
        self.save_collection(CONVERSATIONS_KEY, conversations)
    }

    /// Decode a stored collection. A payload that fails to parse degrades
    /// to the empty collection: lossy but available.
    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, LyceumError> {
        let Some(raw) = self.store.read(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!("discarding corrupt payload under {key}: {e}");
                Ok(Vec::new())
            }
        }
    }

    fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), LyceumError> {
        let raw = serde_json::to_string(items)
            .map_err(|e| LyceumError::Memory(format!("failed to serialize {key}: {e}")))?;
        self.store.write(key, &raw)
    }
}
