use std::sync::Arc;

use lyceum_core::{ChatMessage, Clock, Conversation, DurableStore, LyceumError, SystemClock};
use lyceum_limiter::{RateLimitStatus, RateLimiter};
use lyceum_memory::ChatHistory;
use lyceum_store::{QuotaAccountant, StorageUsage};

/// Facade over chat history, quota accounting, and rate limiting, all
/// sharing one durable store handle.
///
/// This is the surface the route/UI layer talks to; the components remain
/// individually reachable through the accessors.
pub struct AssistantStore {
    history: ChatHistory,
    quota: QuotaAccountant,
    limiter: RateLimiter,
}

impl AssistantStore {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Construct with an injected clock, shared by the history's
    /// conversation timestamps and the limiter's window arithmetic.
    pub fn with_clock(store: Arc<dyn DurableStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            history: ChatHistory::with_clock(store.clone(), clock.clone()),
            quota: QuotaAccountant::new(store.clone()),
            limiter: RateLimiter::with_clock(store, clock),
        }
    }

    /// Override the per-conversation message cap.
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.history = self.history.with_max_messages(max_messages);
        self
    }

    /// Override the per-window request limit.
    pub fn with_request_limit(mut self, limit: u32) -> Self {
        self.limiter = self.limiter.with_limit(limit);
        self
    }

    /// Override the capacity budget the accountant reports against.
    pub fn with_budget_bytes(mut self, budget_bytes: u64) -> Self {
        self.quota = self.quota.with_budget_bytes(budget_bytes);
        self
    }

    /// Create a new conversation owned by `owner_id`.
    pub fn create_conversation(&self, owner_id: &str) -> Result<Conversation, LyceumError> {
        self.history.create_conversation(owner_id)
    }

    /// Append a message, recovering once from a capacity-denied write.
    ///
    /// The pending message is borrowed, not consumed: a quota fault never
    /// loses it. On `QuotaExceeded` the oldest messages are purged and the
    /// append retried exactly once; a second denial propagates.
    pub fn append_message(&self, message: &ChatMessage) -> Result<(), LyceumError> {
        match self.history.append(message.clone()) {
            Err(LyceumError::QuotaExceeded(reason)) => {
                tracing::warn!("append denied for capacity ({reason}); purging and retrying");
                self.history.purge_oldest()?;
                self.history.append(message.clone())
            }
            result => result,
        }
    }

    /// Messages for one conversation, oldest first.
    pub fn list_messages(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, LyceumError> {
        self.history.list(conversation_id)
    }

    /// Delete a conversation and every message it owns.
    pub fn delete_conversation(&self, id: &str) -> Result<(), LyceumError> {
        self.history.delete_conversation(id)
    }

    /// Current byte usage against the capacity budget.
    pub fn usage(&self) -> StorageUsage {
        self.quota.usage()
    }

    /// Record one assistant request; `false` when the window is spent.
    pub fn try_record_request(&self) -> bool {
        self.limiter.try_record()
    }

    /// Read-only rate-limit snapshot.
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        self.limiter.status()
    }

    /// Re-apply the per-conversation cap everywhere; returns evictions.
    pub fn purge_oldest(&self) -> Result<usize, LyceumError> {
        self.history.purge_oldest()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn quota(&self) -> &QuotaAccountant {
        &self.quota
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}
