use thiserror::Error;

/// Errors shared across the Lyceum crates.
#[derive(Debug, Error)]
pub enum LyceumError {
    /// The backing store failed to read, write, or remove a key.
    #[error("store error: {0}")]
    Store(String),

    /// A write was denied because it would exceed the capacity budget.
    ///
    /// Raised before any state is mutated, so the caller still holds the
    /// pending data and can purge and retry.
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// An operation referenced a conversation that does not exist.
    #[error("conversation not found: {0}")]
    ConversationNotFound(String),

    /// Message collection handling failed.
    #[error("memory error: {0}")]
    Memory(String),
}
