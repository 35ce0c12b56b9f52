use crate::LyceumError;

/// Synchronous, string-keyed durable storage.
///
/// The contract mirrors a browser-style key-value host: every operation is
/// run-to-completion with no suspension points, and the store performs no
/// (de)serialization of its own. Values are opaque strings, encoded and
/// decoded by the caller, which keeps the trait format-agnostic and
/// testable against an in-memory fake.
pub trait DurableStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, LyceumError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// Fails with [`LyceumError::QuotaExceeded`] when capacity denies the
    /// write; implementations must leave existing state untouched in that
    /// case.
    fn write(&self, key: &str, value: &str) -> Result<(), LyceumError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), LyceumError>;

    /// Best-effort size of the value under `key`, in bytes. Absent or
    /// unreadable keys report zero.
    fn size_of(&self, key: &str) -> u64;

    /// Best-effort enumeration of every stored key.
    fn keys(&self) -> Vec<String>;
}
