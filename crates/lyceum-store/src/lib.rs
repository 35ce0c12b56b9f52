mod file_store;
mod quota;

pub use file_store::FileStore;
pub use quota::{QuotaAccountant, StorageUsage};

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use lyceum_core::{DurableStore, LyceumError};

/// Thread-safe in-memory implementation of [`DurableStore`].
///
/// Unbounded by default; [`with_capacity`](InMemoryStore::with_capacity)
/// installs a byte ceiling so capacity-denied writes can be exercised
/// without a real host limit.
pub struct InMemoryStore {
    data: RwLock<HashMap<String, String>>,
    capacity_bytes: Option<u64>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            capacity_bytes: None,
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap total stored value bytes at `capacity_bytes`.
    pub fn with_capacity(mut self, capacity_bytes: u64) -> Self {
        self.capacity_bytes = Some(capacity_bytes);
        self
    }
}

impl DurableStore for InMemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, LyceumError> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        Ok(data.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), LyceumError> {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(capacity) = self.capacity_bytes {
            let others: u64 = data
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let projected = others + value.len() as u64;
            if projected > capacity {
                return Err(LyceumError::QuotaExceeded(format!(
                    "writing {} bytes to {key} would use {projected} of {capacity} bytes",
                    value.len()
                )));
            }
        }
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LyceumError> {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.remove(key);
        Ok(())
    }

    fn size_of(&self, key: &str) -> u64 {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.get(key).map(|v| v.len() as u64).unwrap_or(0)
    }

    fn keys(&self) -> Vec<String> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_read() {
        let store = InMemoryStore::new();
        store.write("ns::k", "value").unwrap();
        assert_eq!(store.read("ns::k").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn read_missing_key() {
        let store = InMemoryStore::new();
        assert!(store.read("missing").unwrap().is_none());
    }

    #[test]
    fn remove_is_idempotent() {
        let store = InMemoryStore::new();
        store.write("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.read("k").unwrap().is_none());
    }

    #[test]
    fn size_of_reports_value_bytes() {
        let store = InMemoryStore::new();
        store.write("k", "12345").unwrap();
        assert_eq!(store.size_of("k"), 5);
        assert_eq!(store.size_of("missing"), 0);
    }

    #[test]
    fn keys_enumerates_all() {
        let store = InMemoryStore::new();
        store.write("a", "1").unwrap();
        store.write("b", "2").unwrap();
        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn capacity_denies_write_without_mutating() {
        let store = InMemoryStore::new().with_capacity(10);
        store.write("k", "12345").unwrap();

        let err = store.write("big", "12345678").unwrap_err();
        assert!(matches!(err, LyceumError::QuotaExceeded(_)));

        // Denied write left existing state untouched.
        assert_eq!(store.read("k").unwrap().as_deref(), Some("12345"));
        assert!(store.read("big").unwrap().is_none());
    }

    #[test]
    fn overwrite_counts_replacement_not_sum() {
        let store = InMemoryStore::new().with_capacity(10);
        store.write("k", "123456789").unwrap();
        // Replacing the only value may use the full budget again.
        store.write("k", "abcdefghij").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("abcdefghij"));
    }
}
