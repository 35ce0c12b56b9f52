use std::collections::HashMap;
use std::sync::Arc;

use lyceum_core::{DurableStore, CAPACITY_BUDGET_BYTES, PURGE_HIGH_WATER_PERCENT};

/// Aggregate byte usage of the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUsage {
    pub total_bytes: u64,
    /// Bytes grouped by namespace: the key minus its final `::` segment.
    pub namespace_bytes: HashMap<String, u64>,
    /// Share of the capacity budget, in whole percent, rounded.
    pub percent: u32,
}

/// Computes usage against a fixed capacity budget.
///
/// The budget sits below the host's real ceiling so a denied write shows
/// up as a structured `QuotaExceeded` instead of an opaque platform
/// exception. Usage queries are infallible: a missing or unreadable key
/// counts as zero bytes and is skipped.
pub struct QuotaAccountant {
    store: Arc<dyn DurableStore>,
    budget_bytes: u64,
}

impl QuotaAccountant {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            store,
            budget_bytes: CAPACITY_BUDGET_BYTES,
        }
    }

    pub fn with_budget_bytes(mut self, budget_bytes: u64) -> Self {
        self.budget_bytes = budget_bytes;
        self
    }

    /// Scan the store's key space and total up per-namespace usage.
    pub fn usage(&self) -> StorageUsage {
        let mut total_bytes = 0u64;
        let mut namespace_bytes: HashMap<String, u64> = HashMap::new();

        for key in self.store.keys() {
            let bytes = self.store.size_of(&key);
            if bytes == 0 {
                continue;
            }
            total_bytes += bytes;
            *namespace_bytes.entry(namespace_of(&key)).or_default() += bytes;
        }

        StorageUsage {
            total_bytes,
            namespace_bytes,
            percent: percent_of(total_bytes, self.budget_bytes),
        }
    }

    /// Whether usage has crossed the purge high-water mark.
    pub fn high_water(&self) -> bool {
        self.usage().percent >= PURGE_HIGH_WATER_PERCENT
    }
}

fn namespace_of(key: &str) -> String {
    match key.rfind("::") {
        Some(idx) => key[..idx].to_string(),
        None => key.to_string(),
    }
}

fn percent_of(total: u64, budget: u64) -> u32 {
    if budget == 0 {
        return if total == 0 { 0 } else { 100 };
    }
    (total as f64 / budget as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_strips_final_segment() {
        assert_eq!(namespace_of("lyceum::chat::messages"), "lyceum::chat");
        assert_eq!(namespace_of("bare"), "bare");
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(percent_of(0, 100), 0);
        assert_eq!(percent_of(49, 1000), 5);
        assert_eq!(percent_of(44, 1000), 4);
        assert_eq!(percent_of(1500, 1000), 150);
    }
}
