//! Default tunables. Each component accepts overrides through its
//! `with_*` builder methods.

/// Maximum messages retained per conversation.
pub const MAX_MESSAGES_PER_CONVERSATION: usize = 100;

/// Requests allowed per rate-limit window.
pub const HOURLY_REQUEST_LIMIT: u32 = 50;

/// Length of one rate-limit window, in minutes.
pub const WINDOW_MINUTES: i64 = 60;

/// Capacity budget the quota accountant reports against.
///
/// Kept strictly below the typical 5 MiB host ceiling so writes are denied
/// as a structured `QuotaExceeded` before the platform's own opaque limit
/// is hit.
pub const CAPACITY_BUDGET_BYTES: u64 = 4 * 1024 * 1024;

/// Usage percentage at which callers should run the purge sweep.
pub const PURGE_HIGH_WATER_PERCENT: u32 = 80;
